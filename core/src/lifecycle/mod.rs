// stockflow/src/lifecycle/mod.rs

//! The single authoritative transition point for `Order.status`.
//!
//! Inventory side effects run at most once per order:
//!  - `Card` orders reconcile while the order is being created.
//!  - `COD` orders reconcile on the one status write that moves them into `delivered`.
//!    That write is a conditional update whose guard excludes `delivered`, so concurrent
//!    requests cannot both win it.

use serde::Serialize;
use std::sync::Arc;
use tracing::{event, instrument, Level};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::inventory::{InventoryService, ReconciliationReport};
use crate::model::{NewOrder, Order, OrderFilter, OrderStatus, PaymentMethod};
use crate::store::OrderStore;

/// A freshly created order and, for card payments, the inventory commit that came with it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
  pub order: Order,
  pub reconciliation: Option<ReconciliationReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
  pub order: Order,
  pub previous_status: OrderStatus,
  /// `false` when the order already had the requested status and nothing was written.
  pub applied: bool,
  pub reconciliation: Option<ReconciliationReport>,
}

/// Whether entering `to` from `previous` commits stock for an order paid with `method`.
pub fn reconciles_on_transition(previous: OrderStatus, to: OrderStatus, method: PaymentMethod) -> bool {
  to == OrderStatus::Delivered && method == PaymentMethod::Cod && previous != OrderStatus::Delivered
}

#[derive(Clone)]
pub struct OrderLifecycle {
  orders: Arc<dyn OrderStore>,
  inventory: InventoryService,
}

impl OrderLifecycle {
  pub fn new(orders: Arc<dyn OrderStore>, inventory: InventoryService) -> Self {
    Self { orders, inventory }
  }

  /// Persists a new `pending` order.
  ///
  /// Card payment capture has already happened upstream, so a `Card` order commits stock for
  /// every cart line right away. Line failures end up in the returned report; the order itself
  /// is never rolled back because of them.
  #[instrument(
    name = "OrderLifecycle::create_order",
    skip_all,
    fields(payment_method = %new_order.payment_method, lines = new_order.cart.len(), user_id = %new_order.user_id),
    err(Display)
  )]
  pub async fn create_order(&self, new_order: NewOrder) -> Result<OrderPlaced> {
    new_order.validate()?;
    let order = self.orders.insert_order(new_order).await?;
    event!(Level::INFO, order_id = %order.id, invoice = order.invoice, "Order created.");

    let reconciliation = if order.payment_method.reconciles_at_creation() {
      Some(self.inventory.reconcile_cart(order.id, &order.cart).await)
    } else {
      event!(Level::DEBUG, order_id = %order.id, "Cash on delivery; inventory untouched until delivery.");
      None
    };

    Ok(OrderPlaced { order, reconciliation })
  }

  /// Moves an order to `to`.
  ///
  /// Requesting the status the order already has is a no-op. Anything outside the
  /// forward-or-cancel rule is rejected with `InvalidTransition` before any side effect.
  #[instrument(name = "OrderLifecycle::change_status", skip(self), err(Display))]
  pub async fn change_status(&self, order_id: Uuid, to: OrderStatus) -> Result<StatusChange> {
    let current = self.get_order(order_id).await?;
    if current.status == to {
      return Ok(Self::unchanged(current));
    }
    if !current.status.can_transition_to(to) {
      return Err(Error::InvalidTransition {
        from: current.status,
        to,
      });
    }

    let swap = match self
      .orders
      .compare_and_set_status(order_id, OrderStatus::sources_for(to), to)
      .await?
    {
      Some(swap) => swap,
      None => {
        // Lost the race: somebody else moved the order between our read and the guarded write.
        let latest = self.get_order(order_id).await?;
        if latest.status == to {
          event!(Level::DEBUG, status = %to, "Concurrent request already applied this status.");
          return Ok(Self::unchanged(latest));
        }
        return Err(Error::InvalidTransition {
          from: latest.status,
          to,
        });
      }
    };

    event!(
      Level::INFO,
      from = %swap.previous_status,
      to = %swap.order.status,
      payment_method = %swap.order.payment_method,
      "Order status changed."
    );

    let reconciliation = if reconciles_on_transition(swap.previous_status, to, swap.order.payment_method) {
      Some(self.inventory.reconcile_cart(swap.order.id, &swap.order.cart).await)
    } else {
      None
    };

    Ok(StatusChange {
      previous_status: swap.previous_status,
      order: swap.order,
      applied: true,
      reconciliation,
    })
  }

  pub async fn get_order(&self, order_id: Uuid) -> Result<Order> {
    self
      .orders
      .get_order(order_id)
      .await?
      .ok_or_else(|| Error::order_not_found(order_id))
  }

  pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
    Ok(self.orders.list_orders(filter).await?)
  }

  fn unchanged(order: Order) -> StatusChange {
    StatusChange {
      previous_status: order.status,
      order,
      applied: false,
      reconciliation: None,
    }
  }
}
