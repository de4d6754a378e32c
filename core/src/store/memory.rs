// stockflow/src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};
use uuid::Uuid;

use super::{AdjustOutcome, DecrementOutcome, OrderStore, ProductStore, StatusSwap};
use crate::error::StoreError;
use crate::model::{AdjustMode, NewOrder, NewProduct, Order, OrderFilter, OrderStatus, Product};

#[derive(Debug, Default)]
struct Tables {
  products: HashMap<Uuid, Product>,
  orders: HashMap<Uuid, Order>,
  last_invoice: i64,
}

/// Process-local store. Every operation runs under one `parking_lot::Mutex`, which plays the
/// role of the database's row lock: guard evaluation and mutation happen in the same
/// critical section.
///
/// IMPORTANT: the lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a fully formed order as-is (backfills, fixtures). The invoice counter is moved
  /// past `order.invoice` so later checkouts keep counting upward.
  pub fn import_order(&self, order: Order) {
    let mut tables = self.tables.lock();
    tables.last_invoice = tables.last_invoice.max(order.invoice);
    tables.orders.insert(order.id, order);
  }

  pub fn import_product(&self, product: Product) {
    self.tables.lock().products.insert(product.id, product);
  }
}

#[async_trait]
impl ProductStore for MemoryStore {
  async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
    let product = product.into_product(Uuid::new_v4(), Utc::now());
    self.tables.lock().products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
    Ok(self.tables.lock().products.get(&id).cloned())
  }

  async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
    let mut products: Vec<Product> = self.tables.lock().products.values().cloned().collect();
    products.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(products)
  }

  async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<DecrementOutcome, StoreError> {
    let mut tables = self.tables.lock();
    let Some(product) = tables.products.get_mut(&id) else {
      return Ok(DecrementOutcome::Missing);
    };
    if product.quantity < quantity {
      return Ok(DecrementOutcome::Insufficient {
        available: product.quantity,
      });
    }
    product.apply_sale(quantity, Utc::now());
    Ok(DecrementOutcome::Applied(product.clone()))
  }

  async fn adjust_stock(&self, id: Uuid, quantity: i32, mode: AdjustMode) -> Result<AdjustOutcome, StoreError> {
    let mut tables = self.tables.lock();
    let Some(product) = tables.products.get_mut(&id) else {
      return Ok(AdjustOutcome::Missing);
    };
    if !product.apply_adjustment(quantity, mode, Utc::now()) {
      return Ok(AdjustOutcome::Overflow {
        current: product.quantity,
      });
    }
    Ok(AdjustOutcome::Applied(product.clone()))
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
    let now = Utc::now();
    let mut tables = self.tables.lock();
    tables.last_invoice += 1;
    let sub_total = order.resolved_sub_total();
    let record = Order {
      id: Uuid::new_v4(),
      invoice: tables.last_invoice,
      cart: order.cart,
      status: OrderStatus::Pending,
      payment_method: order.payment_method,
      sub_total,
      shipping_cost: order.shipping_cost,
      discount: order.discount,
      total_amount: order.total_amount,
      user_id: order.user_id,
      customer_name: order.customer_name,
      created_at: now,
      updated_at: now,
    };
    tables.orders.insert(record.id, record.clone());
    event!(Level::TRACE, order_id = %record.id, invoice = record.invoice, "Order inserted.");
    Ok(record)
  }

  async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
    Ok(self.tables.lock().orders.get(&id).cloned())
  }

  async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
    let mut orders: Vec<Order> = self
      .tables
      .lock()
      .orders
      .values()
      .filter(|order| filter.matches(order))
      .cloned()
      .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.invoice.cmp(&a.invoice)));
    Ok(orders)
  }

  async fn compare_and_set_status(
    &self,
    id: Uuid,
    allowed_from: &[OrderStatus],
    to: OrderStatus,
  ) -> Result<Option<StatusSwap>, StoreError> {
    let mut tables = self.tables.lock();
    let Some(order) = tables.orders.get_mut(&id) else {
      return Ok(None);
    };
    if !allowed_from.contains(&order.status) {
      return Ok(None);
    }
    let previous_status = order.status;
    order.status = to;
    order.updated_at = Utc::now();
    Ok(Some(StatusSwap {
      previous_status,
      order: order.clone(),
    }))
  }
}
