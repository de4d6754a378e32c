// stockflow/src/inventory/mod.rs

//! Inventory reconciliation: the only code path that mutates `Product.quantity`.

pub mod report;

use std::sync::Arc;
use tracing::{event, instrument, Level};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{AdjustMode, LineItem, NewProduct, Product};
use crate::store::{AdjustOutcome, DecrementOutcome, ProductStore};

pub use report::{LineFailure, LineOutcome, LineReconciliation, ReconciliationReport};

#[derive(Clone)]
pub struct InventoryService {
  products: Arc<dyn ProductStore>,
}

impl InventoryService {
  pub fn new(products: Arc<dyn ProductStore>) -> Self {
    Self { products }
  }

  /// Commits `quantity` sold units of one product.
  ///
  /// Fails with `InsufficientStock` rather than clamping, and with `NotFound` for an unknown id.
  #[instrument(name = "InventoryService::reconcile", skip(self), err(Display))]
  pub async fn reconcile(&self, product_id: Uuid, quantity: i32) -> Result<Product> {
    if quantity <= 0 {
      return Err(Error::Validation(format!(
        "Reconciliation quantity must be positive, got {}",
        quantity
      )));
    }
    match self.products.decrement_stock(product_id, quantity).await? {
      DecrementOutcome::Applied(product) => {
        event!(
          Level::DEBUG,
          remaining = product.quantity,
          sell_count = product.sell_count,
          status = ?product.status,
          "Stock decremented."
        );
        Ok(product)
      }
      DecrementOutcome::Insufficient { available } => Err(Error::InsufficientStock {
        product_id,
        requested: quantity,
        available,
      }),
      DecrementOutcome::Missing => Err(Error::product_not_found(product_id)),
    }
  }

  /// Reconciles every line of a cart. Each line is its own unit of work: a failure is logged
  /// and recorded in the report, and the remaining lines are still attempted.
  #[instrument(name = "InventoryService::reconcile_cart", skip(self, cart), fields(lines = cart.len()))]
  pub async fn reconcile_cart(&self, order_id: Uuid, cart: &[LineItem]) -> ReconciliationReport {
    let mut lines = Vec::with_capacity(cart.len());
    for item in cart {
      let outcome = match self.reconcile(item.product_id, item.ordered_quantity).await {
        Ok(product) => LineOutcome::Applied {
          remaining_quantity: product.quantity,
          status: product.status,
        },
        Err(err) => {
          event!(
            Level::WARN,
            %order_id,
            product_id = %item.product_id,
            requested = item.ordered_quantity,
            error = %err,
            "Line item reconciliation failed; continuing with remaining items."
          );
          LineOutcome::Failed(LineFailure::from(&err))
        }
      };
      lines.push(LineReconciliation {
        product_id: item.product_id,
        quantity: item.ordered_quantity,
        outcome,
      });
    }

    let report = ReconciliationReport { order_id, lines };
    if report.is_complete() {
      event!(Level::INFO, %order_id, applied = report.applied_count(), "Cart reconciled.");
    } else {
      event!(
        Level::WARN,
        %order_id,
        applied = report.applied_count(),
        failed = report.failed_count(),
        "Cart partially reconciled; stock needs out-of-band review."
      );
    }
    report
  }

  /// Administrative restock. `add` takes a positive delta, `set` an absolute non-negative level.
  #[instrument(name = "InventoryService::adjust_manually", skip(self), err(Display))]
  pub async fn adjust_manually(&self, product_id: Uuid, quantity: i32, mode: AdjustMode) -> Result<Product> {
    match mode {
      AdjustMode::Add if quantity <= 0 => {
        return Err(Error::Validation(format!(
          "Restock quantity must be positive, got {}",
          quantity
        )));
      }
      AdjustMode::Set if quantity < 0 => {
        return Err(Error::Validation(format!(
          "Stock level must not be negative, got {}",
          quantity
        )));
      }
      _ => {}
    }
    let product = match self.products.adjust_stock(product_id, quantity, mode).await? {
      AdjustOutcome::Applied(product) => product,
      AdjustOutcome::Overflow { current } => {
        return Err(Error::Validation(format!(
          "Restock of {} would exceed the maximum stock level (currently {})",
          quantity, current
        )));
      }
      AdjustOutcome::Missing => return Err(Error::product_not_found(product_id)),
    };
    event!(Level::INFO, %product_id, quantity = product.quantity, status = ?product.status, "Inventory adjusted.");
    Ok(product)
  }

  #[instrument(name = "InventoryService::create_product", skip(self, product), err(Display))]
  pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
    product.validate()?;
    Ok(self.products.insert_product(product).await?)
  }

  pub async fn get_product(&self, product_id: Uuid) -> Result<Product> {
    self
      .products
      .get_product(product_id)
      .await?
      .ok_or_else(|| Error::product_not_found(product_id))
  }

  pub async fn list_products(&self) -> Result<Vec<Product>> {
    Ok(self.products.list_products().await?)
  }
}
