// stockflow/src/store/mod.rs

//! Persistence seams for orders and products.
//!
//! The two invariants that matter under concurrency are enforced here, not by callers:
//!  - `ProductStore::decrement_stock` evaluates the guard `quantity >= requested` in the same
//!    operation that applies the decrement.
//!  - `OrderStore::compare_and_set_status` only writes when the current status is one of the
//!    allowed sources, and reports the status it replaced.
//!
//! Implementations must not split either into a read followed by a separate write.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{AdjustMode, NewOrder, NewProduct, Order, OrderFilter, OrderStatus, Product};

pub use memory::MemoryStore;

/// Result of a guarded stock decrement.
#[derive(Debug, Clone, PartialEq)]
pub enum DecrementOutcome {
  Applied(Product),
  Insufficient { available: i32 },
  Missing,
}

/// Result of an administrative restock.
#[derive(Debug, Clone, PartialEq)]
pub enum AdjustOutcome {
  Applied(Product),
  /// `add` would take the level past `i32::MAX`; nothing was written.
  Overflow { current: i32 },
  Missing,
}

/// A status write that went through, with the status it replaced.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusSwap {
  pub previous_status: OrderStatus,
  #[cfg_attr(feature = "db", sqlx(flatten))]
  pub order: Order,
}

#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
  async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;

  async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

  async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

  /// Atomically subtracts `quantity` and adds it to the sell count, provided at least
  /// `quantity` units are on hand.
  async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<DecrementOutcome, StoreError>;

  /// Atomically restocks. An `add` that would overflow the stock level is refused, not clamped.
  async fn adjust_stock(&self, id: Uuid, quantity: i32, mode: AdjustMode) -> Result<AdjustOutcome, StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
  /// Persists a validated checkout payload as a `pending` order with the next invoice number.
  async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError>;

  async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

  /// Matching orders, newest first.
  async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError>;

  /// Sets `to` only if the current status is in `allowed_from`.
  /// `None` means nothing was written (unknown id, or the guard did not hold).
  async fn compare_and_set_status(
    &self,
    id: Uuid,
    allowed_from: &[OrderStatus],
    to: OrderStatus,
  ) -> Result<Option<StatusSwap>, StoreError>;
}
