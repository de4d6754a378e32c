// src/lib.rs

//! Stockflow: order lifecycle, inventory reconciliation and revenue aggregation.
//!
//! The engine governs three things:
//!  - How an order's status transitions drive inventory side effects exactly once.
//!  - How the payment method moves the timing of those side effects
//!    (card: at creation, cash on delivery: on delivery).
//!  - Which orders count as revenue (only `delivered`).
//!
//! Storage sits behind the `OrderStore` / `ProductStore` traits. Both critical writes, the
//! guarded stock decrement and the guarded status swap, are single store operations; the
//! engine never reads a value and then writes a decision based on it.

pub mod analytics;
pub mod error;
pub mod inventory;
pub mod lifecycle;
pub mod model;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::analytics::{AnalyticsConfig, AnalyticsEngine, Dashboard, ReportOutcome};
pub use crate::error::{Entity, Error, Result, StoreError};
pub use crate::inventory::{InventoryService, LineFailure, LineOutcome, ReconciliationReport};
pub use crate::lifecycle::{OrderLifecycle, OrderPlaced, StatusChange};
pub use crate::model::{
  AdjustMode, LineItem, NewOrder, NewProduct, Order, OrderFilter, OrderStatus, PaymentMethod, Product, StockStatus,
};
pub use crate::store::{AdjustOutcome, DecrementOutcome, MemoryStore, OrderStore, ProductStore, StatusSwap};
