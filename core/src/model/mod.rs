// stockflow/src/model/mod.rs

//! Persisted records: orders with their cart snapshot, and live product stock.

pub mod order;
pub mod product;

pub use order::{LineItem, NewOrder, Order, OrderFilter, OrderStatus, PaymentMethod};
pub use product::{AdjustMode, NewProduct, Product, StockStatus};
