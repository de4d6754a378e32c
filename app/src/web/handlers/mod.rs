// stockflow_app/src/web/handlers/mod.rs

pub mod analytics_handlers;
pub mod order_handlers;
pub mod payment_handlers;
pub mod product_handlers;
