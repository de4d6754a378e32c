// stockflow_app/src/state.rs
use crate::config::AppConfig;
use crate::services::payment::MockPaymentGateway;
use std::sync::Arc;
use stockflow::{AnalyticsConfig, AnalyticsEngine, InventoryService, OrderLifecycle, OrderStore, ProductStore};

#[derive(Clone)]
pub struct AppState {
  pub lifecycle: OrderLifecycle,
  pub inventory: InventoryService,
  pub analytics: AnalyticsEngine,
  pub payments: MockPaymentGateway,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  /// Wires the engine services onto whichever backend was selected.
  pub fn from_stores(orders: Arc<dyn OrderStore>, products: Arc<dyn ProductStore>, config: Arc<AppConfig>) -> Self {
    let inventory = InventoryService::new(products);
    let lifecycle = OrderLifecycle::new(orders.clone(), inventory.clone());
    let analytics = AnalyticsEngine::new(
      orders,
      AnalyticsConfig {
        gross_revenue_ratio: config.gross_revenue_ratio,
        report_timeout: config.analytics_timeout,
        ..AnalyticsConfig::default()
      },
    );
    let payments = MockPaymentGateway::new(config.mock_payment_account_id.clone());
    Self {
      lifecycle,
      inventory,
      analytics,
      payments,
      config,
    }
  }
}
