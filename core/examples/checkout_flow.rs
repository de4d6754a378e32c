// stockflow/examples/checkout_flow.rs

use rust_decimal::Decimal;
use std::sync::Arc;
use stockflow::{
  AdjustMode, AnalyticsConfig, AnalyticsEngine, InventoryService, LineItem, MemoryStore, NewOrder, NewProduct,
  OrderLifecycle, OrderStatus, PaymentMethod, Result,
};
use tracing::info;
use uuid::Uuid;

fn order_for(product_id: Uuid, title: &str, price: Decimal, quantity: i32, method: PaymentMethod) -> NewOrder {
  let line = LineItem {
    product_id,
    title: title.to_string(),
    unit_price: price,
    ordered_quantity: quantity,
    category: "kitchen".to_string(),
  };
  NewOrder {
    total_amount: line.line_total(),
    cart: vec![line],
    payment_method: method,
    sub_total: None,
    shipping_cost: Decimal::ZERO,
    discount: Decimal::ZERO,
    user_id: Uuid::new_v4(),
    customer_name: Some("Example Customer".to_string()),
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Checkout Flow Example ---");

  // 1. One in-memory store backs both orders and products
  let store = Arc::new(MemoryStore::new());
  let inventory = InventoryService::new(store.clone());
  let lifecycle = OrderLifecycle::new(store.clone(), inventory.clone());
  let analytics = AnalyticsEngine::new(store, AnalyticsConfig::default());

  let kettle = inventory
    .create_product(NewProduct {
      title: "Kettle".to_string(),
      category: "kitchen".to_string(),
      price: Decimal::new(4900, 2),
      quantity: 3,
    })
    .await?;

  // 2. Card: stock is committed as soon as the order exists
  let card = lifecycle
    .create_order(order_for(kettle.id, &kettle.title, kettle.price, 2, PaymentMethod::Card))
    .await?;
  info!(
    invoice = card.order.invoice,
    remaining = inventory.get_product(kettle.id).await?.quantity,
    "Card order placed."
  );

  // 3. COD: nothing moves until delivery, and this one cannot be fully served
  let cod = lifecycle
    .create_order(order_for(kettle.id, &kettle.title, kettle.price, 2, PaymentMethod::Cod))
    .await?;
  let delivered = lifecycle.change_status(cod.order.id, OrderStatus::Delivered).await?;
  if let Some(report) = &delivered.reconciliation {
    info!(
      applied = report.applied_count(),
      failed = report.failed_count(),
      "COD order delivered; reconciliation ran once."
    );
  }

  // 4. Restock and read the numbers back
  let restocked = inventory.adjust_manually(kettle.id, 10, AdjustMode::Add).await?;
  info!(quantity = restocked.quantity, status = ?restocked.status, "Restocked.");

  let overview = analytics.business_overview(None).await?;
  info!(
    total_revenue = %overview.total_revenue,
    delivered = overview.orders_by_status.delivered,
    pending = overview.orders_by_status.pending,
    "Business overview."
  );

  info!("--- Checkout Flow Example Complete ---");
  Ok(())
}
