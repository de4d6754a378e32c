// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every fixture

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use stockflow::{
  AnalyticsConfig, AnalyticsEngine, InventoryService, LineItem, MemoryStore, NewOrder, NewProduct, Order,
  OrderFilter, OrderLifecycle, OrderStatus, OrderStore, PaymentMethod, Product, ProductStore, StatusSwap, StoreError,
};
use tracing::Level;
use uuid::Uuid;

// --- Tracing Setup (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Engine wired to one in-memory store ---
pub struct Harness {
  pub store: Arc<MemoryStore>,
  pub inventory: InventoryService,
  pub lifecycle: OrderLifecycle,
}

pub fn harness() -> Harness {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let inventory = InventoryService::new(store.clone());
  let lifecycle = OrderLifecycle::new(store.clone(), inventory.clone());
  Harness {
    store,
    inventory,
    lifecycle,
  }
}

impl Harness {
  pub async fn stock(&self, title: &str, quantity: i32) -> Product {
    self
      .inventory
      .create_product(NewProduct {
        title: title.to_string(),
        category: "general".to_string(),
        price: Decimal::new(1000, 2),
        quantity,
      })
      .await
      .expect("fixture product")
  }

  pub async fn quantity_of(&self, product: &Product) -> i32 {
    self.inventory.get_product(product.id).await.expect("product exists").quantity
  }

  pub fn analytics(&self) -> AnalyticsEngine {
    AnalyticsEngine::new(self.store.clone(), AnalyticsConfig::default())
  }
}

pub fn line(product: &Product, quantity: i32) -> LineItem {
  LineItem {
    product_id: product.id,
    title: product.title.clone(),
    unit_price: product.price,
    ordered_quantity: quantity,
    category: product.category.clone(),
  }
}

pub fn checkout(method: PaymentMethod, cart: Vec<LineItem>) -> NewOrder {
  let total: Decimal = cart.iter().map(LineItem::line_total).sum();
  NewOrder {
    cart,
    payment_method: method,
    sub_total: None,
    shipping_cost: Decimal::ZERO,
    discount: Decimal::ZERO,
    total_amount: total,
    user_id: Uuid::new_v4(),
    customer_name: Some("Ada".to_string()),
  }
}

/// A complete historical order for analytics fixtures.
pub fn past_order(
  user_id: Uuid,
  status: OrderStatus,
  total: Decimal,
  created_at: DateTime<Utc>,
  cart: Vec<LineItem>,
) -> Order {
  Order {
    id: Uuid::new_v4(),
    invoice: 0,
    cart,
    status,
    payment_method: PaymentMethod::Cod,
    sub_total: total,
    shipping_cost: Decimal::ZERO,
    discount: Decimal::ZERO,
    total_amount: total,
    user_id,
    customer_name: None,
    created_at,
    updated_at: created_at,
  }
}

pub fn snapshot_line(product_id: Uuid, category: &str, unit_price: Decimal, quantity: i32) -> LineItem {
  LineItem {
    product_id,
    title: format!("product-{}", &product_id.simple().to_string()[..6]),
    unit_price,
    ordered_quantity: quantity,
    category: category.to_string(),
  }
}

// --- Order stores that misbehave, for report isolation tests ---

pub struct FailingOrderStore;

#[async_trait]
impl OrderStore for FailingOrderStore {
  async fn insert_order(&self, _order: NewOrder) -> Result<Order, StoreError> {
    Err(unavailable())
  }

  async fn get_order(&self, _id: Uuid) -> Result<Option<Order>, StoreError> {
    Err(unavailable())
  }

  async fn list_orders(&self, _filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
    Err(unavailable())
  }

  async fn compare_and_set_status(
    &self,
    _id: Uuid,
    _allowed_from: &[OrderStatus],
    _to: OrderStatus,
  ) -> Result<Option<StatusSwap>, StoreError> {
    Err(unavailable())
  }
}

fn unavailable() -> StoreError {
  StoreError::Unavailable {
    source: anyhow::anyhow!("connection refused"),
  }
}

/// Delegates to an inner store after sleeping on every listing.
pub struct SlowOrderStore {
  pub inner: Arc<MemoryStore>,
  pub delay: Duration,
}

#[async_trait]
impl OrderStore for SlowOrderStore {
  async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
    self.inner.insert_order(order).await
  }

  async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
    self.inner.get_order(id).await
  }

  async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
    tokio::time::sleep(self.delay).await;
    self.inner.list_orders(filter).await
  }

  async fn compare_and_set_status(
    &self,
    id: Uuid,
    allowed_from: &[OrderStatus],
    to: OrderStatus,
  ) -> Result<Option<StatusSwap>, StoreError> {
    self.inner.compare_and_set_status(id, allowed_from, to).await
  }
}

/// Reads straight from the store, bypassing the inventory service.
pub async fn raw_product(store: &MemoryStore, id: Uuid) -> Option<Product> {
  ProductStore::get_product(store, id).await.expect("memory store never fails")
}
