// stockflow_app/src/db/seed.rs

use rust_decimal::Decimal;
use stockflow::{InventoryService, NewProduct};
use tracing::{info, instrument};

use crate::errors::Result as AppResult;

fn demo_catalog() -> Vec<NewProduct> {
  [
    ("Ceramic Mug", "kitchen", 1250, 40),
    ("Pour-over Kettle", "kitchen", 4900, 12),
    ("Linen Apron", "kitchen", 2800, 0),
    ("Desk Lamp", "lighting", 3999, 25),
    ("Pendant Light", "lighting", 8900, 6),
    ("Wool Throw", "home", 7500, 18),
    ("Oak Side Table", "furniture", 18900, 4),
    ("Notebook A5", "stationery", 650, 150),
  ]
  .into_iter()
  .map(|(title, category, cents, quantity)| NewProduct {
    title: title.to_string(),
    category: category.to_string(),
    price: Decimal::new(cents, 2),
    quantity,
  })
  .collect()
}

/// Inserts the demo catalog when no products exist yet. Returns how many were inserted.
#[instrument(name = "seed::products", skip(inventory))]
pub async fn seed_products(inventory: &InventoryService) -> AppResult<usize> {
  if !inventory.list_products().await?.is_empty() {
    info!("Catalog already populated; skipping seed.");
    return Ok(0);
  }
  let catalog = demo_catalog();
  let count = catalog.len();
  for product in catalog {
    inventory.create_product(product).await?;
  }
  info!(count, "Seeded demo products.");
  Ok(count)
}
