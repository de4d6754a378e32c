// stockflow_app/src/db/products.rs

use async_trait::async_trait;
use stockflow::{AdjustMode, AdjustOutcome, DecrementOutcome, NewProduct, Product, ProductStore, StoreError};
use tracing::instrument;
use uuid::Uuid;

use super::{store_error, PgStore, PRODUCT_COLUMNS};

#[async_trait]
impl ProductStore for PgStore {
  #[instrument(name = "db::insert_product", skip(self, product), err(Display))]
  async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
    let product = product.into_product(Uuid::new_v4(), chrono::Utc::now());
    sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (id, title, category, price, quantity, sell_count, status, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product.id)
    .bind(&product.title)
    .bind(&product.category)
    .bind(product.price)
    .bind(product.quantity)
    .bind(product.sell_count)
    .bind(product.status)
    .bind(product.created_at)
    .bind(product.updated_at)
    .fetch_one(self.pool())
    .await
    .map_err(store_error)
  }

  async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
    sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(store_error)
  }

  async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
    sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products ORDER BY title ASC", PRODUCT_COLUMNS))
      .fetch_all(self.pool())
      .await
      .map_err(store_error)
  }

  #[instrument(name = "db::decrement_stock", skip(self), err(Display))]
  async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<DecrementOutcome, StoreError> {
    // SET expressions see the pre-update row, so the CASE tests the resulting level.
    let applied = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products \
       SET quantity = quantity - $2, \
           sell_count = LEAST(sell_count::bigint + $2, 2147483647)::int, \
           status = CASE WHEN quantity - $2 <= 0 THEN 'out-of-stock'::stock_status ELSE status END, \
           updated_at = now() \
       WHERE id = $1 AND quantity >= $2 \
       RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(id)
    .bind(quantity)
    .fetch_optional(self.pool())
    .await
    .map_err(store_error)?;

    if let Some(product) = applied {
      return Ok(DecrementOutcome::Applied(product));
    }

    // Guard failed; find out why. The level reported here is informational only.
    let available: Option<i32> = sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1")
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(store_error)?;
    Ok(match available {
      Some(available) => DecrementOutcome::Insufficient { available },
      None => DecrementOutcome::Missing,
    })
  }

  #[instrument(name = "db::adjust_stock", skip(self), err(Display))]
  async fn adjust_stock(&self, id: Uuid, quantity: i32, mode: AdjustMode) -> Result<AdjustOutcome, StoreError> {
    // The bigint guard keeps an overflowing add from reaching the int4 column.
    let (assignment, guard) = match mode {
      AdjustMode::Add => (
        "quantity = quantity + $2, \
         status = CASE WHEN quantity + $2 > 0 THEN 'in-stock'::stock_status ELSE status END",
        "AND quantity::bigint + $2 <= 2147483647",
      ),
      AdjustMode::Set => (
        "quantity = $2, \
         status = CASE WHEN $2 > 0 THEN 'in-stock'::stock_status ELSE 'out-of-stock'::stock_status END",
        "",
      ),
    };
    let applied = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET {}, updated_at = now() WHERE id = $1 {} RETURNING {}",
      assignment, guard, PRODUCT_COLUMNS
    ))
    .bind(id)
    .bind(quantity)
    .fetch_optional(self.pool())
    .await
    .map_err(store_error)?;

    if let Some(product) = applied {
      return Ok(AdjustOutcome::Applied(product));
    }

    let current: Option<i32> = sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1")
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(store_error)?;
    Ok(match current {
      Some(current) => AdjustOutcome::Overflow { current },
      None => AdjustOutcome::Missing,
    })
  }
}
