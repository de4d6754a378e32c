// stockflow_app/src/db/mod.rs

//! Postgres implementation of the engine's store traits.
//!
//! Every guarded write is one SQL statement with its guard in the `WHERE` clause, so Postgres
//! row locking gives the same atomicity the in-memory store gets from its mutex.

mod orders;
mod products;
pub mod seed;


use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use stockflow::StoreError;

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};

const PRODUCT_COLUMNS: &str = "id, title, category, price, quantity, sell_count, status, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, invoice, cart, status, payment_method, sub_total, shipping_cost, discount, \
                             total_amount, user_id, customer_name, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  pub async fn connect(config: &AppConfig) -> AppResult<Self> {
    let url = config
      .database_url
      .as_deref()
      .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
    let pool = PgPoolOptions::new()
      .max_connections(config.database_max_connections)
      .connect(url)
      .await?;
    tracing::info!(
      max_connections = config.database_max_connections,
      "Successfully connected to the database."
    );
    Ok(Self::new(pool))
  }

  pub async fn migrate(&self) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
  }
}

/// Connectivity problems are retryable; decoding problems mean the row does not fit the model.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
  match err {
    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
      StoreError::Unavailable { source: err.into() }
    }
    sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
      StoreError::Corrupt(err.to_string())
    }
    other => StoreError::Backend { source: other.into() },
  }
}
