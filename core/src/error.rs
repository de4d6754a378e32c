// stockflow/src/error.rs
use anyhow::Error as AnyhowError;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::model::OrderStatus;

/// Failure raised by an `OrderStore` / `ProductStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
  /// Connection refused, pool exhausted, timeout. Worth retrying.
  #[error("Store unavailable. Source: {source}")]
  Unavailable {
    #[source]
    source: AnyhowError,
  },

  #[error("Store operation failed. Source: {source}")]
  Backend {
    #[source]
    source: AnyhowError,
  },

  #[error("Stored record could not be decoded: {0}")]
  Corrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  Order,
  Product,
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Entity::Order => f.write_str("Order"),
      Entity::Product => f.write_str("Product"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: Entity, id: Uuid },

  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  InsufficientStock {
    product_id: Uuid,
    requested: i32,
    available: i32,
  },

  #[error("Invalid status transition from '{from}' to '{to}'")]
  InvalidTransition { from: OrderStatus, to: OrderStatus },

  #[error("Analytics report '{report}' unavailable: {reason}")]
  AnalyticsUnavailable { report: &'static str, reason: String },

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl Error {
  pub fn order_not_found(id: Uuid) -> Self {
    Error::NotFound { entity: Entity::Order, id }
  }

  pub fn product_not_found(id: Uuid) -> Self {
    Error::NotFound { entity: Entity::Product, id }
  }

  /// Whether the caller may retry the same operation unchanged.
  pub fn is_transient(&self) -> bool {
    matches!(self, Error::Store(StoreError::Unavailable { .. }))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
