// stockflow/src/model/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "stock_status"))]
pub enum StockStatus {
  #[serde(rename = "in-stock")]
  #[cfg_attr(feature = "db", sqlx(rename = "in-stock"))]
  InStock,
  #[serde(rename = "out-of-stock")]
  #[cfg_attr(feature = "db", sqlx(rename = "out-of-stock"))]
  OutOfStock,
}

impl StockStatus {
  pub fn for_quantity(quantity: i32) -> Self {
    if quantity > 0 {
      StockStatus::InStock
    } else {
      StockStatus::OutOfStock
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustMode {
  Add,
  Set,
}

/// Live product record. `quantity` is only ever changed through the inventory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
  pub id: Uuid,
  pub title: String,
  pub category: String,
  pub price: Decimal,
  pub quantity: i32,
  pub sell_count: i32,
  pub status: StockStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Commits `quantity` sold units. The caller has already checked the guard
  /// `self.quantity >= quantity` inside the same critical section.
  ///
  /// Status only ever flips to out-of-stock on this path.
  pub fn apply_sale(&mut self, quantity: i32, at: DateTime<Utc>) {
    self.quantity -= quantity;
    self.sell_count = self.sell_count.saturating_add(quantity);
    if self.quantity <= 0 {
      self.status = StockStatus::OutOfStock;
    }
    self.updated_at = at;
  }

  /// Returns `false` and leaves the record untouched when an `add` would push the level past
  /// `i32::MAX`.
  pub fn apply_adjustment(&mut self, quantity: i32, mode: AdjustMode, at: DateTime<Utc>) -> bool {
    match mode {
      AdjustMode::Add => {
        let Some(level) = self.quantity.checked_add(quantity) else {
          return false;
        };
        self.quantity = level;
        if self.quantity > 0 {
          self.status = StockStatus::InStock;
        }
      }
      AdjustMode::Set => {
        self.quantity = quantity;
        self.status = StockStatus::for_quantity(quantity);
      }
    }
    self.updated_at = at;
    true
  }
}

/// Catalog insert payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  pub title: String,
  #[serde(default)]
  pub category: String,
  pub price: Decimal,
  #[serde(default)]
  pub quantity: i32,
}

impl NewProduct {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::Validation("Product title must not be empty".to_string()));
    }
    if self.price < Decimal::ZERO {
      return Err(Error::Validation("Product price must not be negative".to_string()));
    }
    if self.quantity < 0 {
      return Err(Error::Validation("Product quantity must not be negative".to_string()));
    }
    Ok(())
  }

  pub fn into_product(self, id: Uuid, at: DateTime<Utc>) -> Product {
    Product {
      id,
      status: StockStatus::for_quantity(self.quantity),
      title: self.title,
      category: self.category,
      price: self.price,
      quantity: self.quantity,
      sell_count: 0,
      created_at: at,
      updated_at: at,
    }
  }
}
