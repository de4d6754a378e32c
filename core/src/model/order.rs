// stockflow/src/model/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Lifecycle status of an order.
///
/// Moves forward through `pending -> processing -> delivered`, or sideways to `cancel`.
/// `delivered` and `cancel` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "order_status", rename_all = "lowercase"))]
pub enum OrderStatus {
  Pending,
  Processing,
  Delivered,
  Cancel,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Delivered,
    OrderStatus::Cancel,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancel => "cancel",
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, OrderStatus::Delivered | OrderStatus::Cancel)
  }

  /// Only delivered orders count toward any monetary aggregate.
  pub fn is_revenue_bearing(&self) -> bool {
    matches!(self, OrderStatus::Delivered)
  }

  pub fn can_transition_to(&self, to: OrderStatus) -> bool {
    Self::sources_for(to).contains(self)
  }

  /// Statuses from which `to` may legally be entered. Used as the guard of the
  /// store's conditional update, so it never contains `to` itself.
  pub fn sources_for(to: OrderStatus) -> &'static [OrderStatus] {
    match to {
      OrderStatus::Pending => &[],
      OrderStatus::Processing => &[OrderStatus::Pending],
      OrderStatus::Delivered => &[OrderStatus::Pending, OrderStatus::Processing],
      OrderStatus::Cancel => &[OrderStatus::Pending, OrderStatus::Processing],
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| Error::Validation(format!("Unknown order status '{}'", s)))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "payment_method"))]
pub enum PaymentMethod {
  #[serde(rename = "COD")]
  #[cfg_attr(feature = "db", sqlx(rename = "COD"))]
  Cod,
  #[serde(rename = "Card")]
  #[cfg_attr(feature = "db", sqlx(rename = "Card"))]
  Card,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::Cod => "COD",
      PaymentMethod::Card => "Card",
    }
  }

  /// Card payments are captured before the order exists, so stock is committed at creation.
  /// Cash on delivery commits stock only once delivery is confirmed.
  pub fn reconciles_at_creation(&self) -> bool {
    matches!(self, PaymentMethod::Card)
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One cart entry, snapshotted when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub product_id: Uuid,
  pub title: String,
  pub unit_price: Decimal,
  pub ordered_quantity: i32,
  #[serde(default)]
  pub category: String,
}

impl LineItem {
  pub fn line_total(&self) -> Decimal {
    self.unit_price * Decimal::from(self.ordered_quantity)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
  pub id: Uuid,
  pub invoice: i64,
  #[cfg_attr(feature = "db", sqlx(json))]
  pub cart: Vec<LineItem>,
  pub status: OrderStatus,
  pub payment_method: PaymentMethod,
  pub sub_total: Decimal,
  pub shipping_cost: Decimal,
  pub discount: Decimal,
  pub total_amount: Decimal,
  #[serde(rename = "user")]
  pub user_id: Uuid,
  pub customer_name: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Checkout payload. Becomes an `Order` once the store assigns id, invoice and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  pub cart: Vec<LineItem>,
  pub payment_method: PaymentMethod,
  #[serde(default)]
  pub sub_total: Option<Decimal>,
  #[serde(default)]
  pub shipping_cost: Decimal,
  #[serde(default)]
  pub discount: Decimal,
  pub total_amount: Decimal,
  #[serde(rename = "user")]
  pub user_id: Uuid,
  #[serde(default)]
  pub customer_name: Option<String>,
}

impl NewOrder {
  pub fn validate(&self) -> Result<()> {
    if self.cart.is_empty() {
      return Err(Error::Validation("Order cart must contain at least one item".to_string()));
    }
    for (idx, item) in self.cart.iter().enumerate() {
      if item.ordered_quantity <= 0 {
        return Err(Error::Validation(format!(
          "Cart item {} ({}) has non-positive quantity {}",
          idx, item.product_id, item.ordered_quantity
        )));
      }
      if item.unit_price < Decimal::ZERO {
        return Err(Error::Validation(format!(
          "Cart item {} ({}) has negative unit price",
          idx, item.product_id
        )));
      }
    }
    let amounts = [
      ("totalAmount", Some(self.total_amount)),
      ("shippingCost", Some(self.shipping_cost)),
      ("discount", Some(self.discount)),
      ("subTotal", self.sub_total),
    ];
    for (field, value) in amounts {
      if value.is_some_and(|v| v < Decimal::ZERO) {
        return Err(Error::Validation(format!("{} must not be negative", field)));
      }
    }
    Ok(())
  }

  /// Explicit sub-total, or the sum of the cart lines when the client omitted it.
  pub fn resolved_sub_total(&self) -> Decimal {
    self
      .sub_total
      .unwrap_or_else(|| self.cart.iter().map(LineItem::line_total).sum())
  }
}

/// Narrowing for order listings. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
  pub status: Option<OrderStatus>,
  pub payment_method: Option<PaymentMethod>,
  pub user_id: Option<Uuid>,
  pub created_from: Option<DateTime<Utc>>,
  pub created_to: Option<DateTime<Utc>>,
}

impl OrderFilter {
  pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
    self.payment_method = Some(method);
    self
  }

  pub fn with_user(mut self, user_id: Uuid) -> Self {
    self.user_id = Some(user_id);
    self
  }

  pub fn created_between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
    self.created_from = from;
    self.created_to = to;
    self
  }

  pub fn matches(&self, order: &Order) -> bool {
    self.status.map_or(true, |s| order.status == s)
      && self.payment_method.map_or(true, |m| order.payment_method == m)
      && self.user_id.map_or(true, |u| order.user_id == u)
      && self.created_from.map_or(true, |from| order.created_at >= from)
      && self.created_to.map_or(true, |to| order.created_at < to)
  }
}
