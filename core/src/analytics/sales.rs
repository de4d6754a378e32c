// stockflow/src/analytics/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::money;
use crate::model::Order;

const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
  pub product_id: Uuid,
  pub title: String,
  pub category: String,
  pub units_sold: i64,
  pub orders: u64,
  /// Quantity times the snapshot unit price.
  pub sales: Decimal,
  /// `sales` scaled by the configured gross revenue ratio. Never merged with `sales`.
  pub gross_revenue: Decimal,
  pub last_ordered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPerformance {
  pub category: String,
  pub units_sold: i64,
  pub sales: Decimal,
  pub gross_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
  pub total_units_sold: i64,
  pub total_sales: Decimal,
  pub total_gross_revenue: Decimal,
  pub gross_revenue_ratio: Decimal,
  pub top_products: Vec<ProductPerformance>,
  pub categories: Vec<CategoryPerformance>,
}

struct ProductTally {
  title: String,
  category: String,
  units: i64,
  orders: u64,
  sales: Decimal,
  last_ordered_at: DateTime<Utc>,
}

/// Unwinds the carts of delivered orders and groups them by product and by category.
pub fn compute(orders: &[Order], gross_revenue_ratio: Decimal, top_n: usize) -> SalesReport {
  let mut products: HashMap<Uuid, ProductTally> = HashMap::new();
  let mut categories: HashMap<String, (i64, Decimal)> = HashMap::new();

  for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
    for item in &order.cart {
      let units = i64::from(item.ordered_quantity);
      let value = item.line_total();
      let category = if item.category.trim().is_empty() {
        UNCATEGORIZED.to_string()
      } else {
        item.category.clone()
      };

      let tally = products.entry(item.product_id).or_insert_with(|| ProductTally {
        title: item.title.clone(),
        category: category.clone(),
        units: 0,
        orders: 0,
        sales: Decimal::ZERO,
        last_ordered_at: order.created_at,
      });
      tally.units += units;
      tally.orders += 1;
      tally.sales += value;
      // Most recent snapshot wins for display fields.
      if order.created_at >= tally.last_ordered_at {
        tally.last_ordered_at = order.created_at;
        tally.title = item.title.clone();
        tally.category = category.clone();
      }

      let cat = categories.entry(category).or_default();
      cat.0 += units;
      cat.1 += value;
    }
  }

  let gross = |sales: Decimal| money(sales * gross_revenue_ratio);

  let mut ranked: Vec<ProductPerformance> = products
    .into_iter()
    .map(|(product_id, t)| ProductPerformance {
      product_id,
      title: t.title,
      category: t.category,
      units_sold: t.units,
      orders: t.orders,
      sales: money(t.sales),
      gross_revenue: gross(t.sales),
      last_ordered_at: t.last_ordered_at,
    })
    .collect();
  let total_units_sold: i64 = ranked.iter().map(|p| p.units_sold).sum();
  let total_sales: Decimal = ranked.iter().map(|p| p.sales).sum();
  ranked.sort_by(|a, b| {
    b.units_sold
      .cmp(&a.units_sold)
      .then(b.last_ordered_at.cmp(&a.last_ordered_at))
      .then(a.product_id.cmp(&b.product_id))
  });
  ranked.truncate(top_n);

  let mut categories: Vec<CategoryPerformance> = categories
    .into_iter()
    .map(|(category, (units_sold, sales))| CategoryPerformance {
      category,
      units_sold,
      sales: money(sales),
      gross_revenue: gross(sales),
    })
    .collect();
  categories.sort_by(|a, b| b.sales.cmp(&a.sales).then(a.category.cmp(&b.category)));

  SalesReport {
    total_units_sold,
    total_sales: money(total_sales),
    total_gross_revenue: gross(total_sales),
    gross_revenue_ratio,
    top_products: ranked,
    categories,
  }
}
