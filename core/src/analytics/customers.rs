// stockflow/src/analytics/customers.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::periods::{count_series, PeriodCount, TrailingWindow};
use super::{money, ratio_percent};
use crate::model::Order;

pub const ACQUISITION_WINDOW: usize = 12;

/// Lifetime-spend bands (delivered orders only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
  Low,
  Medium,
  High,
  Premium,
}

impl Segment {
  pub const ALL: [Segment; 4] = [Segment::Low, Segment::Medium, Segment::High, Segment::Premium];

  /// Inclusive lower bound, exclusive upper bound.
  pub fn bounds(&self) -> (Decimal, Option<Decimal>) {
    match self {
      Segment::Low => (Decimal::ZERO, Some(Decimal::from(100))),
      Segment::Medium => (Decimal::from(100), Some(Decimal::from(500))),
      Segment::High => (Decimal::from(500), Some(Decimal::from(1000))),
      Segment::Premium => (Decimal::from(1000), None),
    }
  }

  pub fn for_spend(spend: Decimal) -> Segment {
    Segment::ALL
      .into_iter()
      .find(|segment| segment.bounds().1.map_or(true, |upper| spend < upper))
      .unwrap_or(Segment::Premium)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
  pub segment: Segment,
  pub min_spend: Decimal,
  pub max_spend: Option<Decimal>,
  pub customers: u64,
  pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
  pub user_id: Uuid,
  pub name: Option<String>,
  pub orders: u64,
  pub delivered_orders: u64,
  pub lifetime_value: Decimal,
  pub average_order_value: Decimal,
  pub last_order_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInsights {
  /// Customers with at least one order, any status.
  pub total_customers: u64,
  /// Customers with more than one order, any status.
  pub returning_customers: u64,
  /// `returning_customers / total_customers` as a percentage.
  pub retention_rate: Decimal,
  pub average_lifetime_value: Decimal,
  pub segments: Vec<SegmentSummary>,
  pub top_customers: Vec<CustomerSummary>,
  pub acquisition: Vec<PeriodCount>,
}

struct CustomerTally {
  name: Option<String>,
  name_seen_at: Option<DateTime<Utc>>,
  orders: u64,
  delivered_orders: u64,
  spend: Decimal,
  first_order_at: DateTime<Utc>,
  last_order_at: DateTime<Utc>,
}

pub fn compute(orders: &[Order], now: DateTime<Utc>, top_n: usize) -> CustomerInsights {
  let mut customers: HashMap<Uuid, CustomerTally> = HashMap::new();

  for order in orders {
    let tally = customers.entry(order.user_id).or_insert_with(|| CustomerTally {
      name: None,
      name_seen_at: None,
      orders: 0,
      delivered_orders: 0,
      spend: Decimal::ZERO,
      first_order_at: order.created_at,
      last_order_at: order.created_at,
    });
    tally.orders += 1;
    tally.first_order_at = tally.first_order_at.min(order.created_at);
    tally.last_order_at = tally.last_order_at.max(order.created_at);
    if order.status.is_revenue_bearing() {
      tally.delivered_orders += 1;
      tally.spend += order.total_amount;
    }
    if let Some(name) = &order.customer_name {
      if tally.name_seen_at.map_or(true, |seen| order.created_at >= seen) {
        tally.name = Some(name.clone());
        tally.name_seen_at = Some(order.created_at);
      }
    }
  }

  let total_customers = customers.len() as u64;
  let returning_customers = customers.values().filter(|c| c.orders > 1).count() as u64;
  let total_spend: Decimal = customers.values().map(|c| c.spend).sum();

  let mut segments: Vec<SegmentSummary> = Segment::ALL
    .into_iter()
    .map(|segment| {
      let (min_spend, max_spend) = segment.bounds();
      SegmentSummary {
        segment,
        min_spend,
        max_spend,
        customers: 0,
        revenue: Decimal::ZERO,
      }
    })
    .collect();
  for tally in customers.values() {
    let segment = Segment::for_spend(tally.spend);
    if let Some(summary) = segments.iter_mut().find(|s| s.segment == segment) {
      summary.customers += 1;
      summary.revenue += tally.spend;
    }
  }
  for summary in &mut segments {
    summary.revenue = money(summary.revenue);
  }

  let window = TrailingWindow::months(now, ACQUISITION_WINDOW);
  let acquisition = count_series(customers.values().map(|c| c.first_order_at), &window);

  let mut top_customers: Vec<CustomerSummary> = customers
    .into_iter()
    .map(|(user_id, c)| CustomerSummary {
      user_id,
      name: c.name,
      orders: c.orders,
      delivered_orders: c.delivered_orders,
      lifetime_value: money(c.spend),
      average_order_value: if c.delivered_orders == 0 {
        Decimal::ZERO
      } else {
        money(c.spend / Decimal::from(c.delivered_orders))
      },
      last_order_at: c.last_order_at,
    })
    .collect();
  top_customers.sort_by(|a, b| {
    b.lifetime_value
      .cmp(&a.lifetime_value)
      .then(b.last_order_at.cmp(&a.last_order_at))
      .then(a.user_id.cmp(&b.user_id))
  });
  top_customers.truncate(top_n);

  CustomerInsights {
    total_customers,
    returning_customers,
    retention_rate: ratio_percent(returning_customers, total_customers),
    average_lifetime_value: if total_customers == 0 {
      Decimal::ZERO
    } else {
      money(total_spend / Decimal::from(total_customers))
    },
    segments,
    top_customers,
    acquisition,
  }
}
