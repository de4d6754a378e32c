// stockflow/src/analytics/periods.rs

//! Fixed-width trailing windows (UTC). A window of N buckets always yields N rows,
//! oldest first, with zeroes where nothing happened.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::model::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
  Day,
  Month,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
  pub key: i32,
  pub start: DateTime<Utc>,
  pub label: String,
}

#[derive(Debug, Clone)]
pub struct TrailingWindow {
  granularity: Granularity,
  buckets: Vec<Bucket>,
}

impl TrailingWindow {
  /// `len` calendar months ending with the month containing `now`.
  pub fn months(now: DateTime<Utc>, len: usize) -> Self {
    Self::build(Granularity::Month, now, len)
  }

  /// `len` calendar days ending with the day containing `now`.
  pub fn days(now: DateTime<Utc>, len: usize) -> Self {
    Self::build(Granularity::Day, now, len)
  }

  fn build(granularity: Granularity, now: DateTime<Utc>, len: usize) -> Self {
    let current = key_of(granularity, now);
    let buckets = (0..len as i32)
      .rev()
      .filter_map(|back| bucket(granularity, current - back))
      .collect();
    Self { granularity, buckets }
  }

  pub fn buckets(&self) -> &[Bucket] {
    &self.buckets
  }

  pub fn key_of(&self, at: DateTime<Utc>) -> i32 {
    key_of(self.granularity, at)
  }

  /// One row per bucket, built from whatever `values` holds for its key.
  pub fn fill<V, R>(&self, values: &HashMap<i32, V>, mut row: impl FnMut(&Bucket, Option<&V>) -> R) -> Vec<R> {
    self.buckets.iter().map(|b| row(b, values.get(&b.key))).collect()
  }
}

fn key_of(granularity: Granularity, at: DateTime<Utc>) -> i32 {
  match granularity {
    Granularity::Month => at.year() * 12 + at.month0() as i32,
    Granularity::Day => at.date_naive().num_days_from_ce(),
  }
}

fn bucket(granularity: Granularity, key: i32) -> Option<Bucket> {
  let (date, label_format) = match granularity {
    Granularity::Month => (
      NaiveDate::from_ymd_opt(key.div_euclid(12), key.rem_euclid(12) as u32 + 1, 1)?,
      "%Y-%m",
    ),
    Granularity::Day => (NaiveDate::from_num_days_from_ce_opt(key)?, "%Y-%m-%d"),
  };
  Some(Bucket {
    key,
    start: date.and_hms_opt(0, 0, 0)?.and_utc(),
    label: date.format(label_format).to_string(),
  })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRevenue {
  pub period: String,
  pub period_start: DateTime<Utc>,
  pub revenue: Decimal,
  pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCount {
  pub period: String,
  pub period_start: DateTime<Utc>,
  pub count: u64,
}

/// Delivered revenue per bucket. Non-delivered orders never contribute.
pub fn revenue_series(orders: &[Order], window: &TrailingWindow) -> Vec<PeriodRevenue> {
  let mut totals: HashMap<i32, (Decimal, u64)> = HashMap::new();
  for order in orders.iter().filter(|o| o.status.is_revenue_bearing()) {
    let entry = totals.entry(window.key_of(order.created_at)).or_default();
    entry.0 += order.total_amount;
    entry.1 += 1;
  }
  window.fill(&totals, |bucket, value| {
    let (revenue, orders) = value.copied().unwrap_or_default();
    PeriodRevenue {
      period: bucket.label.clone(),
      period_start: bucket.start,
      revenue: super::money(revenue),
      orders,
    }
  })
}

/// Counts per bucket for an arbitrary set of timestamps.
pub fn count_series(instants: impl IntoIterator<Item = DateTime<Utc>>, window: &TrailingWindow) -> Vec<PeriodCount> {
  let mut counts: HashMap<i32, u64> = HashMap::new();
  for at in instants {
    *counts.entry(window.key_of(at)).or_default() += 1;
  }
  window.fill(&counts, |bucket, value| PeriodCount {
    period: bucket.label.clone(),
    period_start: bucket.start,
    count: value.copied().unwrap_or(0),
  })
}
