// stockflow/src/analytics/mod.rs

//! Read-only KPIs over the order store.
//!
//! Every monetary figure is computed from `delivered` orders only; order counts may span all
//! statuses. Each report fetches its own snapshot under its own timeout and fails on its own
//! with `AnalyticsUnavailable`, so one broken report never takes the others down.

pub mod customers;
pub mod overview;
pub mod periods;
pub mod sales;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{event, instrument, Level};

use crate::error::{Error, Result};
use crate::model::{Order, OrderFilter};
use crate::store::OrderStore;

pub use customers::{CustomerInsights, CustomerSummary, Segment, SegmentSummary};
pub use overview::{BusinessOverview, PaymentMix, StatusCounts};
pub use periods::{PeriodCount, PeriodRevenue, TrailingWindow};
pub use sales::{CategoryPerformance, ProductPerformance, SalesReport};

pub const BUSINESS_OVERVIEW: &str = "business-overview";
pub const SALES_PRODUCTS: &str = "sales-products";
pub const CUSTOMER_INSIGHTS: &str = "customer-insights";

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
  /// Share of raw sales reported separately as gross revenue.
  pub gross_revenue_ratio: Decimal,
  /// Used when the caller does not pass its own timeout.
  pub report_timeout: Duration,
  pub top_n: usize,
}

impl Default for AnalyticsConfig {
  fn default() -> Self {
    Self {
      gross_revenue_ratio: Decimal::new(40, 2),
      report_timeout: Duration::from_secs(5),
      top_n: 10,
    }
  }
}

/// Outcome of one report inside a combined dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReportOutcome<T> {
  Ready { data: T },
  Unavailable { error: String },
}

impl<T> From<Result<T>> for ReportOutcome<T> {
  fn from(result: Result<T>) -> Self {
    match result {
      Ok(data) => ReportOutcome::Ready { data },
      Err(err) => ReportOutcome::Unavailable { error: err.to_string() },
    }
  }
}

impl<T> ReportOutcome<T> {
  pub fn is_ready(&self) -> bool {
    matches!(self, ReportOutcome::Ready { .. })
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub business_overview: ReportOutcome<BusinessOverview>,
  pub sales_products: ReportOutcome<SalesReport>,
  pub customer_insights: ReportOutcome<CustomerInsights>,
}

#[derive(Clone)]
pub struct AnalyticsEngine {
  orders: Arc<dyn OrderStore>,
  config: AnalyticsConfig,
}

impl AnalyticsEngine {
  pub fn new(orders: Arc<dyn OrderStore>, config: AnalyticsConfig) -> Self {
    Self { orders, config }
  }

  pub async fn business_overview(&self, timeout: Option<Duration>) -> Result<BusinessOverview> {
    self.business_overview_at(Utc::now(), timeout).await
  }

  pub async fn business_overview_at(&self, now: DateTime<Utc>, timeout: Option<Duration>) -> Result<BusinessOverview> {
    self
      .run_report(BUSINESS_OVERVIEW, timeout, |orders| overview::compute(orders, now))
      .await
  }

  pub async fn sales_products(&self, timeout: Option<Duration>) -> Result<SalesReport> {
    let ratio = self.config.gross_revenue_ratio;
    let top_n = self.config.top_n;
    self
      .run_report(SALES_PRODUCTS, timeout, |orders| sales::compute(orders, ratio, top_n))
      .await
  }

  pub async fn customer_insights(&self, timeout: Option<Duration>) -> Result<CustomerInsights> {
    self.customer_insights_at(Utc::now(), timeout).await
  }

  pub async fn customer_insights_at(&self, now: DateTime<Utc>, timeout: Option<Duration>) -> Result<CustomerInsights> {
    let top_n = self.config.top_n;
    self
      .run_report(CUSTOMER_INSIGHTS, timeout, |orders| customers::compute(orders, now, top_n))
      .await
  }

  /// All three reports, run concurrently. Each carries its own outcome.
  pub async fn dashboard_at(&self, now: DateTime<Utc>, timeout: Option<Duration>) -> Dashboard {
    let (business_overview, sales_products, customer_insights) = tokio::join!(
      self.business_overview_at(now, timeout),
      self.sales_products(timeout),
      self.customer_insights_at(now, timeout),
    );
    Dashboard {
      business_overview: business_overview.into(),
      sales_products: sales_products.into(),
      customer_insights: customer_insights.into(),
    }
  }

  pub async fn dashboard(&self, timeout: Option<Duration>) -> Dashboard {
    self.dashboard_at(Utc::now(), timeout).await
  }

  #[instrument(name = "AnalyticsEngine::run_report", skip(self, compute), err(Display))]
  async fn run_report<T, F>(&self, report: &'static str, timeout: Option<Duration>, compute: F) -> Result<T>
  where
    F: FnOnce(&[Order]) -> T,
  {
    let limit = timeout.unwrap_or(self.config.report_timeout);
    let snapshot = match tokio::time::timeout(limit, self.orders.list_orders(&OrderFilter::default())).await {
      Ok(Ok(orders)) => orders,
      Ok(Err(store_err)) => {
        return Err(Error::AnalyticsUnavailable {
          report,
          reason: store_err.to_string(),
        });
      }
      Err(_) => {
        return Err(Error::AnalyticsUnavailable {
          report,
          reason: format!("timed out after {} ms", limit.as_millis()),
        });
      }
    };
    event!(Level::DEBUG, orders = snapshot.len(), "Report snapshot loaded.");
    Ok(compute(&snapshot))
  }
}

pub(crate) fn money(value: Decimal) -> Decimal {
  value.round_dp(2)
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub(crate) fn ratio_percent(part: u64, whole: u64) -> Decimal {
  if whole == 0 {
    return Decimal::ZERO;
  }
  (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)).round_dp(2)
}

/// Growth from `previous` to `current` in percent. `None` when there is no baseline.
pub(crate) fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
  if previous.is_zero() {
    return None;
  }
  Some(((current - previous) * Decimal::ONE_HUNDRED / previous).round_dp(2))
}
