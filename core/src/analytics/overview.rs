// stockflow/src/analytics/overview.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::periods::{revenue_series, PeriodRevenue, TrailingWindow};
use super::{money, percent_change};
use crate::model::{Order, OrderStatus, PaymentMethod};

pub const MONTHLY_WINDOW: usize = 12;
pub const DAILY_WINDOW: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusCounts {
  pub pending: u64,
  pub processing: u64,
  pub delivered: u64,
  pub cancel: u64,
}

impl StatusCounts {
  fn bump(&mut self, status: OrderStatus) {
    match status {
      OrderStatus::Pending => self.pending += 1,
      OrderStatus::Processing => self.processing += 1,
      OrderStatus::Delivered => self.delivered += 1,
      OrderStatus::Cancel => self.cancel += 1,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentMix {
  pub cod: Decimal,
  pub card: Decimal,
}

/// Headline KPIs plus chart series. Counts cover every status, money covers delivered only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessOverview {
  pub total_orders: u64,
  pub orders_by_status: StatusCounts,
  pub total_revenue: Decimal,
  pub average_order_value: Decimal,
  pub revenue_by_payment_method: PaymentMix,
  pub revenue_this_month: Decimal,
  pub revenue_last_month: Decimal,
  pub revenue_growth_percent: Option<Decimal>,
  pub monthly_revenue: Vec<PeriodRevenue>,
  pub daily_revenue: Vec<PeriodRevenue>,
  pub generated_at: DateTime<Utc>,
}

pub fn compute(orders: &[Order], now: DateTime<Utc>) -> BusinessOverview {
  let mut orders_by_status = StatusCounts::default();
  let mut total_revenue = Decimal::ZERO;
  let mut mix = PaymentMix::default();

  for order in orders {
    orders_by_status.bump(order.status);
    if !order.status.is_revenue_bearing() {
      continue;
    }
    total_revenue += order.total_amount;
    match order.payment_method {
      PaymentMethod::Cod => mix.cod += order.total_amount,
      PaymentMethod::Card => mix.card += order.total_amount,
    }
  }

  let average_order_value = if orders_by_status.delivered == 0 {
    Decimal::ZERO
  } else {
    total_revenue / Decimal::from(orders_by_status.delivered)
  };

  let monthly_revenue = revenue_series(orders, &TrailingWindow::months(now, MONTHLY_WINDOW));
  let daily_revenue = revenue_series(orders, &TrailingWindow::days(now, DAILY_WINDOW));

  let revenue_this_month = monthly_revenue.last().map_or(Decimal::ZERO, |p| p.revenue);
  let revenue_last_month = monthly_revenue
    .iter()
    .rev()
    .nth(1)
    .map_or(Decimal::ZERO, |p| p.revenue);

  BusinessOverview {
    total_orders: orders.len() as u64,
    orders_by_status,
    total_revenue: money(total_revenue),
    average_order_value: money(average_order_value),
    revenue_by_payment_method: PaymentMix {
      cod: money(mix.cod),
      card: money(mix.card),
    },
    revenue_this_month,
    revenue_last_month,
    revenue_growth_percent: percent_change(revenue_last_month, revenue_this_month),
    monthly_revenue,
    daily_revenue,
    generated_at: now,
  }
}
