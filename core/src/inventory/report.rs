// stockflow/src/inventory/report.rs

use serde::Serialize;
use uuid::Uuid;

use crate::error::Error;
use crate::model::StockStatus;

/// Per-line result of reconciling one order's cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
  pub order_id: Uuid,
  pub lines: Vec<LineReconciliation>,
}

impl ReconciliationReport {
  pub fn applied_count(&self) -> usize {
    self.lines.iter().filter(|line| line.outcome.is_applied()).count()
  }

  pub fn failed_count(&self) -> usize {
    self.lines.len() - self.applied_count()
  }

  pub fn is_complete(&self) -> bool {
    self.failed_count() == 0
  }

  pub fn failures(&self) -> impl Iterator<Item = &LineReconciliation> {
    self.lines.iter().filter(|line| !line.outcome.is_applied())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineReconciliation {
  pub product_id: Uuid,
  pub quantity: i32,
  pub outcome: LineOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum LineOutcome {
  #[serde(rename_all = "camelCase")]
  Applied { remaining_quantity: i32, status: StockStatus },
  Failed(LineFailure),
}

impl LineOutcome {
  pub fn is_applied(&self) -> bool {
    matches!(self, LineOutcome::Applied { .. })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum LineFailure {
  NotFound,
  #[serde(rename_all = "camelCase")]
  InsufficientStock { available: i32 },
  Invalid { message: String },
  Store { message: String },
}

impl From<&Error> for LineFailure {
  fn from(err: &Error) -> Self {
    match err {
      Error::NotFound { .. } => LineFailure::NotFound,
      Error::InsufficientStock { available, .. } => LineFailure::InsufficientStock { available: *available },
      Error::Store(_) => LineFailure::Store {
        message: err.to_string(),
      },
      other => LineFailure::Invalid {
        message: other.to_string(),
      },
    }
  }
}
