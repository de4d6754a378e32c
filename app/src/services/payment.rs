// stockflow_app/src/services/payment.rs

//! Stand-in for the card payment-capture provider. Card checkouts call it before the order is
//! created; the order service trusts the caller and never re-verifies the capture.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result as AppResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
  pub intent_id: String,
  pub client_secret: String,
  /// Minor units, as payment providers expect.
  pub amount: i64,
  pub currency: String,
  pub status: String,
  pub account_id: String,
}

#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
  account_id: String,
}

impl MockPaymentGateway {
  pub fn new(account_id: String) -> Self {
    Self { account_id }
  }

  #[instrument(name = "payment::create_intent", skip(self), fields(payment_account_id = %self.account_id))]
  pub async fn create_intent(&self, amount: Decimal, currency: &str) -> AppResult<PaymentIntent> {
    if amount <= Decimal::ZERO {
      return Err(AppError::Payment("Amount must be greater than zero".to_string()));
    }
    let currency = currency.trim().to_ascii_lowercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(AppError::Validation(format!("Unsupported currency code '{}'", currency)));
    }
    let minor_units: i64 = (amount * Decimal::ONE_HUNDRED)
      .round()
      .try_into()
      .map_err(|_| AppError::Payment(format!("Amount {} is out of range", amount)))?;

    tokio::time::sleep(std::time::Duration::from_millis(20)).await; // Simulate network latency

    let intent_id = format!("mock_pi_{}", Uuid::new_v4().simple());
    info!(%intent_id, amount = minor_units, "Payment intent created.");
    Ok(PaymentIntent {
      client_secret: format!("{}_secret_{}", intent_id, Uuid::new_v4().simple()),
      intent_id,
      amount: minor_units,
      currency,
      status: "requires_confirmation".to_string(),
      account_id: self.account_id.clone(),
    })
  }
}
