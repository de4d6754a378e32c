// stockflow_app/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

fn default_currency() -> String {
  "usd".to_string()
}

#[derive(Deserialize, Debug)]
pub struct PaymentIntentRequest {
  pub amount: Decimal,
  #[serde(default = "default_currency")]
  pub currency: String,
}

/// Card capture happens here, before the client submits the order itself.
#[instrument(name = "handler::create_payment_intent", skip(app_state))]
pub async fn create_payment_intent_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
  let intent = app_state
    .payments
    .create_intent(payload.amount, &payload.currency)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "clientSecret": intent.client_secret,
    "intentId": intent.intent_id,
    "amount": intent.amount,
    "currency": intent.currency,
    "status": intent.status,
  })))
}
