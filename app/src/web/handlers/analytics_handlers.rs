// stockflow_app/src/web/handlers/analytics_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

/// Upper bound for caller-supplied timeouts.
const MAX_TIMEOUT_MS: u64 = 60_000;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
  pub timeout_ms: Option<u64>,
}

impl ReportQuery {
  fn timeout(&self) -> Result<Option<Duration>, AppError> {
    match self.timeout_ms {
      None => Ok(None),
      Some(ms) if ms == 0 || ms > MAX_TIMEOUT_MS => Err(AppError::Validation(format!(
        "timeoutMs must be between 1 and {}",
        MAX_TIMEOUT_MS
      ))),
      Some(ms) => Ok(Some(Duration::from_millis(ms))),
    }
  }
}

#[instrument(name = "handler::business_overview", skip(app_state))]
pub async fn business_overview_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
  let data = app_state.analytics.business_overview(query.timeout()?).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[instrument(name = "handler::sales_products", skip(app_state))]
pub async fn sales_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
  let data = app_state.analytics.sales_products(query.timeout()?).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[instrument(name = "handler::customer_insights", skip(app_state))]
pub async fn customer_insights_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
  let data = app_state.analytics.customer_insights(query.timeout()?).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

/// Always 200: each report carries its own ready/unavailable outcome.
#[instrument(name = "handler::dashboard", skip(app_state))]
pub async fn dashboard_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
  let dashboard = app_state.analytics.dashboard(query.timeout()?).await;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": dashboard })))
}
