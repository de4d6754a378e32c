// stockflow_app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use stockflow::{NewOrder, OrderFilter, OrderStatus, PaymentMethod};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
  pub status: Option<OrderStatus>,
  pub payment_method: Option<PaymentMethod>,
  pub user_id: Option<Uuid>,
  /// Inclusive lower bound on `createdAt` (RFC 3339).
  pub from: Option<DateTime<Utc>>,
  /// Exclusive upper bound on `createdAt` (RFC 3339).
  pub to: Option<DateTime<Utc>>,
}

impl TryFrom<ListOrdersQuery> for OrderFilter {
  type Error = AppError;

  fn try_from(query: ListOrdersQuery) -> Result<Self, Self::Error> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
      if from >= to {
        return Err(AppError::Validation(format!(
          "'from' ({}) must be earlier than 'to' ({})",
          from, to
        )));
      }
    }
    Ok(
      OrderFilter {
        status: query.status,
        payment_method: query.payment_method,
        user_id: query.user_id,
        ..OrderFilter::default()
      }
      .created_between(query.from, query.to),
    )
  }
}

#[derive(Deserialize, Debug)]
pub struct StatusUpdateRequest {
  pub status: OrderStatus,
}

#[instrument(
  name = "handler::create_order",
  skip(app_state, payload),
  fields(payment_method = %payload.payment_method, user_id = %payload.user_id)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  let placed = app_state.lifecycle.create_order(payload.into_inner()).await?;

  if let Some(report) = placed.reconciliation.as_ref().filter(|r| !r.is_complete()) {
    warn!(
      order_id = %placed.order.id,
      failed = report.failed_count(),
      "Order accepted with unreconciled line items."
    );
  }
  info!(order_id = %placed.order.id, invoice = placed.order.invoice, "Order placed.");

  Ok(HttpResponse::Created().json(json!({
    "success": true,
    "order": placed.order,
    "reconciliation": placed.reconciliation,
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let filter = OrderFilter::try_from(query.into_inner())?;
  let orders = app_state.lifecycle.list_orders(&filter).await?;
  info!(count = orders.len(), "Orders listed.");
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": orders,
  })))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(app_state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
  let order = app_state.lifecycle.get_order(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, path, payload),
  fields(order_id = %path.as_ref(), to = %payload.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
  let change = app_state
    .lifecycle
    .change_status(path.into_inner(), payload.status)
    .await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "order": change.order,
    "previousStatus": change.previous_status,
    "applied": change.applied,
    "reconciliation": change.reconciliation,
  })))
}
