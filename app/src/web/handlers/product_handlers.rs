// stockflow_app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use stockflow::{AdjustMode, NewProduct};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct InventoryAdjustmentRequest {
  pub quantity: i32,
  pub operation: AdjustMode,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.inventory.list_products().await?;
  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": products,
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.inventory.get_product(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": product,
  })))
}

#[instrument(name = "handler::create_product", skip(app_state, payload), fields(title = %payload.title))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.inventory.create_product(payload.into_inner()).await?;
  info!(product_id = %product.id, "Product created.");
  Ok(HttpResponse::Created().json(json!({
    "success": true,
    "data": product,
  })))
}

#[instrument(
  name = "handler::adjust_inventory",
  skip(app_state, path, payload),
  fields(product_id = %path.as_ref(), quantity = payload.quantity, operation = ?payload.operation)
)]
pub async fn adjust_inventory_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<InventoryAdjustmentRequest>,
) -> Result<HttpResponse, AppError> {
  let request = payload.into_inner();
  let product = app_state
    .inventory
    .adjust_manually(path.into_inner(), request.quantity, request.operation)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": product,
  })))
}
