// stockflow_app/src/web/routes.rs

use actix_web::web;

use crate::errors::AppError;
use crate::web::handlers::{analytics_handlers, order_handlers, payment_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed bodies become validation errors with the usual error body.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .limit(256 * 1024)
    .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
  web::PathConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route(
            "/{order_id}/status",
            web::put().to(order_handlers::update_order_status_handler),
          ),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route(
            "/{product_id}/inventory",
            web::post().to(product_handlers::adjust_inventory_handler),
          ),
      )
      .service(
        web::scope("/payments").route(
          "/intent",
          web::post().to(payment_handlers::create_payment_intent_handler),
        ),
      )
      .service(
        web::scope("/analytics")
          .route(
            "/business-overview",
            web::get().to(analytics_handlers::business_overview_handler),
          )
          .route(
            "/sales-products",
            web::get().to(analytics_handlers::sales_products_handler),
          )
          .route(
            "/customer-insights",
            web::get().to(analytics_handlers::customer_insights_handler),
          )
          .route("/dashboard", web::get().to(analytics_handlers::dashboard_handler)),
      ),
  );
}
