// stockflow_app/src/main.rs

mod config;
mod db;
mod errors;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, StoreBackend};
use crate::db::PgStore;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use stockflow::{MemoryStore, OrderStore, ProductStore};
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

/// Picks the configured backend and wires both store traits onto it.
async fn build_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
  let (orders, products): (Arc<dyn OrderStore>, Arc<dyn ProductStore>) = match config.store_backend {
    StoreBackend::Postgres => {
      let store = Arc::new(PgStore::connect(&config).await?);
      if config.run_migrations {
        store.migrate().await?;
      }
      let orders: Arc<dyn OrderStore> = store.clone();
      let products: Arc<dyn ProductStore> = store;
      (orders, products)
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on restart.");
      let store = Arc::new(MemoryStore::new());
      let orders: Arc<dyn OrderStore> = store.clone();
      let products: Arc<dyn ProductStore> = store;
      (orders, products)
    }
  };

  let state = AppState::from_stores(orders, products, config.clone());
  if config.seed_db {
    db::seed::seed_products(&state.inventory).await?;
  }
  Ok(state)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  tracing::info!("Starting stockflow server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e.into());
    }
  };

  let app_state = build_state(app_config.clone()).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialise application state.");
    e
  })?;

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .app_data(web::json_config())
      .app_data(web::query_config())
      .app_data(web::path_config())
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await?;

  tracing::info!("Server stopped.");
  Ok(())
}
