// stockflow_app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use stockflow::{Error as EngineError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Engine(#[from] EngineError),

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    AppError::Engine(EngineError::Store(err))
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<EngineError>() {
      Ok(engine) => AppError::Engine(engine),
      Err(err) => match err.downcast::<sqlx::Error>() {
        Ok(db) => AppError::Sqlx(db),
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

impl AppError {
  /// Short, stable label for the `error` field of the response body.
  fn label(&self) -> &'static str {
    match self {
      AppError::Engine(EngineError::NotFound { .. }) => "Resource not found",
      AppError::Engine(EngineError::InsufficientStock { .. }) => "Insufficient stock",
      AppError::Engine(EngineError::InvalidTransition { .. }) => "Invalid status transition",
      AppError::Engine(EngineError::AnalyticsUnavailable { .. }) => "Analytics unavailable",
      AppError::Engine(EngineError::Validation(_)) | AppError::Validation(_) => "Validation failed",
      AppError::Engine(EngineError::Store(StoreError::Unavailable { .. })) => "Service temporarily unavailable",
      AppError::Engine(EngineError::Store(_)) | AppError::Sqlx(_) | AppError::Migration(_) => {
        "Database operation failed"
      }
      AppError::Payment(_) => "Payment failed",
      AppError::Config(_) => "Configuration issue",
      AppError::Internal(_) => "An internal error occurred",
    }
  }

  /// Store internals are never echoed back to clients.
  fn detail(&self) -> Option<String> {
    match self {
      AppError::Engine(EngineError::Store(_)) | AppError::Sqlx(_) | AppError::Migration(_) => None,
      AppError::Engine(inner) => Some(inner.to_string()),
      AppError::Validation(m) | AppError::Payment(m) | AppError::Config(m) | AppError::Internal(m) => Some(m.clone()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Engine(err) => match err {
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidTransition { .. } | EngineError::InsufficientStock { .. } => StatusCode::CONFLICT,
        EngineError::AnalyticsUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Store(_) if err.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migration(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    if status.is_server_error() {
      tracing::error!(application_error = %self, status = status.as_u16(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }
    HttpResponse::build(status).json(json!({
      "success": false,
      "error": self.label(),
      "detail": self.detail(),
    }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
