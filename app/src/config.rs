// stockflow_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub store_backend: StoreBackend,
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  // Inserts demo products on startup when the catalog is empty
  pub seed_db: bool,

  pub analytics_timeout: Duration,
  pub gross_revenue_ratio: Decimal,

  pub mock_payment_account_id: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", get_env("SERVER_PORT"), 8080u16)?;

    let store_backend = match get_env("STORE_BACKEND") {
      Some(raw) => raw.parse::<StoreBackend>()?,
      None => StoreBackend::Postgres,
    };
    let database_url = get_env("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when STORE_BACKEND=postgres)".to_string(),
      ));
    }
    let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", get_env("DATABASE_MAX_CONNECTIONS"), 10u32)?;
    let run_migrations = parse_var("RUN_MIGRATIONS", get_env("RUN_MIGRATIONS"), true)?;
    let seed_db = parse_var("SEED_DB", get_env("SEED_DB"), false)?;

    let analytics_timeout_ms = parse_var("ANALYTICS_TIMEOUT_MS", get_env("ANALYTICS_TIMEOUT_MS"), 5000u64)?;
    if analytics_timeout_ms == 0 {
      return Err(AppError::Config("ANALYTICS_TIMEOUT_MS must be greater than zero".to_string()));
    }
    let gross_revenue_ratio = parse_var("GROSS_REVENUE_RATIO", get_env("GROSS_REVENUE_RATIO"), Decimal::new(40, 2))?;
    if gross_revenue_ratio < Decimal::ZERO || gross_revenue_ratio > Decimal::ONE {
      return Err(AppError::Config(format!(
        "GROSS_REVENUE_RATIO must be between 0 and 1, got {}",
        gross_revenue_ratio
      )));
    }

    let mock_payment_account_id = get_env("MOCK_PAYMENT_ACCOUNT_ID").unwrap_or_else(|| "mock_main_acct".to_string());

    tracing::info!(backend = ?store_backend, "Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      database_max_connections,
      run_migrations,
      seed_db,
      analytics_timeout: Duration::from_millis(analytics_timeout_ms),
      gross_revenue_ratio,
      mock_payment_account_id,
    })
  }

  /// In-memory configuration used by the HTTP tests.
  #[cfg(test)]
  pub fn for_memory() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      store_backend: StoreBackend::Memory,
      database_url: None,
      database_max_connections: 1,
      run_migrations: false,
      seed_db: false,
      analytics_timeout: Duration::from_secs(5),
      gross_revenue_ratio: Decimal::new(40, 2),
      mock_payment_account_id: "mock_main_acct".to_string(),
    }
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, value, e))),
  }
}
