// stockflow_app/src/web/mod.rs

pub mod handlers;
pub mod routes;

#[cfg(test)]
mod tests;

pub use routes::{configure_app_routes, json_config, path_config, query_config};
