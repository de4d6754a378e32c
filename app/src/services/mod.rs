// stockflow_app/src/services/mod.rs

pub mod payment;
