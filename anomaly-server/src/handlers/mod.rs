//! HTTP handlers

pub mod health;
pub mod anomalies;
pub mod status;
