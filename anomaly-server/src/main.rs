//! Sensor Anomaly Server
//!
//! Serves the sensor anomalies detected at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SENSOR ANOMALY SERVER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  startup (once)                                             │
//! │  ┌──────────┐   ┌───────────────┐   ┌──────────────────┐    │
//! │  │  Loader  │──►│  Isolation    │──►│  Explanation     │    │
//! │  │  (CSV)   │   │  Forest       │   │  Rules           │    │
//! │  └──────────┘   └───────────────┘   └────────┬─────────┘    │
//! │                                              ▼              │
//! │                               Arc<AnomalyContext> (frozen)  │
//! │                                              │              │
//! │  ┌───────────────────────────────────────────┴───────────┐  │
//! │  │  API (Axum): /anomalies  /status  /health             │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod handlers;
mod error;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensor_core::AnomalyContext;

pub use error::{AppError, AppResult};

const DEFAULT_LOG_FILTER: &str = "sensor_anomaly_server=debug,sensor_core=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("Sensor Anomaly Server starting...");
    tracing::info!("Data file: {}", config.data_path.display());

    // Loader → Detector → Explainer, once
    let context = match AnomalyContext::initialize(&config.data_path) {
        Ok(context) => context,
        Err(e) => {
            tracing::error!("Error loading sensor data: {}", e);
            return Err(e).context("cannot start without sensor data");
        }
    };

    let summary = context.summary();
    if !summary.table.synthesized_columns.is_empty() {
        tracing::warn!("Synthesized columns: {:?}", summary.table.synthesized_columns);
    }
    tracing::info!(
        "Pipeline ready: {} rows, {} anomalies",
        summary.table.rows,
        summary.anomaly_count
    );

    let state = AppState {
        context: Arc::new(context),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// JSON logs in production, human-readable otherwise
fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup
    pub context: Arc<AnomalyContext>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/status", get(handlers::status::summary))
        .route("/anomalies", get(handlers::anomalies::list))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
