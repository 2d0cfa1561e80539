//! Pipeline diagnostics handler

use axum::{extract::State, Json};

use sensor_core::PipelineSummary;

use crate::AppState;

/// Row count, synthesized columns, detection outcome and parameters
pub async fn summary(State(state): State<AppState>) -> Json<PipelineSummary> {
    Json(state.context.summary())
}
