//! Anomalies handler
//!
//! Serves the result computed at startup. An empty set is a 404, which
//! callers must be able to tell apart from a 500.

use axum::{extract::State, Json};

use sensor_core::AnomalyRecord;

use crate::{AppError, AppResult, AppState};

/// List current anomalies in table order
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<AnomalyRecord>>> {
    if state.context.is_empty() {
        return Err(AppError::NotFound("No anomalies detected".to_string()));
    }

    let records = state.context.anomalies()?;
    Ok(Json(records))
}
