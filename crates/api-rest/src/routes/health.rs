use axum::{extract::State, Json};
use tracing::debug;

use crate::models::HealthStatus;
use crate::AppState;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    debug!("Health check endpoint called");
    Json(HealthStatus::ok(state.started.elapsed()))
}
