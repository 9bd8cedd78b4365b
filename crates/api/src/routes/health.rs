use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the outputs directory is present.
    pub outputs_healthy: bool,
}

/// GET /health -- returns service and outputs-directory health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let outputs_healthy = tokio::fs::try_exists(&state.config.outputs_dir)
        .await
        .unwrap_or(false);

    let status = if outputs_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        outputs_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
