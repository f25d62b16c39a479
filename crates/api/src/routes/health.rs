//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    models_ready: bool,
}

/// `GET /health`: liveness plus capability readiness. Always 200; readiness
/// is a field, not a status code, so probes can distinguish "starting" from
/// "dead".
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        models_ready: state.registry.is_ready(),
    })
}
