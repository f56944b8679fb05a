//! HTTP handlers for arango-gateway.

pub mod documents;

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

/// Liveness probe. Never touches ArangoDB.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "arango-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: ready when ArangoDB accepts our credentials.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.arango.authenticate().await.map_err(|e| {
        tracing::warn!(error = %e, "ArangoDB not reachable for readiness check");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(json!({ "status": "ready" })))
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        crate::services::get_metrics(),
    )
}
