use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::database;
use crate::web::router::AppState;

/// Liveness probe endpoint.
/// Returns 200 OK if the service is running.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe endpoint.
/// Checks database connectivity; returns 503 until the pool answers.
pub async fn readiness(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match database::health_check(&state.pool).await {
        Ok(health) => Ok(Json(json!({
            "status": "ready",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "database": {
                    "status": "ok",
                    "response_time_ms": health.response_time_ms,
                    "active_connections": health.active_connections,
                }
            }
        }))),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Health check endpoint with build information
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "build_timestamp": env!("BUILD_TIMESTAMP"),
    }))
}
