use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::AppState;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running")),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "push-notification-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.push_provider.name()
    }))
}

/// Readiness check; fails when the push provider is misconfigured.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Ready to dispatch"),
        (status = 503, description = "Push provider unavailable")
    ),
    tag = "Observability"
)]
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.push_provider.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Push provider failed readiness check");
        AppError::ServiceUnavailable
    })?;
    Ok(StatusCode::OK)
}
