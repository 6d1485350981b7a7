//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use qrdrop_db::StoreCounts;
use std::sync::Arc;
use std::time::Duration;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(serde::Serialize)]
pub(super) struct ReadinessResponse {
    pub status: &'static str,
    pub storage_backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff: Option<StoreCounts>,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the hand-off store lock can be taken.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage_backend = state.handoff.storage_backend().to_string();

    match tokio::time::timeout(READINESS_TIMEOUT, state.handoff.store().counts()).await {
        Ok(counts) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                storage_backend,
                handoff: Some(counts),
            }),
        ),
        Err(_) => {
            tracing::error!("Readiness check timed out waiting for the hand-off store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "timeout",
                    storage_backend,
                    handoff: None,
                }),
            )
        }
    }
}
