// src/presentation/http/controllers/status.rs
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy",
        error: None,
    })
}

/// Ready once both the cache store and the database answer.
pub async fn ready(Extension(state): Extension<HttpState>) -> (StatusCode, Json<StatusResponse>) {
    if let Err(err) = state.services.ping_cache().await {
        tracing::warn!(error = %err, "readiness: cache store unreachable");
        return unready("Cache Error");
    }

    if let Err(err) = sqlx::query("SELECT 1").execute(&state.db_pool).await {
        tracing::warn!(error = %err, "readiness: database unreachable");
        return unready("Database Error");
    }

    (
        StatusCode::OK,
        Json(StatusResponse {
            status: "ready",
            error: None,
        }),
    )
}

fn unready(error: &'static str) -> (StatusCode, Json<StatusResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(StatusResponse {
            status: "unready",
            error: Some(error),
        }),
    )
}
