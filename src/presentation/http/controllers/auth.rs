// src/presentation/http/controllers/auth.rs
use crate::application::{commands::accounts::SignInCommand, dto::SessionInfoDto};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

pub async fn sign_in(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<SignInRequest>,
) -> HttpResult<Json<SignInResponse>> {
    let command = SignInCommand {
        email: payload.email,
        password: payload.password,
    };

    let issued = state.services.accounts.sign_in(command).await.into_http()?;

    Ok(Json(SignInResponse {
        success: true,
        token: issued.token,
        expires_at: issued.expires_at,
        expires_in: issued.expires_in,
    }))
}

pub async fn sign_out(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
) -> HttpResult<Json<MessageResponse>> {
    state.services.accounts.sign_out(&actor).await.into_http()?;
    Ok(Json(MessageResponse::ok("Logged out successfully")))
}

pub async fn list_sessions(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
) -> HttpResult<Json<Vec<SessionInfoDto>>> {
    state
        .services
        .sessions()
        .sessions(&actor.subject_id)
        .await
        .into_http()
        .map(Json)
}
