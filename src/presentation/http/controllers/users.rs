// src/presentation/http/controllers/users.rs
use crate::application::commands::accounts::StatusChange;
use crate::domain::session::SubjectId;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub change: StatusChange,
}

fn target(id: i64) -> SubjectId {
    SubjectId::from(id)
}

pub async fn deactivate_self(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
) -> HttpResult<Json<StatusChangeResponse>> {
    let change = state
        .services
        .accounts
        .deactivate_self(&actor)
        .await
        .into_http()?;

    Ok(Json(StatusChangeResponse {
        success: true,
        message: "User account deactivated successfully".into(),
        change,
    }))
}

pub async fn activate_user(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<StatusChangeResponse>> {
    let change = state
        .services
        .accounts
        .activate_user(&actor, &target(id))
        .await
        .into_http()?;

    let message = if change.changed {
        "User activated successfully"
    } else {
        "User is already active"
    };
    Ok(Json(StatusChangeResponse {
        success: true,
        message: message.into(),
        change,
    }))
}

pub async fn deactivate_user(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<StatusChangeResponse>> {
    let change = state
        .services
        .accounts
        .deactivate_user(&actor, &target(id))
        .await
        .into_http()?;

    Ok(Json(StatusChangeResponse {
        success: true,
        message: "User deactivated successfully".into(),
        change,
    }))
}
