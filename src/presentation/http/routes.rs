// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{auth, status, users};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/api/status/health", get(status::health))
        .route("/api/status/ready", get(status::ready))
        .route("/api/auth/signin", post(auth::sign_in))
        .route("/api/auth/signout", post(auth::sign_out))
        .route("/api/auth/sessions", get(auth::list_sessions))
        .route("/api/user/deactivate", put(users::deactivate_self))
        .route("/api/user/activate/{id}", put(users::activate_user))
        .route("/api/user/{id}", delete(users::deactivate_user))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}
