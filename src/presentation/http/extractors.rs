// src/presentation/http/extractors.rs
use crate::{
    application::{
        dto::AuthenticatedSubject,
        error::{ApplicationError, AuthRejection},
    },
    presentation::http::state::HttpState,
};
use axum::{
    Extension,
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};

use super::error::HttpError;

/// Subject bound to the request by the authorization gate.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedSubject);

/// Bearer token from the `Authorization` header. An absent header is `None`;
/// a present one that is not a usable bearer credential is `Malformed`.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AuthRejection> {
    if !headers.contains_key(AUTHORIZATION) {
        return Ok(None);
    }
    match headers.typed_get::<Authorization<Bearer>>() {
        Some(header) => Ok(Some(header.token().to_owned())),
        None => {
            tracing::debug!(
                reason = AuthRejection::Malformed.as_str(),
                "authorization header is not a bearer credential"
            );
            Err(AuthRejection::Malformed)
        }
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                HttpError::from_error(ApplicationError::infrastructure(
                    "application state missing",
                ))
            })?;

        let token = bearer_token(&parts.headers)
            .map_err(|kind| HttpError::from_error(kind.into()))?;

        let subject = app_state
            .services
            .sessions()
            .authorize(token.as_deref())
            .await
            .map_err(HttpError::from_error)?;

        parts.extensions.insert(subject.clone());
        Ok(Self(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn absent_header_is_no_token() {
        assert_eq!(bearer_token(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn bearer_header_yields_its_token() {
        assert_eq!(
            bearer_token(&with_authorization("Bearer abc.def.ghi")),
            Ok(Some("abc.def.ghi".to_owned()))
        );
    }

    #[test]
    fn other_schemes_are_malformed_not_missing() {
        for value in ["Basic dXNlcjpwYXNz", "Token abc", "Bearer"] {
            assert_eq!(
                bearer_token(&with_authorization(value)),
                Err(AuthRejection::Malformed),
                "{value}"
            );
        }
    }
}
