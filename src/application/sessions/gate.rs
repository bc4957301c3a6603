// src/application/sessions/gate.rs
use super::blacklist::TokenBlacklist;
use crate::application::{
    ApplicationResult,
    dto::AuthenticatedSubject,
    error::AuthRejection,
    ports::{security::TokenCodec, time::Clock},
};
use crate::domain::session::TokenFingerprint;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Request-time token check.
///
/// Order is fixed: presence, signature, blacklist, expiry. A missing token is
/// rejected without touching the cache store, and a store failure is returned
/// as an error rather than treated as "not banned".
#[derive(Clone)]
pub struct AuthorizationGate {
    codec: Arc<dyn TokenCodec>,
    blacklist: TokenBlacklist,
    clock: Arc<dyn Clock>,
}

impl AuthorizationGate {
    pub fn new(codec: Arc<dyn TokenCodec>, blacklist: TokenBlacklist, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec,
            blacklist,
            clock,
        }
    }

    pub async fn authorize(&self, token: Option<&str>) -> ApplicationResult<AuthenticatedSubject> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(reject(AuthRejection::Missing, None)),
        };

        let claims = self
            .codec
            .verify(token)
            .map_err(|kind| reject(kind, Some(token)))?;

        if self.blacklist.is_banned(token).await? {
            return Err(reject(AuthRejection::Banned, Some(token)));
        }

        if claims.is_expired_at(self.clock.unix_now()) {
            return Err(reject(AuthRejection::Expired, Some(token)));
        }

        let (Some(issued_at), Some(expires_at)) = (
            DateTime::<Utc>::from_timestamp(claims.issued_at, 0),
            DateTime::<Utc>::from_timestamp(claims.expires_at, 0),
        ) else {
            return Err(reject(AuthRejection::Malformed, Some(token)));
        };

        Ok(AuthenticatedSubject {
            subject_id: claims.subject,
            issued_at,
            expires_at,
            token: token.to_owned(),
        })
    }
}

fn reject(kind: AuthRejection, token: Option<&str>) -> crate::application::error::ApplicationError {
    match token {
        Some(token) => tracing::debug!(
            reason = kind.as_str(),
            token = %TokenFingerprint::of(token),
            "token rejected"
        ),
        None => tracing::debug!(reason = kind.as_str(), "token rejected"),
    }
    kind.into()
}
