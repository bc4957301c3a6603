// src/application/dto/sessions.rs
use crate::domain::session::TokenFingerprint;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfoDto {
    pub fingerprint: TokenFingerprint,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of revoking every tracked token of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RevocationSummary {
    /// Tokens written to the blacklist.
    pub banned: usize,
    /// Tokens that had already reached their natural expiry and needed no ban.
    pub already_expired: usize,
}

impl RevocationSummary {
    pub const fn total(&self) -> usize {
        self.banned + self.already_expired
    }
}
