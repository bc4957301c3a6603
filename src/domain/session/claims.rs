// src/domain/session/claims.rs
use super::SubjectId;
use serde::{Deserialize, Serialize};

/// Current claim schema version written into every issued token.
pub const CLAIMS_VERSION: u16 = 1;

/// Claims carried inside a signed session token.
///
/// Timestamps are Unix seconds. A token is valid on the half-open interval
/// `[issued_at, expires_at)`. Unknown fields are ignored on decode so newer
/// issuers can add claims without breaking older verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "ver")]
    pub version: u16,
    #[serde(rename = "sub")]
    pub subject: SubjectId,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "jti")]
    pub token_id: String,
}

impl TokenClaims {
    pub fn new(subject: SubjectId, issued_at: i64, ttl_secs: i64, token_id: String) -> Self {
        Self {
            version: CLAIMS_VERSION,
            subject,
            issued_at,
            expires_at: issued_at.saturating_add(ttl_secs),
            token_id,
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Seconds left until natural expiry, floored at zero.
    pub fn remaining_ttl(&self, now: i64) -> i64 {
        remaining_ttl(self.expires_at, now)
    }
}

/// `max(0, expires_at - now)` in whole seconds.
pub fn remaining_ttl(expires_at: i64, now: i64) -> i64 {
    expires_at.saturating_sub(now).max(0)
}
