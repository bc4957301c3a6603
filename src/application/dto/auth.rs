// src/application/dto/auth.rs
use crate::domain::session::{SubjectId, TokenFingerprint};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

/// Subject bound to a request after its bearer token passed every check.
#[derive(Clone)]
pub struct AuthenticatedSubject {
    pub subject_id: SubjectId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub token: String,
}

impl AuthenticatedSubject {
    pub fn fingerprint(&self) -> TokenFingerprint {
        TokenFingerprint::of(&self.token)
    }
}

impl fmt::Debug for AuthenticatedSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSubject")
            .field("subject_id", &self.subject_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("token", &self.fingerprint())
            .finish()
    }
}
