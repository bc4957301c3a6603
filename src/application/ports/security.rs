// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::IssuedToken,
    error::AuthRejection,
};
use crate::domain::session::{SubjectId, TokenClaims};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Returns `Ok(false)` on a mismatch; errors are reserved for unusable hashes.
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<bool>;
}

/// Stateless encoder/verifier for signed session tokens.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, subject: &SubjectId) -> ApplicationResult<IssuedToken>;

    /// Check structure and signature only; expiry is not looked at.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthRejection>;

    /// `verify` followed by the expiry check against the codec's clock.
    fn decode(&self, token: &str) -> Result<TokenClaims, AuthRejection>;

    /// Lifetime of every token this codec issues, in seconds.
    fn ttl_secs(&self) -> i64;
}
