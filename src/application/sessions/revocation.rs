// src/application/sessions/revocation.rs
use super::{
    blacklist::TokenBlacklist,
    registry::{TokenRegistry, UNKNOWN_EXPIRY},
};
use crate::application::{
    ApplicationResult,
    dto::RevocationSummary,
    error::ApplicationError,
    ports::{security::TokenCodec, time::Clock},
};
use crate::domain::session::{SubjectId, TokenFingerprint, claims::remaining_ttl};
use std::sync::Arc;

/// Moves tokens from the registry into the blacklist.
#[derive(Clone)]
pub struct RevocationCoordinator {
    codec: Arc<dyn TokenCodec>,
    registry: TokenRegistry,
    blacklist: TokenBlacklist,
    clock: Arc<dyn Clock>,
}

impl RevocationCoordinator {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        registry: TokenRegistry,
        blacklist: TokenBlacklist,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codec,
            registry,
            blacklist,
            clock,
        }
    }

    /// Revoke a single token held by `subject`. Safe to repeat.
    pub async fn revoke_one(&self, subject: &SubjectId, token: &str) -> ApplicationResult<()> {
        let claims = self.codec.verify(token)?;
        if &claims.subject != subject {
            return Err(ApplicationError::forbidden("token was issued to another subject"));
        }

        let remaining = claims.remaining_ttl(self.clock.unix_now());
        self.blacklist.ban(token, remaining).await?;
        self.registry.forget(subject, token).await?;

        tracing::info!(
            subject = %subject,
            token = %TokenFingerprint::of(token),
            remaining_ttl = remaining,
            "token revoked"
        );
        Ok(())
    }

    /// Revoke every token tracked for `subject`.
    ///
    /// When a ban fails part-way, the entries that were not banned yet are put
    /// back into the registry before the error is returned, so a retry still
    /// sees them.
    pub async fn revoke_all(&self, subject: &SubjectId) -> ApplicationResult<RevocationSummary> {
        let snapshot: Vec<(String, i64)> = self.registry.clear(subject).await?.into_iter().collect();
        let now = self.clock.unix_now();
        let max_ttl = self.codec.ttl_secs();
        let mut summary = RevocationSummary::default();

        for (idx, (token, expires_at)) in snapshot.iter().enumerate() {
            let remaining = remaining_ttl(effective_expiry(*expires_at, now, max_ttl), now);
            if remaining == 0 {
                summary.already_expired += 1;
                continue;
            }

            if let Err(err) = self.blacklist.ban(token, remaining).await {
                tracing::error!(
                    subject = %subject,
                    error = %err,
                    pending = snapshot.len() - idx,
                    "revoke-all interrupted; restoring unbanned tokens"
                );
                self.restore(subject, &snapshot[idx..], now, max_ttl).await;
                return Err(err);
            }
            summary.banned += 1;
        }

        tracing::info!(
            subject = %subject,
            banned = summary.banned,
            already_expired = summary.already_expired,
            "all tokens revoked"
        );
        Ok(summary)
    }

    async fn restore(&self, subject: &SubjectId, entries: &[(String, i64)], now: i64, max_ttl: i64) {
        for (token, expires_at) in entries {
            let until = effective_expiry(*expires_at, now, max_ttl);
            if let Err(err) = self.registry.track_until(subject, token, until).await {
                tracing::warn!(
                    subject = %subject,
                    token = %TokenFingerprint::of(token),
                    error = %err,
                    "failed to restore registry entry"
                );
            }
        }
    }
}

/// Expiry a ban must cover. Readable expiries are used as stored, even when
/// they exceed the current token lifetime; an unreadable one becomes one
/// lifetime from `now`.
fn effective_expiry(expires_at: i64, now: i64, max_ttl: i64) -> i64 {
    if expires_at == UNKNOWN_EXPIRY {
        now.saturating_add(max_ttl)
    } else {
        expires_at
    }
}
