// src/application/sessions/mod.rs
//! Session-token lifecycle: issuance, per-subject tracking, blacklisting and
//! revocation, all on top of a TTL cache store.
pub mod blacklist;
pub mod gate;
pub mod registry;
pub mod revocation;

pub use blacklist::TokenBlacklist;
pub use gate::AuthorizationGate;
pub use registry::TokenRegistry;
pub use revocation::RevocationCoordinator;

use crate::application::{
    ApplicationResult,
    dto::{AuthenticatedSubject, IssuedToken, RevocationSummary, SessionInfoDto},
    ports::{cache::CacheStore, security::TokenCodec, time::Clock},
};
use crate::domain::session::{SubjectId, TokenFingerprint};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Entry point the rest of the application uses for sessions.
pub struct SessionService {
    codec: Arc<dyn TokenCodec>,
    registry: TokenRegistry,
    blacklist: TokenBlacklist,
    gate: AuthorizationGate,
    revocation: RevocationCoordinator,
    clock: Arc<dyn Clock>,
}

impl SessionService {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registry = TokenRegistry::new(Arc::clone(&store), Arc::clone(&clock));
        let blacklist = TokenBlacklist::new(Arc::clone(&store));
        let gate = AuthorizationGate::new(Arc::clone(&codec), blacklist.clone(), Arc::clone(&clock));
        let revocation = RevocationCoordinator::new(
            Arc::clone(&codec),
            registry.clone(),
            blacklist.clone(),
            Arc::clone(&clock),
        );

        Self {
            codec,
            registry,
            blacklist,
            gate,
            revocation,
            clock,
        }
    }

    /// Issue a token for `subject` and record it in the registry.
    pub async fn issue_session(&self, subject: &SubjectId) -> ApplicationResult<IssuedToken> {
        let issued = self.codec.issue(subject)?;
        self.registry
            .track_until(subject, &issued.token, issued.expires_at.timestamp())
            .await?;

        tracing::info!(
            subject = %subject,
            token = %TokenFingerprint::of(&issued.token),
            expires_at = %issued.expires_at,
            "session issued"
        );
        Ok(issued)
    }

    pub async fn authorize(&self, token: Option<&str>) -> ApplicationResult<AuthenticatedSubject> {
        self.gate.authorize(token).await
    }

    pub async fn logout(&self, subject: &SubjectId, token: &str) -> ApplicationResult<()> {
        self.revocation.revoke_one(subject, token).await
    }

    pub async fn deactivate(&self, subject: &SubjectId) -> ApplicationResult<RevocationSummary> {
        self.revocation.revoke_all(subject).await
    }

    /// Live sessions of `subject`, soonest expiry first.
    pub async fn sessions(&self, subject: &SubjectId) -> ApplicationResult<Vec<SessionInfoDto>> {
        let now = self.clock.unix_now();
        let mut sessions: Vec<SessionInfoDto> = self
            .registry
            .list(subject)
            .await?
            .into_iter()
            .filter(|(_, expires_at)| *expires_at > now)
            .filter_map(|(token, expires_at)| {
                DateTime::<Utc>::from_timestamp(expires_at, 0).map(|expires_at| SessionInfoDto {
                    fingerprint: TokenFingerprint::of(&token),
                    expires_at,
                })
            })
            .collect();
        sessions.sort_by(|a, b| a.expires_at.cmp(&b.expires_at));
        Ok(sessions)
    }

    pub const fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub const fn blacklist(&self) -> &TokenBlacklist {
        &self.blacklist
    }

    pub fn codec(&self) -> Arc<dyn TokenCodec> {
        Arc::clone(&self.codec)
    }
}
