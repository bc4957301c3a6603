// src/application/sessions/registry.rs
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{cache::CacheStore, time::Clock},
};
use crate::domain::session::{SubjectId, TokenFingerprint, claims::remaining_ttl};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

/// Expiry reported for an entry whose stored timestamp cannot be read back.
/// Revocation bans such entries for one token lifetime from now.
pub const UNKNOWN_EXPIRY: i64 = i64::MAX;

pub fn tokens_key(subject: &SubjectId) -> String {
    format!("user:{subject}:tokens")
}

/// Per-subject bookkeeping of outstanding tokens and their absolute expiries.
#[derive(Clone)]
pub struct TokenRegistry {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl TokenRegistry {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record `token` under `subject`, expiring `ttl_secs` from now.
    /// Returns the absolute expiry that was stored.
    pub async fn track(
        &self,
        subject: &SubjectId,
        token: &str,
        ttl_secs: i64,
    ) -> ApplicationResult<i64> {
        if ttl_secs <= 0 {
            return Err(ApplicationError::validation("token ttl must be positive"));
        }
        let expires_at = self.clock.unix_now().saturating_add(ttl_secs);
        self.track_until(subject, token, expires_at).await?;
        Ok(expires_at)
    }

    /// Record `token` with an absolute expiry. Tokens already past their
    /// expiry are not written.
    pub async fn track_until(
        &self,
        subject: &SubjectId,
        token: &str,
        expires_at: i64,
    ) -> ApplicationResult<()> {
        let ttl = remaining_ttl(expires_at, self.clock.unix_now());
        if ttl == 0 {
            return Ok(());
        }

        self.store
            .hash_set_extending(
                &tokens_key(subject),
                token,
                &expires_at.to_string(),
                ttl.unsigned_abs(),
            )
            .await
    }

    /// Every token currently recorded for `subject`, including entries past
    /// their expiry that the store has not reclaimed yet.
    pub async fn list(&self, subject: &SubjectId) -> ApplicationResult<BTreeMap<String, i64>> {
        let raw = self.store.hash_get_all(&tokens_key(subject)).await?;
        Ok(parse_entries(subject, raw))
    }

    pub async fn forget(&self, subject: &SubjectId, token: &str) -> ApplicationResult<bool> {
        self.store.hash_delete(&tokens_key(subject), token).await
    }

    /// Remove the subject's whole record and hand back what it contained.
    pub async fn clear(&self, subject: &SubjectId) -> ApplicationResult<BTreeMap<String, i64>> {
        let raw = self.store.hash_take_all(&tokens_key(subject)).await?;
        Ok(parse_entries(subject, raw))
    }
}

fn parse_entries(subject: &SubjectId, raw: HashMap<String, String>) -> BTreeMap<String, i64> {
    raw.into_iter()
        .map(|(token, value)| {
            let expires_at = parse_expiry(&value).unwrap_or_else(|| {
                tracing::warn!(
                    subject = %subject,
                    token = %TokenFingerprint::of(&token),
                    value = %value,
                    "unreadable registry expiry"
                );
                UNKNOWN_EXPIRY
            });
            (token, expires_at)
        })
        .collect()
}

/// Accepts integer seconds as well as fractional timestamps (truncated).
fn parse_expiry(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return Some(secs);
    }
    let secs = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    #[allow(clippy::cast_possible_truncation)]
    Some(secs.trunc() as i64)
}
