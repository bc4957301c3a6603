// src/application/sessions/blacklist.rs
use crate::application::{ApplicationResult, ports::cache::CacheStore};
use crate::domain::session::value_objects::token_digest;
use std::sync::Arc;

pub fn blacklist_key(token: &str) -> String {
    format!("blacklist:{}", token_digest(token))
}

/// Tokens invalidated before their natural expiry.
#[derive(Clone)]
pub struct TokenBlacklist {
    store: Arc<dyn CacheStore>,
}

impl TokenBlacklist {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Ban `token` for `ttl_secs`. A non-positive TTL means the token is
    /// already past its expiry, so nothing is written and `false` is returned.
    pub async fn ban(&self, token: &str, ttl_secs: i64) -> ApplicationResult<bool> {
        if ttl_secs <= 0 {
            return Ok(false);
        }
        self.store
            .set_with_expiry(&blacklist_key(token), "1", ttl_secs.unsigned_abs())
            .await?;
        Ok(true)
    }

    pub async fn is_banned(&self, token: &str) -> ApplicationResult<bool> {
        self.store.exists(&blacklist_key(token)).await
    }
}
