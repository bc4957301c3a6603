// src/application/ports/cache.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// Minimal TTL key/value store used for token bookkeeping.
///
/// Every method maps to one atomic store command. Implementations normalize
/// replies to UTF-8 strings and report connectivity problems and timeouts as
/// `ApplicationError::StoreUnavailable`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Set `key` to `value`, expiring after `ttl_secs`.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> ApplicationResult<()>;

    async fn exists(&self, key: &str) -> ApplicationResult<bool>;

    /// Set `field` in the hash at `key` and make sure the hash lives at least
    /// `ttl_secs` more seconds. An existing longer expiry is left untouched.
    async fn hash_set_extending(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl_secs: u64,
    ) -> ApplicationResult<()>;

    async fn hash_get_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>>;

    /// Remove one field. Returns whether it was present.
    async fn hash_delete(&self, key: &str, field: &str) -> ApplicationResult<bool>;

    /// Read the whole hash and delete the key in one step.
    async fn hash_take_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>>;

    async fn ping(&self) -> ApplicationResult<()>;
}
