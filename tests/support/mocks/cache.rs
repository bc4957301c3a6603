// tests/support/mocks/cache.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use thesis_sessions::application::{
    ApplicationResult, error::ApplicationError, ports::cache::CacheStore,
};
use thesis_sessions::infrastructure::cache::InMemoryCacheStore;

/// Wraps the in-memory store and fails on command.
///
/// `fail_all` turns every call into `StoreUnavailable`. `fail_sets_after(n)`
/// lets `n` more `set_with_expiry` calls through and fails the rest.
pub struct FaultyCacheStore {
    inner: Arc<InMemoryCacheStore>,
    down: AtomicBool,
    set_budget: AtomicI64,
    calls: AtomicUsize,
}

impl FaultyCacheStore {
    pub fn new(inner: Arc<InMemoryCacheStore>) -> Self {
        Self {
            inner,
            down: AtomicBool::new(false),
            set_budget: AtomicI64::new(-1),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_all(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn fail_sets_after(&self, allowed: i64) {
        self.set_budget.store(allowed, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.fail_all(false);
        self.set_budget.store(-1, Ordering::SeqCst);
    }

    /// Number of store calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, op: &str) -> ApplicationResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(ApplicationError::store_unavailable(format!("{op}: connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for FaultyCacheStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> ApplicationResult<()> {
        self.enter("SET")?;
        let budget = self.set_budget.load(Ordering::SeqCst);
        if budget == 0 {
            return Err(ApplicationError::store_unavailable("SET: timed out"));
        }
        if budget > 0 {
            self.set_budget.fetch_sub(1, Ordering::SeqCst);
        }
        self.inner.set_with_expiry(key, value, ttl_secs).await
    }

    async fn exists(&self, key: &str) -> ApplicationResult<bool> {
        self.enter("EXISTS")?;
        self.inner.exists(key).await
    }

    async fn hash_set_extending(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl_secs: u64,
    ) -> ApplicationResult<()> {
        self.enter("HSET")?;
        self.inner.hash_set_extending(key, field, value, ttl_secs).await
    }

    async fn hash_get_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>> {
        self.enter("HGETALL")?;
        self.inner.hash_get_all(key).await
    }

    async fn hash_delete(&self, key: &str, field: &str) -> ApplicationResult<bool> {
        self.enter("HDEL")?;
        self.inner.hash_delete(key, field).await
    }

    async fn hash_take_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>> {
        self.enter("HTAKE")?;
        self.inner.hash_take_all(key).await
    }

    async fn ping(&self) -> ApplicationResult<()> {
        self.enter("PING")?;
        self.inner.ping().await
    }
}
