// src/infrastructure/cache/memory_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::{cache::CacheStore, time::Clock};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
enum Entry {
    Text(String),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Slot {
    entry: Entry,
    expires_at: Option<DateTime<Utc>>,
}

impl Slot {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Process-local cache store. Expiry follows the injected clock, so tests can
/// move time forward without sleeping.
///
/// A key past its expiry is dropped when a command next touches it. Keys
/// nobody touches again are reclaimed by a full sweep every `SWEEP_EVERY`
/// writes.
pub struct InMemoryCacheStore {
    slots: Mutex<HashMap<String, Slot>>,
    writes: AtomicU64,
    clock: Arc<dyn Clock>,
}

const SWEEP_EVERY: u64 = 1024;

impl InMemoryCacheStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            writes: AtomicU64::new(0),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the map with `key` evicted if it has expired.
    fn slots_for(&self, key: &str) -> MutexGuard<'_, HashMap<String, Slot>> {
        let now = self.clock.now();
        let mut slots = self.lock();
        if slots.get(key).is_some_and(|slot| !slot.is_live(now)) {
            slots.remove(key);
        }
        slots
    }

    /// Like `slots_for`, and counts a write towards the next sweep.
    fn slots_for_write(&self, key: &str) -> MutexGuard<'_, HashMap<String, Slot>> {
        let mut slots = self.slots_for(key);
        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            let now = self.clock.now();
            slots.retain(|_, slot| slot.is_live(now));
        }
        slots
    }

    /// Seconds until `key` expires: `None` if absent, `Some(None)` if it never does.
    pub fn ttl(&self, key: &str) -> Option<Option<i64>> {
        let now = self.clock.now();
        self.slots_for(key)
            .get(key)
            .map(|slot| slot.expires_at.map(|at| (at - now).num_seconds()))
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.lock().values().filter(|slot| slot.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Upper bound on a single TTL; keeps expiry arithmetic clear of overflow.
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

fn expiry_after(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    let secs = i64::try_from(ttl_secs.min(MAX_TTL_SECS)).unwrap_or_default();
    now + Duration::seconds(secs)
}

fn wrong_type(key: &str) -> ApplicationError {
    ApplicationError::infrastructure(format!("key {key} holds a value of another type"))
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> ApplicationResult<()> {
        let expires_at = expiry_after(self.clock.now(), ttl_secs);
        self.slots_for_write(key).insert(
            key.to_owned(),
            Slot {
                entry: Entry::Text(value.to_owned()),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> ApplicationResult<bool> {
        Ok(self.slots_for(key).contains_key(key))
    }

    async fn hash_set_extending(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl_secs: u64,
    ) -> ApplicationResult<()> {
        let wanted = expiry_after(self.clock.now(), ttl_secs);
        let mut slots = self.slots_for_write(key);
        let slot = slots.entry(key.to_owned()).or_insert_with(|| Slot {
            entry: Entry::Hash(HashMap::new()),
            expires_at: None,
        });

        let Entry::Hash(fields) = &mut slot.entry else {
            return Err(wrong_type(key));
        };
        fields.insert(field.to_owned(), value.to_owned());
        slot.expires_at = Some(slot.expires_at.map_or(wanted, |current| current.max(wanted)));
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>> {
        match self.slots_for(key).get(key) {
            None => Ok(HashMap::new()),
            Some(Slot {
                entry: Entry::Hash(fields),
                ..
            }) => Ok(fields.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hash_delete(&self, key: &str, field: &str) -> ApplicationResult<bool> {
        let mut slots = self.slots_for(key);
        let Some(slot) = slots.get_mut(key) else {
            return Ok(false);
        };
        let Entry::Hash(fields) = &mut slot.entry else {
            return Err(wrong_type(key));
        };

        let removed = fields.remove(field).is_some();
        if fields.is_empty() {
            slots.remove(key);
        }
        Ok(removed)
    }

    async fn hash_take_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>> {
        let mut slots = self.slots_for(key);
        match slots.remove(key) {
            None => Ok(HashMap::new()),
            Some(Slot {
                entry: Entry::Hash(fields),
                ..
            }) => Ok(fields),
            Some(other) => {
                slots.insert(key.to_owned(), other);
                Err(wrong_type(key))
            }
        }
    }

    async fn ping(&self) -> ApplicationResult<()> {
        Ok(())
    }
}
