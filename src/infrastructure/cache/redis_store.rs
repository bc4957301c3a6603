// src/infrastructure/cache/redis_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::cache::CacheStore;
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Pool, Runtime};
use redis::{Cmd, FromRedisValue, RedisError};
use std::{collections::HashMap, time::Duration};

// HSET the field, then raise the key's TTL to ARGV[3] unless it already
// outlives it. TTL is -1 for a key without expiry, so a new key always gets one.
const HSET_EXTEND_SCRIPT: &str = r"
    redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
    local ttl = tonumber(ARGV[3])
    if redis.call('TTL', KEYS[1]) < ttl then
        redis.call('EXPIRE', KEYS[1], ttl)
    end
    return 1
";

const HTAKE_SCRIPT: &str = r"
    local entries = redis.call('HGETALL', KEYS[1])
    redis.call('DEL', KEYS[1])
    return entries
";

/// Redis-backed cache store with per-command timeout and retry.
///
/// Only idempotent commands are retried. `hash_take_all` runs once: a retry
/// after a timed-out but applied take would read back an empty hash.
#[derive(Clone)]
pub struct RedisCacheStore {
    pool: Pool,
    timeout: Duration,
    retries: u32,
}

impl RedisCacheStore {
    /// Create a new store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str, timeout: Duration, retries: u32) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            pool,
            timeout,
            retries,
        })
    }

    async fn run<T: FromRedisValue>(
        &self,
        op: &'static str,
        build: impl Fn() -> Cmd + Send + Sync,
    ) -> ApplicationResult<T> {
        self.run_with_retries(op, self.retries, build).await
    }

    /// Transport failures and timeouts are retried up to `retries` times and
    /// end as `StoreUnavailable`. A reply that does not convert to `T` is an
    /// infrastructure fault and is not retried.
    async fn run_with_retries<T: FromRedisValue>(
        &self,
        op: &'static str,
        retries: u32,
        build: impl Fn() -> Cmd + Send + Sync,
    ) -> ApplicationResult<T> {
        let mut attempt = 0;
        loop {
            match self.run_once(build()).await {
                Ok(value) => return Ok(value),
                Err(Failure::Reply(reason)) => {
                    tracing::error!(op, reason = %reason, "unexpected cache reply");
                    return Err(ApplicationError::infrastructure(format!("{op}: {reason}")));
                }
                Err(Failure::Unavailable(reason)) if attempt < retries => {
                    attempt += 1;
                    tracing::warn!(op, attempt, reason = %reason, "cache command failed; retrying");
                }
                Err(Failure::Unavailable(reason)) => {
                    tracing::error!(op, reason = %reason, "cache command failed");
                    return Err(ApplicationError::store_unavailable(format!("{op}: {reason}")));
                }
            }
        }
    }

    async fn run_once<T: FromRedisValue>(&self, cmd: Cmd) -> Result<T, Failure> {
        let exec = async {
            let mut conn = self
                .pool
                .get()
                .await
                .map_err(|err| Failure::Unavailable(err.to_string()))?;
            cmd.query_async::<T>(&mut conn).await.map_err(Failure::from)
        };

        tokio::time::timeout(self.timeout, exec).await.map_err(|_| {
            Failure::Unavailable(format!("timed out after {}ms", self.timeout.as_millis()))
        })?
    }
}

enum Failure {
    Unavailable(String),
    Reply(String),
}

impl From<RedisError> for Failure {
    fn from(err: RedisError) -> Self {
        if err.is_io_error()
            || err.is_timeout()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
        {
            Self::Unavailable(err.to_string())
        } else {
            Self::Reply(err.to_string())
        }
    }
}

fn eval(script: &str, key: &str) -> Cmd {
    let mut cmd = redis::cmd("EVAL");
    cmd.arg(script).arg(1).arg(key);
    cmd
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> ApplicationResult<()> {
        self.run::<()>("SET", || {
            let mut cmd = redis::cmd("SET");
            cmd.arg(key).arg(value).arg("EX").arg(ttl_secs);
            cmd
        })
        .await
    }

    async fn exists(&self, key: &str) -> ApplicationResult<bool> {
        self.run::<bool>("EXISTS", || {
            let mut cmd = redis::cmd("EXISTS");
            cmd.arg(key);
            cmd
        })
        .await
    }

    async fn hash_set_extending(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl_secs: u64,
    ) -> ApplicationResult<()> {
        self.run::<()>("HSET+EXPIRE", || {
            let mut cmd = eval(HSET_EXTEND_SCRIPT, key);
            cmd.arg(field).arg(value).arg(ttl_secs);
            cmd
        })
        .await
    }

    async fn hash_get_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>> {
        self.run::<HashMap<String, String>>("HGETALL", || {
            let mut cmd = redis::cmd("HGETALL");
            cmd.arg(key);
            cmd
        })
        .await
    }

    async fn hash_delete(&self, key: &str, field: &str) -> ApplicationResult<bool> {
        let removed = self
            .run::<i64>("HDEL", || {
                let mut cmd = redis::cmd("HDEL");
                cmd.arg(key).arg(field);
                cmd
            })
            .await?;
        Ok(removed > 0)
    }

    async fn hash_take_all(&self, key: &str) -> ApplicationResult<HashMap<String, String>> {
        self.run_with_retries::<HashMap<String, String>>("HGETALL+DEL", 0, || {
            eval(HTAKE_SCRIPT, key)
        })
        .await
    }

    async fn ping(&self) -> ApplicationResult<()> {
        self.run::<String>("PING", || redis::cmd("PING")).await?;
        Ok(())
    }
}
