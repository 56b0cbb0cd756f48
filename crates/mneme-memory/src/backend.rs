//! Durable key/value backend abstraction.
//!
//! The cache and session layers consume the durable store through the small
//! set of primitives in [`KvBackend`]. The store is a black box reachable
//! over the network: any error from a primitive means "degrade" to the
//! caller, and failure classification (timeout vs. refusal) is deliberately
//! not modelled here.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Primitive operations the memory layer needs from a durable store.
///
/// Implementations must be safe to call concurrently; each call stands on
/// its own (no session/transaction state between calls).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, with an expiry when `ttl` is `Some`.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Delete every key in `keys`, returning how many existed.
    async fn delete(&self, keys: &[String]) -> Result<u64>;

    /// List all keys matching a glob `pattern` (e.g. `prefix*`).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Whether a live (non-expired) entry exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Redis-backed implementation of [`KvBackend`].
///
/// Opens a multiplexed connection per call; Redis enforces TTL expiry
/// server-side, so expired entries simply read back as absent.
pub struct RedisBackend {
    client: redis::Client,
}

impl RedisBackend {
    /// Create a backend for the given Redis URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid. Connectivity is not probed
    /// here — unreachable servers surface per-call, where the degrade
    /// policies handle them.
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| Error::Configuration(format!("invalid Redis URL: {}", e)))?;
        Ok(Self { client })
    }

    /// Get an async connection
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::Backend(format!("Redis connection failed: {}", e)))
    }
}

#[async_trait]
impl KvBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Backend(format!("Redis GET failed: {}", e)))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            // Redis rejects a zero expiry; round sub-second TTLs up.
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }
        cmd.query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::Backend(format!("Redis SET failed: {}", e)))?;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            // DEL with no arguments is a protocol error.
            return Ok(0);
        }
        let mut conn = self.get_connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Backend(format!("Redis DEL failed: {}", e)))?;
        Ok(removed as u64)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.get_connection().await?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Backend(format!("Redis KEYS failed: {}", e)))?;
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let found: i64 = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Backend(format!("Redis EXISTS failed: {}", e)))?;
        Ok(found > 0)
    }
}
