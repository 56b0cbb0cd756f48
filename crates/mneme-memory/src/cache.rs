//! Cache-aside lookups layered over the durable backend.
//!
//! Callers hand the cache a key and a compute closure. On a hit the
//! cached value is decoded and returned without running the closure;
//! on a miss the closure runs and its result is stored for next time.
//! Backend trouble never surfaces to callers: reads degrade to misses,
//! writes are dropped, and only compute errors propagate.

use crate::backend::KvBackend;
use crate::config::MemoryConfig;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Read-through cache for expensive lookups.
///
/// Constructed without a backend it runs in pass-through mode: every
/// call computes fresh and nothing is stored.
pub struct LookupCache {
    backend: Option<Arc<dyn KvBackend>>,
    prefix: String,
    default_ttl: Duration,
}

impl LookupCache {
    /// Create a cache over `backend` with the default namespace and TTL.
    #[must_use]
    pub fn new(backend: Option<Arc<dyn KvBackend>>) -> Self {
        Self::with_config(backend, &MemoryConfig::default())
    }

    /// Create a cache over `backend` with namespace and TTL taken from `config`.
    #[must_use]
    pub fn with_config(backend: Option<Arc<dyn KvBackend>>, config: &MemoryConfig) -> Self {
        Self {
            backend,
            prefix: config.cache_prefix.clone(),
            default_ttl: Duration::from_secs(config.cache_ttl_seconds),
        }
    }

    /// Open the backend described by `config` and build a cache over it.
    pub fn from_config(config: &MemoryConfig) -> Result<Self> {
        let backend = config.open_backend()?;
        Ok(Self::with_config(backend, config))
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// result with the default TTL.
    ///
    /// Errors from `compute` propagate unchanged and leave nothing cached.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        compute: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.get_or_compute_with_ttl(key, Some(self.default_ttl), compute)
            .await
    }

    /// Like [`get_or_compute`](Self::get_or_compute) with an explicit TTL.
    /// `None` stores the computed value without expiry.
    pub async fn get_or_compute_with_ttl<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let namespaced = self.namespaced(key);
        if let Some(value) = self.read(&namespaced).await {
            debug!(key = %namespaced, "Cache hit");
            return Ok(value);
        }
        let value = compute().await?;
        self.write(&namespaced, &value, ttl).await;
        Ok(value)
    }

    /// Drop the cached entry for `key`. Absent keys are a no-op.
    pub async fn invalidate(&self, key: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let namespaced = self.namespaced(key);
        if let Err(e) = backend.delete(&[namespaced.clone()]).await {
            warn!(key = %namespaced, error = %e, "Cache invalidation failed");
        }
    }

    /// Drop every cached entry whose key starts with `prefix`, returning
    /// how many entries were removed.
    ///
    /// Enumerates matching keys first and then deletes them, so entries
    /// written concurrently may survive the sweep.
    pub async fn invalidate_by_prefix(&self, prefix: &str) -> usize {
        let Some(backend) = self.backend.as_ref() else {
            return 0;
        };
        let pattern = format!("{}*", self.namespaced(prefix));
        let keys = match backend.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Cache scan failed");
                return 0;
            }
        };
        if keys.is_empty() {
            return 0;
        }
        match backend.delete(&keys).await {
            Ok(removed) => removed as usize,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Cache sweep failed");
                0
            }
        }
    }

    /// Whether a live entry for `key` is currently cached.
    pub async fn exists(&self, key: &str) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            return false;
        };
        let namespaced = self.namespaced(key);
        match backend.exists(&namespaced).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key = %namespaced, error = %e, "Cache existence check failed");
                false
            }
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;
        match backend.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read degraded to miss");
                None
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, error = %e, "Skipping unencodable cache value");
                return;
            }
        };
        if let Err(e) = backend.set(key, &raw, ttl).await {
            warn!(key = %key, error = %e, "Cache write dropped");
        }
    }
}
