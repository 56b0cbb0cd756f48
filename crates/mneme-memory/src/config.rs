//! Memory layer configuration.

use crate::backend::{KvBackend, RedisBackend};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for the cache and session memory layers.
///
/// Both layers can share one durable backend; [`MemoryConfig::open_backend`]
/// builds it once and the host hands the same `Arc` to each constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Redis URL; when unset the layer runs without a durable backend
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Key prefix for session records
    #[serde(default = "default_session_prefix")]
    pub session_prefix: String,

    /// Key prefix for cache entries
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Session record TTL in seconds (durable backend only)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,

    /// Default cache entry TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

fn default_session_prefix() -> String {
    "mneme:session:".to_string()
}

fn default_cache_prefix() -> String {
    "mneme:cache:".to_string()
}

fn default_session_ttl() -> u64 {
    7 * 24 * 3600 // 7 days
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            session_prefix: default_session_prefix(),
            cache_prefix: default_cache_prefix(),
            session_ttl_seconds: default_session_ttl(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

impl MemoryConfig {
    /// Build the durable backend named by this configuration.
    ///
    /// Returns `Ok(None)` when no `redis_url` is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn open_backend(&self) -> Result<Option<Arc<dyn KvBackend>>> {
        match &self.redis_url {
            Some(url) => Ok(Some(Arc::new(RedisBackend::new(url)?))),
            None => Ok(None),
        }
    }
}
