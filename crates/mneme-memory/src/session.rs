//! Conversation memory keyed by session id.
//!
//! Records live in the durable backend with a seven day TTL so history
//! survives process restarts. When the backend is absent or a call to it
//! fails, the store degrades to an in-process map scoped to the process
//! lifetime. Fallback selection is per call, not sticky: every operation
//! tries the durable path first whenever one is configured.

use crate::backend::KvBackend;
use crate::config::MemoryConfig;
use crate::error::Result;
use crate::message::ChatMessage;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Durable session store with a local fallback map.
///
/// Every operation is best-effort and infallible from the caller's side:
/// backend trouble is logged and absorbed, never propagated.
pub struct SessionMemory {
    backend: Option<Arc<dyn KvBackend>>,
    fallback: DashMap<String, Vec<ChatMessage>>,
    prefix: String,
    ttl: Duration,
}

impl SessionMemory {
    /// Create a store over `backend` with the default namespace and TTL.
    #[must_use]
    pub fn new(backend: Option<Arc<dyn KvBackend>>) -> Self {
        Self::with_config(backend, &MemoryConfig::default())
    }

    /// Create a store over `backend` with namespace and TTL taken from `config`.
    #[must_use]
    pub fn with_config(backend: Option<Arc<dyn KvBackend>>, config: &MemoryConfig) -> Self {
        Self {
            backend,
            fallback: DashMap::new(),
            prefix: config.session_prefix.clone(),
            ttl: Duration::from_secs(config.session_ttl_seconds),
        }
    }

    /// Open the backend described by `config` and build a store over it.
    pub fn from_config(config: &MemoryConfig) -> Result<Self> {
        let backend = config.open_backend()?;
        Ok(Self::with_config(backend, config))
    }

    /// Whether a durable backend is configured.
    ///
    /// Individual calls may still land in the fallback map when the
    /// backend fails; this only reports the configured mode.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.backend.is_some()
    }

    /// Return the message history for `session_id`.
    ///
    /// Durable hit wins; a miss, decode failure, or backend error falls
    /// through to the fallback map, and an unknown session reads as empty.
    pub async fn get_messages(&self, session_id: &str) -> Vec<ChatMessage> {
        if let Some(backend) = self.backend.as_ref() {
            let key = self.key_for(session_id);
            match backend.get(&key).await {
                Ok(Some(raw)) => match serde_json::from_str(&raw) {
                    Ok(messages) => return messages,
                    Err(e) => {
                        warn!(key = %key, error = %e, "Discarding undecodable session record");
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Session read fell back to local copy");
                }
            }
        }
        self.fallback
            .get(session_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Replace the stored history for `session_id` wholesale.
    ///
    /// Written durably with the configured TTL when possible; diverted to
    /// the fallback map when the backend is absent or the write fails.
    pub async fn update_messages(&self, session_id: &str, messages: Vec<ChatMessage>) {
        if let Some(backend) = self.backend.as_ref() {
            match serde_json::to_string(&messages) {
                Ok(raw) => {
                    let key = self.key_for(session_id);
                    match backend.set(&key, &raw, Some(self.ttl)).await {
                        Ok(()) => {
                            debug!(
                                session_id = %session_id,
                                count = messages.len(),
                                ttl_secs = self.ttl.as_secs(),
                                "Session stored durably"
                            );
                            return;
                        }
                        Err(e) => {
                            warn!(
                                session_id = %session_id,
                                error = %e,
                                "Session write diverted to local fallback"
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Failed to encode session");
                }
            }
        }
        self.fallback.insert(session_id.to_string(), messages);
    }

    /// Remove the history for `session_id` from both backends.
    ///
    /// The fallback copy is purged even when the durable delete succeeds,
    /// so a removed session cannot resurface through the local map.
    pub async fn delete_messages(&self, session_id: &str) {
        if let Some(backend) = self.backend.as_ref() {
            let key = self.key_for(session_id);
            if let Err(e) = backend.delete(&[key]).await {
                warn!(session_id = %session_id, error = %e, "Durable session delete failed");
            }
        }
        self.fallback.remove(session_id);
    }

    /// Enumerate every known session id in the active backend.
    ///
    /// Durable enumeration failures yield an empty set rather than an error.
    pub async fn list_session_ids(&self) -> HashSet<String> {
        if let Some(backend) = self.backend.as_ref() {
            let pattern = format!("{}*", self.prefix);
            return match backend.keys(&pattern).await {
                Ok(keys) => keys
                    .iter()
                    .filter_map(|key| key.strip_prefix(&self.prefix))
                    .map(str::to_string)
                    .collect(),
                Err(e) => {
                    warn!(error = %e, "Session enumeration failed");
                    HashSet::new()
                }
            };
        }
        self.fallback
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Delete every session record, returning how many durable records
    /// were removed (or how many fallback entries, in fallback mode).
    pub async fn clear_all(&self) -> usize {
        if let Some(backend) = self.backend.as_ref() {
            let mut removed = 0;
            let pattern = format!("{}*", self.prefix);
            match backend.keys(&pattern).await {
                Ok(keys) if !keys.is_empty() => match backend.delete(&keys).await {
                    Ok(count) => removed = count as usize,
                    Err(e) => warn!(error = %e, "Session sweep failed"),
                },
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Session enumeration failed"),
            }
            self.fallback.clear();
            return removed;
        }
        let removed = self.fallback.len();
        self.fallback.clear();
        removed
    }

    fn key_for(&self, session_id: &str) -> String {
        format!("{}{}", self.prefix, session_id)
    }
}
