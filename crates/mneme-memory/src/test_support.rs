//! In-process doubles for the durable backend, used across module tests.

use crate::backend::KvBackend;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Map-backed [`KvBackend`] with TTL bookkeeping.
///
/// Deadlines use `tokio::time::Instant`, so tests run under
/// `#[tokio::test(start_paused = true)]` can expire entries with
/// `tokio::time::advance` instead of sleeping.
pub(crate) struct MemoryKv {
    entries: RwLock<HashMap<String, (String, Option<Instant>)>>,
}

impl MemoryKv {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn live(deadline: Option<Instant>) -> bool {
        deadline.is_none_or(|d| Instant::now() < d)
    }

    fn matches(pattern: &str, key: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == pattern,
        }
    }
}

#[async_trait]
impl KvBackend for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, deadline)| Self::live(*deadline))
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let deadline = ttl.map(|t| Instant::now() + t);
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), (value.to_string(), deadline));
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for key in keys {
            if let Some((_, deadline)) = entries.remove(key) {
                if Self::live(deadline) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, (_, deadline))| Self::matches(pattern, key) && Self::live(*deadline))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .is_some_and(|(_, deadline)| Self::live(*deadline)))
    }
}

/// Backend double where every call fails, simulating a full outage.
pub(crate) struct FailingKv;

fn outage<T>() -> Result<T> {
    Err(Error::Backend("simulated outage".to_string()))
}

#[async_trait]
impl KvBackend for FailingKv {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        outage()
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> Result<()> {
        outage()
    }

    async fn delete(&self, _keys: &[String]) -> Result<u64> {
        outage()
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
        outage()
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        outage()
    }
}

/// Backend double that can be switched between healthy and failing,
/// for exercising per-call (non-sticky) fallback selection.
pub(crate) struct FlakyKv {
    inner: MemoryKv,
    failing: AtomicBool,
}

impl FlakyKv {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryKv::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            outage()
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KvBackend for FlakyKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        self.check()?;
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        self.check()?;
        self.inner.delete(keys).await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.check()?;
        self.inner.keys(pattern).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.check()?;
        self.inner.exists(key).await
    }
}
