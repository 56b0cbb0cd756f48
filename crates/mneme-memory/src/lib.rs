//! Mneme Memory - Session Memory and Cached Lookups
//!
//! This crate provides the storage layer for the Mneme assistant:
//! - Backend: key/value primitives over Redis
//! - Session: durable conversation history with an in-process fallback
//! - Cache: cache-aside wrapper for expensive lookups
//!
//! Both stores share one degradation rule: when the durable backend is
//! absent or failing, they keep working with reduced durability instead
//! of surfacing errors.
//!
//! ```text
//! caller ──► SessionMemory ──► Redis (7 day TTL)
//!                 │ backend down
//!                 └──────────► DashMap (process lifetime)
//!
//! caller ──► LookupCache ────► Redis (5 min TTL)
//!                 │ backend down
//!                 └──────────► recompute every call
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod message;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{KvBackend, RedisBackend};
pub use cache::LookupCache;
pub use config::MemoryConfig;
pub use error::{Error, Result};
pub use message::ChatMessage;
pub use session::SessionMemory;
