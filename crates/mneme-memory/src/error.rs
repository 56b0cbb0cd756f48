//! Error types for mneme-memory.

use thiserror::Error;

/// Memory layer error type.
///
/// These errors never cross the public cache/session surfaces — the degrade
/// policies there catch them. They are returned by the [`crate::KvBackend`]
/// primitives and by configuration/construction paths.
#[derive(Debug, Error)]
pub enum Error {
    /// Durable backend operation failed (connection, command, timeout)
    #[error("backend error: {0}")]
    Backend(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
