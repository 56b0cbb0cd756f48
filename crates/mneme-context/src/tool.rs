//! Tool abstraction executed on behalf of a caller.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// An operation the assistant can run on behalf of the current caller.
///
/// Implementations that act as the caller read the binding through
/// [`crate::identity::current`]; an absent binding is a first-class
/// state the tool must handle itself.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used in logs and invocation records.
    fn name(&self) -> &str;

    /// Execute the tool with JSON arguments, returning a JSON result.
    async fn execute(&self, args: Value) -> Result<Value>;
}
