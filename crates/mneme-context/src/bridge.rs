//! Hand-off of caller identity into tool execution.
//!
//! An inbound request parks its caller identity here under a fresh
//! correlation id. The worker that later executes tools for that request
//! picks the identity up by id and runs each tool inside an identity
//! scope. Keying the handoff per request means concurrent conversations
//! can be in flight at once without seeing each other's callers.
//!
//! Every invocation is instrumented: start, duration, truncated
//! arguments, and truncated result or error all reach the log, while the
//! tool's own return value and errors pass through untouched.

use crate::error::Result;
use crate::identity::{self, CallerId};
use crate::tool::Tool;
use crate::truncate::{truncate_chars, truncate_value};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

fn default_max_arg_chars() -> usize {
    100
}

fn default_max_result_chars() -> usize {
    500
}

/// Logging caps for tool invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Per-string cap for logged argument values.
    #[serde(default = "default_max_arg_chars")]
    pub max_arg_chars: usize,

    /// Cap for the logged result rendering.
    #[serde(default = "default_max_result_chars")]
    pub max_result_chars: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_arg_chars: default_max_arg_chars(),
            max_result_chars: default_max_result_chars(),
        }
    }
}

/// Carries caller identity from request handling into tool execution.
pub struct ContextBridge {
    handoff: DashMap<Uuid, CallerId>,
    config: BridgeConfig,
}

impl ContextBridge {
    /// Create a bridge with default logging caps.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Create a bridge with explicit logging caps.
    #[must_use]
    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            handoff: DashMap::new(),
            config,
        }
    }

    /// Park `caller` for one request's tool executions and return the
    /// correlation id the worker will use to pick it up.
    pub fn prepare_tool_context(&self, caller: CallerId) -> Uuid {
        let request_id = Uuid::new_v4();
        self.handoff.insert(request_id, caller);
        debug!(request_id = %request_id, caller = %caller, "Prepared tool context");
        request_id
    }

    /// Drop the parked identity for `request_id`.
    ///
    /// Idempotent. Must run on every exit path of the request's tool
    /// phase so finished requests leave nothing behind.
    pub fn clear_tool_context(&self, request_id: Uuid) {
        if self.handoff.remove(&request_id).is_some() {
            debug!(request_id = %request_id, "Cleared tool context");
        }
    }

    /// Number of requests whose identity is currently parked.
    #[must_use]
    pub fn pending_handoffs(&self) -> usize {
        self.handoff.len()
    }

    /// Execute `tool` for the request identified by `request_id`.
    ///
    /// If the executing task has no identity yet, the parked caller for
    /// this request is bound around the execution; an identity that is
    /// already present is never overwritten. Tool errors propagate
    /// unchanged after being logged with their duration.
    pub async fn invoke(&self, request_id: Uuid, tool: &dyn Tool, args: Value) -> Result<Value> {
        let seed = match identity::current() {
            // First writer wins: a live binding is never replaced.
            Some(_) => None,
            None => self.handoff.get(&request_id).map(|entry| *entry.value()),
        };
        match seed {
            Some(caller) => identity::scope(caller, self.run_instrumented(tool, args)).await,
            None => self.run_instrumented(tool, args).await,
        }
    }

    async fn run_instrumented(&self, tool: &dyn Tool, args: Value) -> Result<Value> {
        let logged_args = truncate_value(&args, self.config.max_arg_chars).to_string();
        let caller = identity::current();
        let start = Instant::now();
        debug!(tool = %tool.name(), caller = ?caller, args = %logged_args, "Invoking tool");

        match tool.execute(args).await {
            Ok(result) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                let summary = truncate_chars(&result.to_string(), self.config.max_result_chars);
                info!(
                    tool = %tool.name(),
                    duration_ms = %duration_ms,
                    result = %summary,
                    "Tool invocation completed"
                );
                Ok(result)
            }
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                let summary = truncate_chars(&e.to_string(), self.config.max_result_chars);
                error!(
                    tool = %tool.name(),
                    duration_ms = %duration_ms,
                    error = %summary,
                    "Tool invocation failed"
                );
                Err(e)
            }
        }
    }
}

impl Default for ContextBridge {
    fn default() -> Self {
        Self::new()
    }
}
