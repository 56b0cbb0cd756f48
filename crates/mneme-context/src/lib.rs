//! Mneme Context - Caller Identity Propagation
//!
//! This crate carries the identity of the human caller across the
//! boundary between request handling and tool execution:
//! - Identity: task-local caller binding, isolated per task
//! - Bridge: per-request identity handoff plus instrumented invocation
//! - Tool: the trait tool implementations provide
//! - Truncate: bounded log renderings of arguments and results
//!
//! ```text
//! request task                     worker task
//!     │ prepare_tool_context(id)       │
//!     ├──────────► handoff map ────────┤ invoke: seed identity scope
//!     │                                ├──► tool.execute(args)
//!     │ clear_tool_context(id)         │    (reads identity::current)
//!     └──────────► entry removed       └──► scope unwinds
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bridge;
pub mod error;
pub mod identity;
pub mod tool;
pub mod truncate;

pub use bridge::{BridgeConfig, ContextBridge};
pub use error::{Error, Result};
pub use identity::CallerId;
pub use tool::Tool;
