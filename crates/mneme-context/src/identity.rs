//! Task-local caller identity.
//!
//! Every unit of work that acts on behalf of a human caller runs inside
//! an identity scope. The binding lives in a `tokio::task_local!` slot,
//! so isolation between concurrent requests is structural: no task can
//! read or overwrite another task's binding, and no locking is involved.
//! The slot unwinds with the scope on every exit path, including
//! cancellation, because teardown is drop-based.
//!
//! Reading the identity where none was ever bound is not an error; it
//! reports [`None`], and callers that require a caller must treat that
//! absence themselves.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::future::Future;
use tracing::warn;

/// Identifier of the human caller a unit of work runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(i64);

impl CallerId {
    /// Wrap a raw caller identifier.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for CallerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

tokio::task_local! {
    static CURRENT_CALLER: Cell<Option<CallerId>>;
}

/// Run `fut` with `caller` bound as the current identity.
///
/// The binding is visible to everything `fut` awaits within the same
/// task and disappears when the returned future completes or is dropped.
/// Nested scopes shadow the outer binding for their duration.
pub async fn scope<F>(caller: CallerId, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_CALLER.scope(Cell::new(Some(caller)), fut).await
}

/// Run `fut` with an identity slot hosted but no caller bound.
///
/// Inside the returned future [`current`] reports [`None`] until [`set`]
/// binds a caller. Worker tasks that receive their identity mid-flight
/// run under this scope.
pub async fn anonymous<F>(fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_CALLER.scope(Cell::new(None), fut).await
}

/// The identity bound to the current task, if any.
///
/// Returns [`None`] both when no scope is hosted and when a hosted scope
/// holds no caller.
#[must_use]
pub fn current() -> Option<CallerId> {
    CURRENT_CALLER.try_with(Cell::get).ok().flatten()
}

/// Bind `caller` as the current task's identity.
///
/// Replaces any existing binding in the hosted scope; callers that must
/// not overwrite check [`current`] first. Outside any scope this is a
/// logged no-op, never a panic.
pub fn set(caller: CallerId) {
    if CURRENT_CALLER.try_with(|slot| slot.set(Some(caller))).is_err() {
        warn!(caller = %caller, "No identity scope on this task; caller binding dropped");
    }
}

/// Remove the current task's identity binding, leaving the scope hosted.
///
/// Outside any scope this is a silent no-op.
pub fn clear() {
    let _ = CURRENT_CALLER.try_with(|slot| slot.set(None));
}
