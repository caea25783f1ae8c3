//! Seams to the surrounding event-loop runtime.
//!
//! The tracking core does not own an event loop. Everything it needs from
//! one (an idle-phase slot for the batched destroy flush, the post-dispatch
//! continuation drain, and the ambient-context precondition) is expressed
//! through [`EventLoopDriver`]. [`NoopDriver`] is the standalone default:
//! no idle phase (the host calls
//! [`crate::state::HookState::run_destroy_flush`] directly), no pending
//! continuations, always in context.
//!
//! [`ErrorZone`] models the legacy per-resource error zones some hosts still
//! carry; a disposed zone turns callback dispatch into a defined no-op.

use crate::error::ContinuationError;

/// Host event-loop operations consumed by the tracking core.
///
/// All methods have standalone-friendly defaults; implement only what the
/// host actually provides.
pub trait EventLoopDriver {
    /// True when the caller is running on the process's single authoritative
    /// execution context. Callback dispatch asserts this; a violation is a
    /// programming error, not a recoverable failure.
    fn in_authoritative_context(&self) -> bool {
        true
    }

    /// Schedules a one-shot destroy flush on the event loop's idle phase.
    ///
    /// Called exactly once per flush cycle, when the destroy queue goes from
    /// empty to nonempty. The host must eventually invoke
    /// [`crate::state::HookState::run_destroy_flush`].
    fn arm_idle_flush(&self) {}

    /// True if continuations were scheduled during the last callback and are
    /// waiting to be drained.
    fn has_pending_continuations(&self) -> bool {
        false
    }

    /// Drains pending continuations. Invoked at most once per outermost
    /// dispatch, and only when [`Self::has_pending_continuations`] reported
    /// work.
    fn drain_continuations(&self) -> Result<(), ContinuationError> {
        Ok(())
    }
}

/// Stand-in driver for hosts without an event loop (tests, simple embeddings).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDriver;

impl EventLoopDriver for NoopDriver {}

/// A legacy error zone attached to a resource.
///
/// Entered before the resource's callback runs and exited after the after
/// hook; a zone already disposed at dispatch time short-circuits the whole
/// invocation. `enter`/`exit` must not fail; a panic in either is fatal to
/// the process by design of the legacy protocol.
pub trait ErrorZone {
    /// True once the zone has been torn down.
    fn is_disposed(&self) -> bool;

    /// Enters the zone.
    fn enter(&self);

    /// Exits the zone.
    fn exit(&self);
}
