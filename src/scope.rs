//! Scoped guards over the shared execution scalars.
//!
//! All three guards restore their slice of state unconditionally on drop,
//! including during unwinding. Restoration is structural, never a manual
//! "pop" left to the caller.
//!
//! - [`ExecScope`]: the execution-context stack. Entering records the new
//!   `(current, trigger)` pair; dropping restores the previous pair exactly,
//!   so nested and reentrant callback dispatch compose.
//! - [`TriggerScope`]: dynamic-extent trigger inheritance. Resources created
//!   while the guard lives default their trigger to the scoped id.
//! - [`CallbackScope`]: reentrancy depth for callback dispatch; the
//!   continuation drain runs only when the outermost dispatch unwinds.

use crate::fields::ExecutionField;
use crate::state::HookState;
use crate::types::AsyncId;

/// An entry on the execution-context stack.
///
/// While alive, the shared `CurrentId`/`TriggerId` scalars report the
/// entered resource; dropping restores the pair that was active before
/// entry, bit for bit.
#[derive(Debug)]
pub struct ExecScope<'a> {
    state: &'a HookState,
    prev_current: f64,
    prev_trigger: f64,
}

impl<'a> ExecScope<'a> {
    /// Pushes an execution context for the given resource.
    #[must_use]
    pub fn enter(state: &'a HookState, id: AsyncId, trigger_id: AsyncId) -> Self {
        let exec = state.execution_fields();
        let prev_current = exec.get(ExecutionField::CurrentId);
        let prev_trigger = exec.get(ExecutionField::TriggerId);
        exec.set(ExecutionField::CurrentId, id.as_f64());
        exec.set(ExecutionField::TriggerId, trigger_id.as_f64());
        Self {
            state,
            prev_current,
            prev_trigger,
        }
    }
}

impl Drop for ExecScope<'_> {
    fn drop(&mut self) {
        let exec = self.state.execution_fields();
        exec.set(ExecutionField::CurrentId, self.prev_current);
        exec.set(ExecutionField::TriggerId, self.prev_trigger);
    }
}

/// Dynamic-extent trigger override.
///
/// Resources created while the guard lives inherit the scoped id as their
/// trigger unless a one-shot override supersedes it. Scopes nest; each drop
/// restores the previous scoped id.
#[derive(Debug)]
pub struct TriggerScope<'a> {
    state: &'a HookState,
    prev: f64,
}

impl<'a> TriggerScope<'a> {
    /// Sets the scoped trigger id for the extent of the guard.
    #[must_use]
    pub fn enter(state: &'a HookState, id: AsyncId) -> Self {
        let exec = state.execution_fields();
        let prev = exec.get(ExecutionField::ScopedTriggerId);
        exec.set(ExecutionField::ScopedTriggerId, id.as_f64());
        Self { state, prev }
    }
}

impl Drop for TriggerScope<'_> {
    fn drop(&mut self) {
        self.state
            .execution_fields()
            .set(ExecutionField::ScopedTriggerId, self.prev);
    }
}

/// Reentrancy depth guard for callback dispatch.
///
/// The first live scope is the outermost dispatch; only it runs the
/// continuation drain after its callback returns.
#[derive(Debug)]
pub(crate) struct CallbackScope<'a> {
    state: &'a HookState,
}

impl<'a> CallbackScope<'a> {
    pub(crate) fn enter(state: &'a HookState) -> Self {
        state.increment_callback_depth();
        Self { state }
    }

    /// True when this dispatch is nested inside another one.
    pub(crate) fn nested(&self) -> bool {
        self.state.callback_depth() > 1
    }
}

impl Drop for CallbackScope<'_> {
    fn drop(&mut self) {
        self.state.decrement_callback_depth();
    }
}
