//! Error types for lifecycle tracking.
//!
//! Three failure families exist and they deliberately do not mix:
//!
//! - [`ConfigError`]: invalid listener registration, reported synchronously
//!   to the caller of [`crate::state::HookState::install_hooks`]. Recoverable.
//! - [`HookFault`] / [`FatalHookError`]: a listener hook reported failure.
//!   These are escalated through the process fatal handler, never retried
//!   and never dropped: corrupted tracking state is worse than a loud stop.
//! - [`ContinuationError`]: the host's continuation drain failed after an
//!   outermost dispatch; the dispatch result is forfeited.
//!
//! Internal invariant violations (sentinel provider tags, dispatch outside
//! the authoritative context) are not errors at all: they panic.

use thiserror::Error;

use crate::hooks::HookPhase;

/// Invalid or incomplete listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A listener is already installed; registration happens at most once.
    #[error("lifecycle hooks are already installed")]
    AlreadyInstalled,

    /// The listener is missing one of the four required entry points.
    #[error("listener is missing the {0} hook")]
    MissingPhase(HookPhase),
}

/// A failure reported by a listener hook.
///
/// Hooks return `Result<(), HookFault>`; an `Err` is routed to the fatal
/// handler installed on the owning [`crate::state::HookState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookFault(String);

impl HookFault {
    /// Creates a fault with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the fault message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// A hook fault paired with the phase that raised it, as delivered to the
/// fatal handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{phase} hook failed: {fault}")]
pub struct FatalHookError {
    /// The lifecycle phase whose hook failed.
    pub phase: HookPhase,
    /// The fault the hook reported.
    pub fault: HookFault,
}

/// The host's continuation drain failed after an outermost dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("continuation drain failed: {0}")]
pub struct ContinuationError(String);

impl ContinuationError {
    /// Creates a drain error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::AlreadyInstalled.to_string(),
            "lifecycle hooks are already installed"
        );
        assert_eq!(
            ConfigError::MissingPhase(HookPhase::Before).to_string(),
            "listener is missing the before hook"
        );
    }

    #[test]
    fn fatal_error_carries_phase_and_fault() {
        let err = FatalHookError {
            phase: HookPhase::Destroy,
            fault: HookFault::new("listener bug"),
        };
        assert_eq!(err.to_string(), "destroy hook failed: listener bug");
        assert_eq!(err.fault.message(), "listener bug");
    }
}
