//! The listener hook surface.
//!
//! A single listener supplies four entry points (init, before, after,
//! destroy) registered once per process via
//! [`crate::state::HookState::install_hooks`]. Each slot is independently
//! optional in the table; whether a phase actually dispatches is decided by
//! its activity counter, never by slot presence alone, so an idle process
//! pays nothing beyond one counter load per phase.
//!
//! Hooks return `Result<(), HookFault>`. A fault is an instrumentation bug:
//! it is escalated to the fatal handler, not retried, not swallowed.

use core::any::Any;
use core::fmt;
use std::rc::Rc;

use crate::error::HookFault;
use crate::types::{AsyncId, Provider};

/// Opaque handle to the host object owning a tracked resource.
///
/// The host's object system is out of scope here; listeners downcast if
/// they know the concrete type.
pub type ResourceHandle = Rc<dyn Any>;

/// Result type returned by every listener hook.
pub type HookResult = Result<(), HookFault>;

/// The init hook: `(id, kind, trigger_id, resource)`.
pub type InitFn = Box<dyn Fn(AsyncId, Provider, AsyncId, &ResourceHandle) -> HookResult>;

/// The before/after/destroy hooks: `(id)`.
pub type PhaseFn = Box<dyn Fn(AsyncId) -> HookResult>;

/// A lifecycle phase, used in errors and the registration contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    /// Resource creation.
    Init,
    /// Entry into the resource's callback.
    Before,
    /// Exit from the resource's callback.
    After,
    /// Resource teardown (batched).
    Destroy,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Before => "before",
            Self::After => "after",
            Self::Destroy => "destroy",
        })
    }
}

/// The four listener entry points.
///
/// Built incrementally with the `with_*` methods; registration requires all
/// four to be present.
///
/// # Example
///
/// ```
/// use lineage::hooks::HookSet;
///
/// let hooks = HookSet::new()
///     .with_init(|_id, _kind, _trigger, _resource| Ok(()))
///     .with_before(|_id| Ok(()))
///     .with_after(|_id| Ok(()))
///     .with_destroy(|_id| Ok(()));
/// assert!(hooks.is_complete());
/// ```
#[derive(Default)]
pub struct HookSet {
    pub(crate) init: Option<InitFn>,
    pub(crate) before: Option<PhaseFn>,
    pub(crate) after: Option<PhaseFn>,
    pub(crate) destroy: Option<PhaseFn>,
}

impl HookSet {
    /// Creates an empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the init hook.
    #[must_use]
    pub fn with_init(
        mut self,
        hook: impl Fn(AsyncId, Provider, AsyncId, &ResourceHandle) -> HookResult + 'static,
    ) -> Self {
        self.init = Some(Box::new(hook));
        self
    }

    /// Sets the before hook.
    #[must_use]
    pub fn with_before(mut self, hook: impl Fn(AsyncId) -> HookResult + 'static) -> Self {
        self.before = Some(Box::new(hook));
        self
    }

    /// Sets the after hook.
    #[must_use]
    pub fn with_after(mut self, hook: impl Fn(AsyncId) -> HookResult + 'static) -> Self {
        self.after = Some(Box::new(hook));
        self
    }

    /// Sets the destroy hook.
    #[must_use]
    pub fn with_destroy(mut self, hook: impl Fn(AsyncId) -> HookResult + 'static) -> Self {
        self.destroy = Some(Box::new(hook));
        self
    }

    /// Returns true if all four entry points are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_phase().is_none()
    }

    /// Returns the first absent phase, if any, in lifecycle order.
    #[must_use]
    pub fn missing_phase(&self) -> Option<HookPhase> {
        if self.init.is_none() {
            Some(HookPhase::Init)
        } else if self.before.is_none() {
            Some(HookPhase::Before)
        } else if self.after.is_none() {
            Some(HookPhase::After)
        } else if self.destroy.is_none() {
            Some(HookPhase::Destroy)
        } else {
            None
        }
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("init", &self.init.is_some())
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("destroy", &self.destroy.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_set() -> HookSet {
        HookSet::new()
            .with_init(|_, _, _, _| Ok(()))
            .with_before(|_| Ok(()))
            .with_after(|_| Ok(()))
            .with_destroy(|_| Ok(()))
    }

    #[test]
    fn empty_set_reports_init_missing_first() {
        let hooks = HookSet::new();
        assert!(!hooks.is_complete());
        assert_eq!(hooks.missing_phase(), Some(HookPhase::Init));
    }

    #[test]
    fn missing_phase_follows_lifecycle_order() {
        let hooks = HookSet::new().with_init(|_, _, _, _| Ok(()));
        assert_eq!(hooks.missing_phase(), Some(HookPhase::Before));

        let hooks = full_set();
        assert!(hooks.is_complete());
        assert_eq!(hooks.missing_phase(), None);
    }

    #[test]
    fn phase_display() {
        assert_eq!(HookPhase::Init.to_string(), "init");
        assert_eq!(HookPhase::Destroy.to_string(), "destroy");
    }

    #[test]
    fn debug_shows_slot_presence() {
        let hooks = HookSet::new().with_before(|_| Ok(()));
        let repr = format!("{hooks:?}");
        assert!(repr.contains("before: true"));
        assert!(repr.contains("init: false"));
    }
}
