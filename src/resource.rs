//! The per-resource lifecycle controller.
//!
//! An [`AsyncResource`] pairs a host object with a tracked identity: it
//! allocates the id and trigger at construction (dispatching init), drives
//! the before/callback/after sequence through [`AsyncResource::make_callback`],
//! and enqueues the id for batched destroy notification when dropped.
//!
//! Pooled host objects call [`AsyncResource::reset`] when a pooled handle is
//! put back into use, so one physical object is tracked as a sequence of
//! distinct logical operations.

use core::cell::Cell;
use std::rc::Rc;

use crate::driver::ErrorZone;
use crate::hooks::ResourceHandle;
use crate::scope::{CallbackScope, ExecScope};
use crate::state::HookState;
use crate::types::{AsyncId, Provider};

/// A tracked asynchronous resource.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use lineage::resource::AsyncResource;
/// use lineage::state::HookState;
/// use lineage::types::Provider;
///
/// let state = Rc::new(HookState::new());
/// let timer = AsyncResource::new(state.clone(), Provider::TimerWrap, Rc::new(()));
/// let fired = timer.make_callback(|| Ok::<_, ()>(42));
/// assert_eq!(fired, Some(42));
/// ```
pub struct AsyncResource {
    state: Rc<HookState>,
    provider: Provider,
    id: Cell<AsyncId>,
    trigger_id: Cell<AsyncId>,
    initialized: Cell<bool>,
    handle: ResourceHandle,
    zone: Option<Rc<dyn ErrorZone>>,
}

impl core::fmt::Debug for AsyncResource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsyncResource")
            .field("provider", &self.provider)
            .field("id", &self.id.get())
            .field("trigger_id", &self.trigger_id.get())
            .field("initialized", &self.initialized.get())
            .field("has_zone", &self.zone.is_some())
            .finish_non_exhaustive()
    }
}

impl AsyncResource {
    /// Creates a tracked resource: allocates an id, resolves and consumes
    /// the trigger id, and dispatches the init hook if its counter is
    /// nonzero.
    ///
    /// # Panics
    ///
    /// Panics on [`Provider::None`]; the sentinel is never a live resource.
    #[must_use]
    pub fn new(state: Rc<HookState>, provider: Provider, handle: ResourceHandle) -> Self {
        assert!(
            provider != Provider::None,
            "cannot track a resource with the Provider::None sentinel"
        );
        let resource = Self {
            state,
            provider,
            id: Cell::new(AsyncId::NONE),
            trigger_id: Cell::new(AsyncId::NONE),
            initialized: Cell::new(false),
            handle,
            zone: None,
        };
        resource.reset();
        resource
    }

    /// Attaches a legacy error zone consulted by
    /// [`AsyncResource::make_callback`].
    #[must_use]
    pub fn with_zone(mut self, zone: Rc<dyn ErrorZone>) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Re-initializes the resource as a fresh logical operation: new id,
    /// newly resolved trigger, init dispatched again. For host objects that
    /// are pooled and reused over their lifetime.
    pub fn reset(&self) {
        let id = self.state.next_async_id();
        let trigger_id = self.state.resolve_trigger();
        self.id.set(id);
        self.trigger_id.set(trigger_id);
        self.initialized.set(self.state.init_active());
        self.state
            .dispatch_init(id, self.provider, trigger_id, &self.handle);
    }

    /// This resource's identifier for the current logical operation.
    #[must_use]
    pub fn id(&self) -> AsyncId {
        self.id.get()
    }

    /// The id of the resource whose execution caused this one's creation.
    #[must_use]
    pub fn trigger_id(&self) -> AsyncId {
        self.trigger_id.get()
    }

    /// The resource's kind tag.
    #[must_use]
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// True if the init hook fired for the current logical operation.
    ///
    /// Teardown of a never-initialized resource is not announced; the
    /// listener would otherwise count destroys it never saw inits for.
    #[must_use]
    pub fn initialized(&self) -> bool {
        self.initialized.get()
    }

    /// The host handle this resource was created with.
    #[must_use]
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// The tracking state this resource reports to.
    #[must_use]
    pub fn state(&self) -> &Rc<HookState> {
        &self.state
    }

    /// Invokes `callback` as this resource's callback.
    ///
    /// The full dispatch sequence: reentrancy accounting; disposed-zone
    /// short-circuit; zone entry; execution-context push; gated before
    /// hook; the callback itself; gated after hook; zone exit; context pop;
    /// and, on the outermost dispatch only, one continuation drain through
    /// the driver.
    ///
    /// Returns `None` ("no result") when the zone was disposed, a
    /// before/after hook faulted, the callback itself failed, or the drain
    /// failed. The callback's own error is not surfaced here; the host's
    /// failure reporting has already seen it. Execution-context restoration
    /// is guaranteed on every exit path.
    ///
    /// # Panics
    ///
    /// Panics when invoked outside the authoritative execution context, or
    /// when a hook faults and the installed fatal handler panics (the
    /// default).
    pub fn make_callback<R, E>(&self, callback: impl FnOnce() -> Result<R, E>) -> Option<R> {
        let state = &*self.state;
        assert!(
            state.driver().in_authoritative_context(),
            "make_callback invoked outside the authoritative execution context"
        );

        let callback_scope = CallbackScope::enter(state);

        if let Some(zone) = &self.zone {
            if zone.is_disposed() {
                return None;
            }
            zone.enter();
        }

        let exec_scope = ExecScope::enter(state, self.id.get(), self.trigger_id.get());

        if !state.dispatch_before(self.id.get()) {
            return None;
        }

        let result = match callback() {
            Ok(value) => value,
            Err(_) => return None,
        };

        if !state.dispatch_after(self.id.get()) {
            return None;
        }

        if let Some(zone) = &self.zone {
            zone.exit();
        }

        drop(exec_scope);

        if callback_scope.nested() {
            return Some(result);
        }

        if state.driver().has_pending_continuations()
            && state.driver().drain_continuations().is_err()
        {
            return None;
        }
        Some(result)
    }
}

impl Drop for AsyncResource {
    fn drop(&mut self) {
        if self.initialized.get() {
            self.state.enqueue_destroy(self.id.get());
        }
    }
}
