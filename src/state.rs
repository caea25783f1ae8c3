//! Process-wide tracking state.
//!
//! [`HookState`] owns everything the tracking core shares across call
//! sites: the two numeric buffers, the registered listener, the destroy
//! batch queue, the dispatch reentrancy depth, and the fatal handler. It is
//! one owned struct handed around by reference, never a file-scope static,
//! so tests and embeddings construct independent instances freely.
//!
//! The struct is `!Sync` (interior `Cell`/`RefCell`), which pins all access
//! to the single control thread by construction. Share it with `Rc`.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, error, trace};

use crate::driver::{EventLoopDriver, NoopDriver};
use crate::error::{ConfigError, FatalHookError, HookFault};
use crate::fields::{ActivityField, ActivityFields, ExecutionField, ExecutionFields};
use crate::hooks::{HookPhase, HookSet, ResourceHandle};
use crate::types::{AsyncId, Provider};

/// Receives hook faults. The default handler panics; hosts with their own
/// uncaught-failure machinery install a replacement.
pub type FatalHandler = Box<dyn Fn(&FatalHookError)>;

/// The owned process-wide tracking state.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use lineage::fields::ActivityField;
/// use lineage::hooks::HookSet;
/// use lineage::state::HookState;
///
/// let state = Rc::new(HookState::new());
/// state
///     .install_hooks(
///         HookSet::new()
///             .with_init(|_, _, _, _| Ok(()))
///             .with_before(|_| Ok(()))
///             .with_after(|_| Ok(()))
///             .with_destroy(|_| Ok(())),
///     )
///     .expect("first registration");
/// state.activity_fields().increment(ActivityField::Init);
/// ```
pub struct HookState {
    activity: ActivityFields,
    execution: ExecutionFields,
    hooks: RefCell<Option<Rc<HookSet>>>,
    destroy_queue: RefCell<Vec<f64>>,
    flush_armed: Cell<bool>,
    callback_depth: Cell<usize>,
    fatal_handler: RefCell<FatalHandler>,
    driver: Rc<dyn EventLoopDriver>,
}

impl HookState {
    /// Creates state with the standalone [`NoopDriver`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_driver(Rc::new(NoopDriver))
    }

    /// Creates state wired to a host event loop.
    #[must_use]
    pub fn with_driver(driver: Rc<dyn EventLoopDriver>) -> Self {
        Self {
            activity: ActivityFields::new(),
            execution: ExecutionFields::new(),
            hooks: RefCell::new(None),
            destroy_queue: RefCell::new(Vec::new()),
            flush_armed: Cell::new(false),
            callback_depth: Cell::new(0),
            fatal_handler: RefCell::new(Box::new(|err| {
                panic!("unrecoverable lifecycle hook failure: {err}")
            })),
            driver,
        }
    }

    // === shared buffers ===

    /// The per-phase activity counters, shared with the listener side.
    #[must_use]
    pub fn activity_fields(&self) -> &ActivityFields {
        &self.activity
    }

    /// The execution scalars, shared with the listener side.
    #[must_use]
    pub fn execution_fields(&self) -> &ExecutionFields {
        &self.execution
    }

    // === listener registration ===

    /// Installs the listener. Exactly one registration is permitted and all
    /// four entry points must be present.
    ///
    /// # Errors
    ///
    /// [`ConfigError::AlreadyInstalled`] on a second registration;
    /// [`ConfigError::MissingPhase`] if a slot is absent. Neither touches
    /// the previously installed listener.
    pub fn install_hooks(&self, hooks: HookSet) -> Result<(), ConfigError> {
        if self.hooks.borrow().is_some() {
            return Err(ConfigError::AlreadyInstalled);
        }
        if let Some(phase) = hooks.missing_phase() {
            return Err(ConfigError::MissingPhase(phase));
        }
        debug!("lifecycle hooks installed");
        *self.hooks.borrow_mut() = Some(Rc::new(hooks));
        Ok(())
    }

    /// True once a listener is installed.
    #[must_use]
    pub fn hooks_installed(&self) -> bool {
        self.hooks.borrow().is_some()
    }

    /// Replaces the fatal handler invoked on hook faults.
    pub fn set_fatal_handler(&self, handler: FatalHandler) {
        *self.fatal_handler.borrow_mut() = handler;
    }

    // === id allocation ===

    /// Allocates the next resource identifier. Strictly increasing, never
    /// reused.
    pub fn next_async_id(&self) -> AsyncId {
        let raw = self.execution.get(ExecutionField::UidCounter);
        self.execution.set(ExecutionField::UidCounter, raw + 1.0);
        AsyncId::from_raw(raw)
    }

    // === trigger registry ===

    /// Stages a one-shot trigger override consumed by exactly the next
    /// resource creation.
    pub fn set_init_trigger(&self, id: AsyncId) {
        self.execution
            .set(ExecutionField::InitTriggerId, id.as_f64());
    }

    /// Returns the pending one-shot override and resets it to
    /// [`AsyncId::NONE`].
    pub fn take_init_trigger(&self) -> AsyncId {
        let raw = self.execution.get(ExecutionField::InitTriggerId);
        self.execution.set(ExecutionField::InitTriggerId, 0.0);
        AsyncId::from_raw(raw)
    }

    /// Resolves and consumes the trigger id for a resource being created:
    /// one-shot override, else scoped trigger, else the current execution
    /// context, else [`AsyncId::NONE`].
    pub fn resolve_trigger(&self) -> AsyncId {
        let one_shot = self.take_init_trigger();
        if !one_shot.is_none() {
            return one_shot;
        }
        let scoped = AsyncId::from_raw(self.execution.get(ExecutionField::ScopedTriggerId));
        if !scoped.is_none() {
            return scoped;
        }
        AsyncId::from_raw(self.execution.get(ExecutionField::CurrentId))
    }

    /// The id of the resource whose callback is currently executing.
    #[must_use]
    pub fn current_id(&self) -> AsyncId {
        AsyncId::from_raw(self.execution.get(ExecutionField::CurrentId))
    }

    /// The trigger id of the currently executing resource.
    #[must_use]
    pub fn current_trigger_id(&self) -> AsyncId {
        AsyncId::from_raw(self.execution.get(ExecutionField::TriggerId))
    }

    // === hook dispatch ===

    /// True when at least one listener wants init dispatch.
    #[must_use]
    pub fn init_active(&self) -> bool {
        self.activity.get(ActivityField::Init) > 0
    }

    /// Dispatches the init hook if its counter is nonzero. Returns false
    /// only when the hook faulted (and the fault has been escalated).
    pub(crate) fn dispatch_init(
        &self,
        id: AsyncId,
        provider: Provider,
        trigger_id: AsyncId,
        resource: &ResourceHandle,
    ) -> bool {
        if self.activity.get(ActivityField::Init) == 0 {
            return true;
        }
        let Some(hook) = self.hook_set() else {
            return true;
        };
        let Some(init) = hook.init.as_ref() else {
            return true;
        };
        trace!(id = %id, kind = provider.name(), trigger = %trigger_id, "init hook");
        match init(id, provider, trigger_id, resource) {
            Ok(()) => true,
            Err(fault) => {
                self.raise_fatal(HookPhase::Init, fault);
                false
            }
        }
    }

    /// Dispatches the before hook if its counter is nonzero.
    pub(crate) fn dispatch_before(&self, id: AsyncId) -> bool {
        self.dispatch_phase(ActivityField::Before, HookPhase::Before, id)
    }

    /// Dispatches the after hook if its counter is nonzero.
    pub(crate) fn dispatch_after(&self, id: AsyncId) -> bool {
        self.dispatch_phase(ActivityField::After, HookPhase::After, id)
    }

    /// Dispatches the destroy hook if its counter is nonzero.
    pub(crate) fn dispatch_destroy(&self, id: AsyncId) -> bool {
        self.dispatch_phase(ActivityField::Destroy, HookPhase::Destroy, id)
    }

    fn dispatch_phase(&self, counter: ActivityField, phase: HookPhase, id: AsyncId) -> bool {
        if self.activity.get(counter) == 0 {
            return true;
        }
        let Some(hook) = self.hook_set() else {
            return true;
        };
        let slot = match phase {
            HookPhase::Before => &hook.before,
            HookPhase::After => &hook.after,
            HookPhase::Destroy => &hook.destroy,
            HookPhase::Init => unreachable!("init dispatch has its own path"),
        };
        let Some(hook_fn) = slot.as_ref() else {
            return true;
        };
        trace!(id = %id, phase = %phase, "phase hook");
        match hook_fn(id) {
            Ok(()) => true,
            Err(fault) => {
                self.raise_fatal(phase, fault);
                false
            }
        }
    }

    /// Clones the listener out of its cell so hooks can reenter the state
    /// (create resources, read buffers) while running.
    fn hook_set(&self) -> Option<Rc<HookSet>> {
        self.hooks.borrow().clone()
    }

    fn raise_fatal(&self, phase: HookPhase, fault: HookFault) {
        let err = FatalHookError { phase, fault };
        error!(%err, "lifecycle hook fault");
        let handler = self.fatal_handler.borrow();
        handler(&err);
    }

    // === destroy batch queue ===

    /// Appends a destroyed resource's id to the batch queue.
    ///
    /// A zero destroy counter makes this a strict no-op: no allocation, no
    /// queue interaction. The idle flush is armed once per cycle, when the
    /// queue turns nonempty.
    pub(crate) fn enqueue_destroy(&self, id: AsyncId) {
        if self.activity.get(ActivityField::Destroy) == 0 {
            return;
        }
        let was_empty = {
            let mut queue = self.destroy_queue.borrow_mut();
            let was_empty = queue.is_empty();
            queue.push(id.as_f64());
            was_empty
        };
        if was_empty && !self.flush_armed.get() {
            self.flush_armed.set(true);
            self.driver.arm_idle_flush();
        }
    }

    /// True while a flush is armed and has not yet run.
    #[must_use]
    pub fn flush_armed(&self) -> bool {
        self.flush_armed.get()
    }

    /// Number of ids waiting for the next flush.
    #[must_use]
    pub fn pending_destroys(&self) -> usize {
        self.destroy_queue.borrow().len()
    }

    /// The idle-phase flush entry point.
    ///
    /// Disarms itself first, takes the current queue contents, then
    /// dispatches the destroy hook per id in enqueue order. Teardowns that
    /// happen while the flush runs land in the next cycle. One entry's
    /// fault does not stop delivery of the rest (unless the fatal handler
    /// terminates the process, which is its prerogative).
    pub fn run_destroy_flush(&self) {
        self.flush_armed.set(false);
        let batch = self.destroy_queue.take();
        if batch.is_empty() {
            return;
        }
        debug!(batch = batch.len(), "flushing destroy notifications");
        for raw in batch {
            self.dispatch_destroy(AsyncId::from_raw(raw));
        }
    }

    // === reentrancy depth (used by CallbackScope) ===

    pub(crate) fn increment_callback_depth(&self) {
        self.callback_depth.set(self.callback_depth.get() + 1);
    }

    pub(crate) fn decrement_callback_depth(&self) {
        let depth = self.callback_depth.get();
        debug_assert!(depth > 0, "callback depth underflow");
        self.callback_depth.set(depth.saturating_sub(1));
    }

    pub(crate) fn callback_depth(&self) -> usize {
        self.callback_depth.get()
    }

    pub(crate) fn driver(&self) -> &Rc<dyn EventLoopDriver> {
        &self.driver
    }
}

impl Default for HookState {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for HookState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HookState")
            .field("activity", &self.activity.snapshot())
            .field("execution", &self.execution.snapshot())
            .field("hooks_installed", &self.hooks_installed())
            .field("pending_destroys", &self.pending_destroys())
            .field("flush_armed", &self.flush_armed.get())
            .field("callback_depth", &self.callback_depth.get())
            .finish_non_exhaustive()
    }
}
