//! Lineage: causal lifecycle tracking for asynchronous resources.
//!
//! # Overview
//!
//! Lineage gives an event-driven runtime the bookkeeping it needs to let
//! instrumentation observe asynchronous work: every tracked resource gets a
//! unique identifier, a causal trigger link back to the resource whose
//! execution created it, and a four-phase lifecycle protocol (init, before,
//! after, destroy) dispatched to a single registered listener. The design
//! goal is zero measurable cost when nothing is listening: each phase is
//! gated by a shared activity counter, and destroy notifications are batched
//! through an idle-phase flush instead of paying one listener round trip per
//! teardown.
//!
//! # Core Guarantees
//!
//! - **Unique, monotonic ids**: never reused, allocated on the single
//!   control thread with no atomics
//! - **Causal triggers**: a resource created during another's callback
//!   records that resource's id, with one-shot and scoped overrides
//! - **Exact context restoration**: the execution-context stack restores
//!   the previous `(current, trigger)` pair on every exit path, including
//!   unwinding
//! - **Counter-gated dispatch**: a zero activity counter always suppresses
//!   a phase; a nonzero one never does
//! - **Batched destroys**: FIFO delivery, one flush per cycle, teardowns
//!   during a flush deferred to the next cycle
//! - **Loud instrumentation failures**: a faulting hook is escalated to the
//!   fatal handler, never retried or dropped
//!
//! # Module Structure
//!
//! - [`types`]: identifier and resource-kind types
//! - [`fields`]: the shared activity/execution buffers and offset contract
//! - [`hooks`]: the listener hook set and registration surface
//! - [`scope`]: guards for execution context, scoped triggers, reentrancy
//! - [`state`]: the owned process-wide tracking state
//! - [`resource`]: the per-resource lifecycle controller
//! - [`driver`]: seams to the host event loop
//! - [`error`]: error types
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use lineage::fields::ActivityField;
//! use lineage::hooks::HookSet;
//! use lineage::resource::AsyncResource;
//! use lineage::state::HookState;
//! use lineage::types::Provider;
//!
//! let state = Rc::new(HookState::new());
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let inits = seen.clone();
//! state
//!     .install_hooks(
//!         HookSet::new()
//!             .with_init(move |id, kind, trigger, _resource| {
//!                 inits.borrow_mut().push((id.as_f64(), kind.name(), trigger.as_f64()));
//!                 Ok(())
//!             })
//!             .with_before(|_| Ok(()))
//!             .with_after(|_| Ok(()))
//!             .with_destroy(|_| Ok(())),
//!     )
//!     .unwrap();
//! state.activity_fields().increment(ActivityField::Init);
//!
//! let server = AsyncResource::new(state.clone(), Provider::TcpWrap, Rc::new(()));
//! assert_eq!(seen.borrow()[0], (1000.0, "TCPWRAP", 0.0));
//! # let _ = server;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

pub mod driver;
pub mod error;
pub mod fields;
pub mod hooks;
pub mod resource;
pub mod scope;
pub mod state;
pub mod types;

// Re-exports for convenient access to core types
pub use driver::{ErrorZone, EventLoopDriver, NoopDriver};
pub use error::{ConfigError, ContinuationError, FatalHookError, HookFault};
pub use fields::{
    ActivityField, ActivityFields, ExecutionField, ExecutionFields, ACTIVITY_FIELDS_COUNT,
    EXECUTION_FIELDS_COUNT,
};
pub use hooks::{HookPhase, HookResult, HookSet, InitFn, PhaseFn, ResourceHandle};
pub use resource::AsyncResource;
pub use scope::{ExecScope, TriggerScope};
pub use state::{FatalHandler, HookState};
pub use types::{AsyncId, Provider};
