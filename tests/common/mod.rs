#![allow(dead_code)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```
//! mod common;
//! use common::*;
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use lineage::error::ContinuationError;
use lineage::fields::ActivityField;
use lineage::hooks::HookSet;
use lineage::state::HookState;
use lineage::EventLoopDriver;

static INIT_LOGGING: Once = Once::new();

/// Initializes tracing output for tests, honoring `RUST_LOG`.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// An event-loop driver that records every interaction.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    /// Times the idle flush was armed.
    pub arm_count: Cell<u32>,
    /// Whether continuations are reported pending.
    pub pending: Cell<bool>,
    /// Times the continuation drain ran.
    pub drains: Cell<u32>,
    /// Makes the next drain fail.
    pub fail_drain: Cell<bool>,
}

impl EventLoopDriver for RecordingDriver {
    fn arm_idle_flush(&self) {
        self.arm_count.set(self.arm_count.get() + 1);
    }

    fn has_pending_continuations(&self) -> bool {
        self.pending.get()
    }

    fn drain_continuations(&self) -> Result<(), ContinuationError> {
        self.drains.set(self.drains.get() + 1);
        self.pending.set(false);
        if self.fail_drain.get() {
            Err(ContinuationError::new("tick callback failed"))
        } else {
            Ok(())
        }
    }
}

/// Installs hooks that record every dispatch as a formatted string and
/// enables all five activity counters.
pub fn install_recording_hooks(state: &Rc<HookState>) -> Rc<RefCell<Vec<String>>> {
    let events = Rc::new(RefCell::new(Vec::new()));

    let init_events = events.clone();
    let before_events = events.clone();
    let after_events = events.clone();
    let destroy_events = events.clone();
    state
        .install_hooks(
            HookSet::new()
                .with_init(move |id, kind, trigger, _resource| {
                    init_events.borrow_mut().push(format!(
                        "init({},{},{})",
                        id.as_f64(),
                        kind.name(),
                        trigger.as_f64()
                    ));
                    Ok(())
                })
                .with_before(move |id| {
                    before_events
                        .borrow_mut()
                        .push(format!("before({})", id.as_f64()));
                    Ok(())
                })
                .with_after(move |id| {
                    after_events
                        .borrow_mut()
                        .push(format!("after({})", id.as_f64()));
                    Ok(())
                })
                .with_destroy(move |id| {
                    destroy_events
                        .borrow_mut()
                        .push(format!("destroy({})", id.as_f64()));
                    Ok(())
                }),
        )
        .expect("first registration");

    enable_all_counters(state);
    events
}

/// Bumps every activity counter, including the aggregate slot.
pub fn enable_all_counters(state: &HookState) {
    let fields = state.activity_fields();
    fields.increment(ActivityField::Init);
    fields.increment(ActivityField::Before);
    fields.increment(ActivityField::After);
    fields.increment(ActivityField::Destroy);
    fields.increment(ActivityField::ActiveHooks);
}
