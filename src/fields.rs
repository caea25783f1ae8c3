//! Shared numeric state buffers.
//!
//! Tracking state that both the core and the listener side read and write
//! lives in two fixed-layout buffers:
//!
//! - [`ActivityFields`]: one `u32` per hook phase plus an aggregate slot.
//!   A zero slot means "nobody listening" and suppresses dispatch entirely;
//!   the listener side increments a slot when it wants that phase. Counters
//!   are advisory gates, not ownership; the core never toggles them.
//! - [`ExecutionFields`]: five `f64` scalars driving id allocation and
//!   trigger resolution.
//!
//! The field enums are the stable offset contract: a listener that only
//! sees the buffers can interpret them with [`ActivityField`] /
//! [`ExecutionField`] values alone. Offsets never change meaning.
//!
//! Both buffers use `Cell`, making every access a narrow, total operation
//! on the single control thread. The containing state is `!Sync`, so no
//! cross-thread access is possible by construction.

use core::cell::Cell;

use crate::types::AsyncId;

/// Offsets into the activity counter buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ActivityField {
    /// Listeners wanting init dispatch.
    Init = 0,
    /// Listeners wanting before dispatch.
    Before = 1,
    /// Listeners wanting after dispatch.
    After = 2,
    /// Listeners wanting destroy dispatch.
    Destroy = 3,
    /// Aggregate "any hooks active" slot, maintained by the listener side.
    ActiveHooks = 4,
}

/// Number of slots in the activity counter buffer.
pub const ACTIVITY_FIELDS_COUNT: usize = 5;

/// Offsets into the execution scalar buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ExecutionField {
    /// Next identifier to be assigned.
    UidCounter = 0,
    /// Identifier of the resource whose callback is currently executing.
    /// Zero means no tracked callback is on the stack.
    CurrentId = 1,
    /// Identifier that triggered the currently executing resource.
    TriggerId = 2,
    /// One-shot trigger override consumed by the next resource creation,
    /// then reset to zero.
    InitTriggerId = 3,
    /// Fallback trigger for all resources created within a
    /// [`crate::scope::TriggerScope`]; superseded by `InitTriggerId`.
    ScopedTriggerId = 4,
}

/// Number of slots in the execution scalar buffer.
pub const EXECUTION_FIELDS_COUNT: usize = 5;

/// The per-phase activity counters.
///
/// Readable and writable from both the core and the listener side. The
/// dispatch invariant: a zero counter always suppresses dispatch for its
/// phase; a nonzero counter never does.
#[derive(Debug, Default)]
pub struct ActivityFields {
    slots: [Cell<u32>; ACTIVITY_FIELDS_COUNT],
}

impl ActivityFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the counter for a field.
    #[must_use]
    pub fn get(&self, field: ActivityField) -> u32 {
        self.slots[field as usize].get()
    }

    /// Sets the counter for a field.
    pub fn set(&self, field: ActivityField, value: u32) {
        self.slots[field as usize].set(value);
    }

    /// Increments the counter for a field. Listener-side signaling.
    pub fn increment(&self, field: ActivityField) {
        let slot = &self.slots[field as usize];
        slot.set(slot.get() + 1);
    }

    /// Decrements the counter for a field, saturating at zero.
    pub fn decrement(&self, field: ActivityField) {
        let slot = &self.slots[field as usize];
        slot.set(slot.get().saturating_sub(1));
    }

    /// Returns a copy of every slot, in offset order.
    #[must_use]
    pub fn snapshot(&self) -> [u32; ACTIVITY_FIELDS_COUNT] {
        [
            self.slots[0].get(),
            self.slots[1].get(),
            self.slots[2].get(),
            self.slots[3].get(),
            self.slots[4].get(),
        ]
    }
}

/// The execution-state scalars.
///
/// Readable and writable from both sides; hosts seed `CurrentId` with
/// [`AsyncId::ROOT`] before running user code if they want an explicit root
/// context.
#[derive(Debug)]
pub struct ExecutionFields {
    slots: [Cell<f64>; EXECUTION_FIELDS_COUNT],
}

impl ExecutionFields {
    pub(crate) fn new() -> Self {
        let fields = Self {
            slots: Default::default(),
        };
        fields.set(ExecutionField::UidCounter, AsyncId::FIRST_ALLOCATED.as_f64());
        fields
    }

    /// Returns the scalar for a field.
    #[must_use]
    pub fn get(&self, field: ExecutionField) -> f64 {
        self.slots[field as usize].get()
    }

    /// Sets the scalar for a field.
    pub fn set(&self, field: ExecutionField, value: f64) {
        self.slots[field as usize].set(value);
    }

    /// Returns a copy of every slot, in offset order.
    #[must_use]
    pub fn snapshot(&self) -> [f64; EXECUTION_FIELDS_COUNT] {
        [
            self.slots[0].get(),
            self.slots[1].get(),
            self.slots[2].get(),
            self.slots[3].get(),
            self.slots[4].get(),
        ]
    }
}
