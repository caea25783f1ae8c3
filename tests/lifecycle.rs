//! End-to-end lifecycle scenarios: creation, causal triggers, callback
//! dispatch, and batched destroy notification against a recording driver.

mod common;

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use common::*;
use lineage::fields::{ActivityField, ExecutionField};
use lineage::resource::AsyncResource;
use lineage::state::HookState;
use lineage::types::{AsyncId, Provider};

#[test]
fn tcp_resource_full_lifecycle() {
    init_test_logging();
    let driver = Rc::new(RecordingDriver::default());
    let state = Rc::new(HookState::with_driver(driver.clone()));
    let events = install_recording_hooks(&state);

    // Root context: no tracked callback on the stack.
    let server = AsyncResource::new(state.clone(), Provider::TcpWrap, Rc::new(()));
    assert_eq!(server.id().as_f64(), 1000.0);
    assert_eq!(*events.borrow(), vec!["init(1000,TCPWRAP,0)".to_string()]);

    // A resource created during the server's callback inherits its id.
    let connection = RefCell::new(None);
    let out = server.make_callback(|| {
        *connection.borrow_mut() = Some(AsyncResource::new(
            state.clone(),
            Provider::Connection,
            Rc::new(()),
        ));
        Ok::<_, ()>("accepted")
    });
    assert_eq!(out, Some("accepted"));

    let connection = connection.into_inner().unwrap();
    assert_eq!(connection.trigger_id(), server.id());
    assert_eq!(
        *events.borrow(),
        vec![
            "init(1000,TCPWRAP,0)".to_string(),
            "before(1000)".to_string(),
            "init(1001,CONNECTION,1000)".to_string(),
            "after(1000)".to_string(),
        ]
    );

    // Context restored to the void after dispatch.
    assert!(state.current_id().is_none());
    assert!(state.current_trigger_id().is_none());

    // Teardown enqueues once and arms the idle flush once.
    drop(connection);
    drop(server);
    assert_eq!(state.pending_destroys(), 2);
    assert_eq!(driver.arm_count.get(), 1);

    state.run_destroy_flush();
    let destroys: Vec<_> = events
        .borrow()
        .iter()
        .filter(|e| e.starts_with("destroy"))
        .cloned()
        .collect();
    assert_eq!(destroys, vec!["destroy(1001)", "destroy(1000)"]);
    assert_eq!(state.pending_destroys(), 0);
}

#[test]
fn one_shot_trigger_override_consumed_once() {
    init_test_logging();
    let state = Rc::new(HookState::new());
    let events = install_recording_hooks(&state);

    state.set_init_trigger(AsyncId::from_raw(42.0));
    let resource = AsyncResource::new(state.clone(), Provider::TimerWrap, Rc::new(()));

    assert_eq!(resource.trigger_id().as_f64(), 42.0);
    assert_eq!(*events.borrow(), vec!["init(1000,TIMERWRAP,42)".to_string()]);
    // The override reads back as zero immediately after consumption.
    assert_eq!(
        state.execution_fields().get(ExecutionField::InitTriggerId),
        0.0
    );

    // The next creation falls back to the (empty) ambient context.
    let next = AsyncResource::new(state, Provider::TimerWrap, Rc::new(()));
    assert!(next.trigger_id().is_none());
}

#[test]
fn nested_dispatch_drains_only_at_outermost() {
    init_test_logging();
    let driver = Rc::new(RecordingDriver::default());
    let state = Rc::new(HookState::with_driver(driver.clone()));
    install_recording_hooks(&state);

    let outer = AsyncResource::new(state.clone(), Provider::TcpWrap, Rc::new(()));
    let inner = AsyncResource::new(state.clone(), Provider::WriteWrap, Rc::new(()));

    driver.pending.set(true);
    let drains_after_inner = Cell::new(u32::MAX);
    let out = outer.make_callback(|| {
        let inner_out = inner.make_callback(|| Ok::<_, ()>("written"));
        assert_eq!(inner_out, Some("written"));
        drains_after_inner.set(driver.drains.get());
        Ok::<_, ()>("flushed")
    });

    assert_eq!(out, Some("flushed"));
    // The nested dispatch skipped the drain; the outermost ran it once.
    assert_eq!(drains_after_inner.get(), 0);
    assert_eq!(driver.drains.get(), 1);
}

#[test]
fn drain_failure_forfeits_the_result() {
    init_test_logging();
    let driver = Rc::new(RecordingDriver::default());
    let state = Rc::new(HookState::with_driver(driver.clone()));
    install_recording_hooks(&state);

    let resource = AsyncResource::new(state, Provider::TimerWrap, Rc::new(()));
    driver.pending.set(true);
    driver.fail_drain.set(true);

    let ran = Cell::new(false);
    let out = resource.make_callback(|| {
        ran.set(true);
        Ok::<_, ()>("fired")
    });

    assert!(ran.get());
    assert_eq!(out, None);
    assert_eq!(driver.drains.get(), 1);
}

#[test]
fn idle_creation_pays_no_dispatch() {
    init_test_logging();
    let state = Rc::new(HookState::new());
    let events = install_recording_hooks(&state);

    // Nothing listening for init.
    state.activity_fields().set(ActivityField::Init, 0);
    let resource = AsyncResource::new(state.clone(), Provider::FsReqWrap, Rc::new(()));

    assert_eq!(resource.id().as_f64(), 1000.0);
    assert!(!resource.initialized());
    assert!(events.borrow().is_empty());

    // A teardown the listener never saw an init for is not announced.
    drop(resource);
    assert_eq!(state.pending_destroys(), 0);
}

#[test]
fn dispatch_with_counters_but_no_listener_is_safe() {
    init_test_logging();
    let state = Rc::new(HookState::new());
    enable_all_counters(&state);

    let resource = AsyncResource::new(state.clone(), Provider::TimerWrap, Rc::new(()));
    let out = resource.make_callback(|| Ok::<_, ()>(7));
    assert_eq!(out, Some(7));
    drop(resource);
    state.run_destroy_flush();
}

#[test]
fn panicking_callback_restores_context() {
    init_test_logging();
    let state = Rc::new(HookState::new());
    install_recording_hooks(&state);

    let resource = AsyncResource::new(state.clone(), Provider::TimerWrap, Rc::new(()));
    let result = catch_unwind(AssertUnwindSafe(|| {
        resource.make_callback(|| -> Result<(), ()> { panic!("user code exploded") });
    }));

    assert!(result.is_err());
    assert!(state.current_id().is_none());
    assert!(state.current_trigger_id().is_none());
}

#[test]
fn teardown_during_flush_lands_in_next_cycle() {
    init_test_logging();
    let driver = Rc::new(RecordingDriver::default());
    let state = Rc::new(HookState::with_driver(driver.clone()));

    let order = Rc::new(RefCell::new(Vec::new()));
    let seen = order.clone();
    let flush_state = state.clone();
    let spawned = Rc::new(Cell::new(false));
    let spawn_once = spawned.clone();
    state
        .install_hooks(
            lineage::hooks::HookSet::new()
                .with_init(|_, _, _, _| Ok(()))
                .with_before(|_| Ok(()))
                .with_after(|_| Ok(()))
                .with_destroy(move |id| {
                    seen.borrow_mut().push(id.as_f64());
                    if !spawn_once.get() {
                        spawn_once.set(true);
                        // A resource torn down while the flush runs.
                        let late = AsyncResource::new(
                            flush_state.clone(),
                            Provider::ShutdownWrap,
                            Rc::new(()),
                        );
                        drop(late);
                    }
                    Ok(())
                }),
        )
        .expect("first registration");
    enable_all_counters(&state);

    let first = AsyncResource::new(state.clone(), Provider::TcpWrap, Rc::new(()));
    let first_id = first.id().as_f64();
    drop(first);

    state.run_destroy_flush();
    assert_eq!(*order.borrow(), vec![first_id]);
    assert!(state.flush_armed());
    assert_eq!(driver.arm_count.get(), 2);

    state.run_destroy_flush();
    assert_eq!(order.borrow().len(), 2);
    assert_eq!(state.pending_destroys(), 0);
}
