//! Tests for the VI scheduler state machine

use super::fixtures::{MockHost, make_ready_scheduler, make_scheduler};
use crate::config::TransitionConfig;
use crate::vi::{NoopTransition, ViScheduler};
use crate::Error;
use quickpanel_types::{ItemId, ItemKind, MachineState, ViId, ViOperation, ViPayload, ViState};
use std::time::Duration;

fn start(
    scheduler: &mut ViScheduler,
    host: &MockHost,
    name: &str,
    op: ViOperation,
    target: Option<ItemId>,
) -> ViId {
    let record = scheduler
        .create(
            op,
            ItemKind::Notification,
            target,
            host.recorder(name),
            ViPayload::None,
        )
        .unwrap();
    scheduler.start(record)
}

fn add_swipe(scheduler: &mut ViScheduler, host: &MockHost, name: &str) -> ViId {
    let record = scheduler
        .create(
            ViOperation::None,
            ItemKind::Notification,
            Some(ItemId(99)),
            host.recorder(name),
            ViPayload::Swipe { offset: 40 },
        )
        .unwrap();
    scheduler.add_user_event(record)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_new_scheduler_is_not_ready() {
    let host = MockHost::new();
    let scheduler = make_scheduler(&host);
    assert_eq!(scheduler.state(), MachineState::NotReady);
    assert_eq!(scheduler.pending_len(), 0);
    assert!(scheduler.current().is_none());
}

#[test]
fn test_init_follows_panel_visibility() {
    let open = MockHost::new();
    assert_eq!(make_ready_scheduler(&open).state(), MachineState::Ready);

    let closed = MockHost::closed();
    assert_eq!(make_ready_scheduler(&closed).state(), MachineState::Suspended);
}

#[test]
fn test_delete_while_not_ready_runs_inline() {
    let host = MockHost::new();
    let mut scheduler = make_scheduler(&host);

    let id = start(&mut scheduler, &host, "del", ViOperation::Delete, Some(ItemId(1)));

    assert_eq!(host.events(), vec!["del:init", "del:run"]);
    assert_eq!(host.log().freeze_calls, 1);
    assert_eq!(scheduler.state(), MachineState::Working);
    assert_eq!(scheduler.current(), Some(id));
    assert_eq!(scheduler.record_state(id), Some(ViState::Running));
    assert_eq!(host.log().input_toggles, vec![(ItemId(1), false)]);

    assert!(scheduler.done(id));
    assert_eq!(host.events(), vec!["del:init", "del:run", "del:done"]);
    assert_eq!(host.log().unfreeze_calls, 1);
    assert_eq!(scheduler.state(), MachineState::Ready);
    assert!(scheduler.current().is_none());
    assert!(scheduler.record_state(id).is_none());
}

#[test]
fn test_second_record_waits_for_first() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let a = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    let b = start(&mut scheduler, &host, "b", ViOperation::Insert, None);
    assert_eq!(host.events(), vec!["a:init", "b:init"]);

    assert!(scheduler.run_idle());
    assert_eq!(scheduler.current(), Some(a));
    assert_eq!(scheduler.record_state(b), Some(ViState::Ready));
    assert!(!scheduler.run_idle());

    scheduler.done(a);
    assert_eq!(scheduler.record_state(b), Some(ViState::Ready));
    scheduler.run_until_idle();

    assert_eq!(scheduler.current(), Some(b));
    assert_eq!(scheduler.record_state(b), Some(ViState::Running));
    assert_eq!(
        host.events(),
        vec!["a:init", "b:init", "a:run", "a:done", "b:run"]
    );
}

#[test]
fn test_start_while_ready_defers_to_idle() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let id = start(&mut scheduler, &host, "a", ViOperation::Update, None);
    assert_eq!(scheduler.state(), MachineState::Ready);
    assert_eq!(scheduler.record_state(id), Some(ViState::Ready));
    assert!(scheduler.has_idle_work());
    assert_eq!(host.log().render_cache_disabled, 1);
}

#[test]
fn test_finished_run_completes_immediately() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let record = scheduler
        .create(
            ViOperation::Update,
            ItemKind::Notification,
            None,
            host.recorder("quick").finishing(),
            ViPayload::None,
        )
        .unwrap();
    let id = scheduler.start(record);
    scheduler.run_until_idle();

    assert_eq!(host.events(), vec!["quick:init", "quick:run", "quick:done"]);
    assert!(scheduler.record_state(id).is_none());
    assert_eq!(scheduler.state(), MachineState::Ready);
    assert!(!scheduler.is_frozen());
}

#[test]
fn test_default_callbacks_are_noops() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let record = scheduler
        .create(
            ViOperation::Insert,
            ItemKind::Unknown,
            None,
            NoopTransition,
            ViPayload::None,
        )
        .unwrap();
    let id = scheduler.start(record);
    scheduler.run_until_idle();

    assert!(scheduler.record_state(id).is_none());
    assert_eq!(scheduler.pending_len(), 0);
}

// ============================================================================
// Completion and interruption
// ============================================================================

#[test]
fn test_done_and_interrupt_are_idempotent() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let id = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    scheduler.run_idle();

    assert!(scheduler.done(id));
    assert!(!scheduler.done(id));
    assert!(!scheduler.interrupt(id));
    assert_eq!(host.events(), vec!["a:init", "a:run", "a:done"]);
    assert_eq!(host.log().freeze_depth(), 0);
}

#[test]
fn test_unknown_id_is_ignored() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);
    assert!(!scheduler.done(ViId(42)));
    assert!(!scheduler.interrupt(ViId(42)));
}

#[test]
fn test_interrupt_queued_record_keeps_current_running() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let a = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    let b = start(&mut scheduler, &host, "b", ViOperation::Insert, None);
    scheduler.run_idle();

    assert!(scheduler.interrupt(b));
    assert_eq!(scheduler.current(), Some(a));
    assert_eq!(scheduler.state(), MachineState::Working);
    assert!(scheduler.is_frozen());
    assert!(host.events().contains(&"b:interrupt".to_string()));
    assert!(!host.events().contains(&"b:run".to_string()));
}

#[test]
fn test_interrupt_current_admits_next() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let a = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    let b = start(&mut scheduler, &host, "b", ViOperation::Insert, None);
    scheduler.run_idle();
    scheduler.interrupt(a);
    scheduler.run_until_idle();

    assert_eq!(scheduler.current(), Some(b));
}

// ============================================================================
// Suspend, resume, fini
// ============================================================================

#[test]
fn test_suspend_drains_without_running() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let ids: Vec<ViId> = ["a", "b", "c"]
        .iter()
        .map(|name| start(&mut scheduler, &host, name, ViOperation::Insert, None))
        .collect();
    host.clear_events();

    host.set_open(false);
    scheduler.suspend();

    assert_eq!(host.events(), vec!["a:done", "b:done", "c:done"]);
    assert_eq!(scheduler.state(), MachineState::Suspended);
    assert_eq!(scheduler.pending_len(), 0);
    assert!(ids.iter().all(|&id| scheduler.record_state(id).is_none()));
    assert_eq!(host.log().freeze_depth(), 0);
}

#[test]
fn test_suspend_while_working_drains_current() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let a = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    scheduler.run_idle();
    scheduler.suspend();

    assert!(scheduler.current().is_none());
    assert_eq!(scheduler.state(), MachineState::Suspended);
    assert_eq!(host.events(), vec!["a:init", "a:run", "a:done"]);

    // Late completion from the animation runner
    assert!(!scheduler.done(a));
}

#[test]
fn test_start_while_suspended_drains_on_idle() {
    let host = MockHost::closed();
    let mut scheduler = make_ready_scheduler(&host);

    start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    scheduler.run_until_idle();

    assert_eq!(host.events(), vec!["a:init", "a:done"]);
    assert_eq!(scheduler.state(), MachineState::Suspended);
}

#[test]
fn test_resume_admits_queued_work() {
    let host = MockHost::closed();
    let mut scheduler = make_ready_scheduler(&host);
    host.set_open(true);
    scheduler.resume();
    assert_eq!(scheduler.state(), MachineState::Ready);

    let id = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    scheduler.run_until_idle();
    assert_eq!(scheduler.current(), Some(id));
}

#[test]
fn test_resume_only_from_suspended() {
    let host = MockHost::new();
    let mut scheduler = make_scheduler(&host);
    scheduler.resume();
    assert_eq!(scheduler.state(), MachineState::NotReady);
}

#[test]
fn test_finish_recomputes_state_from_visibility() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let id = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    scheduler.run_idle();
    host.set_open(false);
    scheduler.done(id);

    assert_eq!(scheduler.state(), MachineState::Suspended);
}

#[test]
fn test_fini_drains_and_interrupts_user_events() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    add_swipe(&mut scheduler, &host, "swipe");
    host.clear_events();

    scheduler.fini();

    assert_eq!(host.events(), vec!["a:done", "swipe:interrupt"]);
    assert_eq!(scheduler.state(), MachineState::NotReady);
    assert_eq!(scheduler.user_event_len(), 0);
    assert!(!scheduler.has_idle_work());
    assert_eq!(host.log().freeze_depth(), 0);
}

// ============================================================================
// User events
// ============================================================================

#[test]
fn test_user_event_interrupted_before_next_run() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let swipe = add_swipe(&mut scheduler, &host, "swipe");
    assert_eq!(scheduler.record_state(swipe), Some(ViState::Running));

    start(&mut scheduler, &host, "ins", ViOperation::Insert, None);
    scheduler.run_idle();

    assert_eq!(
        host.events(),
        vec!["ins:init", "swipe:interrupt", "ins:run"]
    );
    assert_eq!(scheduler.user_event_len(), 0);
    assert!(scheduler.record_state(swipe).is_none());
}

#[test]
fn test_suppressing_record_leaves_user_events() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    add_swipe(&mut scheduler, &host, "swipe");
    let record = scheduler
        .create(
            ViOperation::Reorder,
            ItemKind::SettingButton,
            None,
            host.recorder("grid"),
            ViPayload::Reorder { from: 0, to: 2 },
        )
        .unwrap()
        .suppress_user_event_interrupt(true);
    scheduler.start(record);
    scheduler.run_idle();

    assert_eq!(scheduler.user_event_len(), 1);
    assert!(!host.events().contains(&"swipe:interrupt".to_string()));
}

#[test]
fn test_remove_user_event_fires_nothing() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let swipe = add_swipe(&mut scheduler, &host, "swipe");
    assert!(scheduler.remove_user_event(swipe));
    assert!(!scheduler.remove_user_event(swipe));

    assert!(host.events().is_empty());
    assert_eq!(host.log().net_retained(ItemId(99)), 0);
}

// ============================================================================
// Freeze and target liveness
// ============================================================================

#[test]
fn test_disable_freeze_skips_freeze() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let record = scheduler
        .create(
            ViOperation::Reorder,
            ItemKind::SettingButton,
            None,
            host.recorder("grid"),
            ViPayload::None,
        )
        .unwrap()
        .disable_freeze(true);
    scheduler.start(record);

    assert!(!scheduler.is_frozen());
    assert_eq!(host.log().freeze_calls, 0);
}

#[test]
fn test_freeze_engaged_once_for_many_records() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let ids: Vec<ViId> = (0..4)
        .map(|i| start(&mut scheduler, &host, &format!("r{i}"), ViOperation::Insert, None))
        .collect();
    assert_eq!(host.log().freeze_depth(), 1);

    for id in ids {
        scheduler.run_until_idle();
        assert_eq!(host.log().freeze_depth(), 1);
        scheduler.done(id);
    }
    assert_eq!(host.log().freeze_depth(), 0);
    assert_eq!(host.log().freeze_calls, 1);
}

#[test]
fn test_target_retained_until_terminal() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let id = start(&mut scheduler, &host, "a", ViOperation::Update, Some(ItemId(5)));
    assert_eq!(host.log().net_retained(ItemId(5)), 1);

    scheduler.run_idle();
    scheduler.done(id);
    assert_eq!(host.log().net_retained(ItemId(5)), 0);
}

#[test]
fn test_dead_target_is_never_touched() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);
    host.kill_item(ItemId(5));

    let id = start(&mut scheduler, &host, "a", ViOperation::Delete, Some(ItemId(5)));
    scheduler.run_idle();
    scheduler.done(id);

    let log = host.log();
    assert_eq!(log.retain_calls, 0);
    assert_eq!(log.release_calls, 0);
    assert!(log.input_toggles.is_empty());
}

#[test]
fn test_target_destroyed_while_queued_is_not_released() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);

    let id = start(&mut scheduler, &host, "a", ViOperation::Update, Some(ItemId(5)));
    host.kill_item(ItemId(5));
    scheduler.run_idle();
    scheduler.done(id);

    let log = host.log();
    assert_eq!(log.retain_calls, 1);
    assert_eq!(log.release_calls, 0);
}

// ============================================================================
// Timing
// ============================================================================

#[test]
fn test_backlog_throttles_duration() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);
    let ids: Vec<ViId> = (0..6)
        .map(|i| start(&mut scheduler, &host, &format!("r{i}"), ViOperation::Insert, None))
        .collect();
    for id in ids {
        scheduler.run_until_idle();
        assert_eq!(scheduler.current(), Some(id));
        assert!(scheduler.done(id));
    }

    // Only the head of a six-deep backlog is throttled; after it finishes
    // the queue is back at the threshold and the rest run at full length
    let base = Duration::from_millis(170);
    let timings: Vec<Duration> = host.log().run_timings.iter().map(|(_, d)| *d).collect();
    assert_eq!(timings, vec![base / 6, base, base, base, base, base]);
}

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn test_create_fails_when_queue_full() {
    let host = MockHost::new();
    let config = TransitionConfig {
        max_pending: 2,
        ..TransitionConfig::default()
    };
    let mut scheduler = ViScheduler::with_config(host.services(), &config);
    scheduler.init();

    start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    start(&mut scheduler, &host, "b", ViOperation::Insert, None);
    let err = scheduler
        .create(
            ViOperation::Insert,
            ItemKind::Notification,
            None,
            NoopTransition,
            ViPayload::None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Allocation(_)));
}

#[test]
fn test_ids_are_unique() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);
    let a = start(&mut scheduler, &host, "a", ViOperation::Insert, None);
    let b = start(&mut scheduler, &host, "b", ViOperation::Insert, None);
    assert_ne!(a, b);
}

#[test]
fn test_apply_immediately_runs_init_then_done() {
    let host = MockHost::new();
    let mut scheduler = make_ready_scheduler(&host);
    let mut transition = host.recorder("direct");

    scheduler.apply_immediately(
        ViOperation::Insert,
        ItemKind::Notification,
        None,
        ViPayload::None,
        &mut transition,
    );

    assert_eq!(host.events(), vec!["direct:init", "direct:done"]);
    assert_eq!(scheduler.pending_len(), 0);
    assert!(!scheduler.is_frozen());
}
