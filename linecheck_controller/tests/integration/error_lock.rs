//! Integration test: clamp fault latching and release.
//!
//! Validates:
//! 1. A clamp that never reaches holding latches ERROR with CLAMP_TIMEOUT
//! 2. ERROR rejects operational commands with ERROR_LOCKED
//! 3. Maintenance commands stay available while latched
//! 4. `reset` clears the fault and keeps `completed_count`

use linecheck_common::station::command::Command::{self, *};
use linecheck_common::station::config::TimeoutPolicy;
use linecheck_common::station::error::{ErrorCode, EventKind, Severity};
use linecheck_common::station::state::{Phase, StationState};

use linecheck_controller::cycle::StationRunner;
use linecheck_controller::sink::MemorySink;
use linecheck_controller::state::machine::StationController;

// ── Helpers ─────────────────────────────────────────────────────────

/// Controller resumed one tick short of the fatal clamp ceiling.
fn clamping_near_ceiling(completed: u64) -> StationController {
    let mut state = StationState::new();
    state.phase = Phase::Clamping;
    state.aligned = true;
    state.clamp_active = true;
    state.tick_counter = 9;
    state.completed_count = completed;
    StationController::from_state(TimeoutPolicy::default(), state).unwrap()
}

fn latched(completed: u64) -> StationController {
    let mut ctrl = clamping_near_ceiling(completed);
    let out = ctrl.handle(Tick);
    assert_eq!(out.phase(), Phase::Error);
    ctrl
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn clamp_ceiling_latches_fault() {
    let mut ctrl = clamping_near_ceiling(7);
    let out = ctrl.handle(Tick);

    assert_eq!(out.error_code, Some(ErrorCode::ClampTimeout));
    assert_eq!(out.event_kind, EventKind::Timeout);
    assert_eq!(out.severity, Severity::Error);

    let s = ctrl.state();
    assert_eq!(s.phase, Phase::Error);
    assert_eq!(s.error_code, Some(ErrorCode::ClampTimeout));
    assert!(s.error_message.as_deref().unwrap_or("").contains("10"));
    assert!(!s.motor_primary_on && !s.motor_secondary_on);
    assert!(!s.clamp_active);
    assert_eq!(s.completed_count, 7);
}

#[test]
fn latched_fault_rejects_operation() {
    let mut ctrl = latched(3);
    let before = ctrl.state().clone();

    let operational = Command::ALL
        .iter()
        .copied()
        .filter(|c| !c.allowed_in_error());
    for cmd in operational {
        let out = ctrl.handle(cmd);
        assert_eq!(out.error_code, Some(ErrorCode::ErrorLocked), "{cmd}");
        assert_eq!(out.severity, Severity::Error);
        assert_eq!(
            out.message,
            "ERROR state: only 'reset' or 'exit' allowed"
        );
        assert_eq!(ctrl.state(), &before, "{cmd} mutated latched state");
    }
}

#[test]
fn maintenance_allowed_while_latched() {
    let mut ctrl = latched(3);
    let out = ctrl.handle(ClearCount);
    assert!(out.error_code.is_none());
    assert_eq!(out.event_kind, EventKind::Maintenance);
    assert_eq!(ctrl.state().completed_count, 0);
    assert_eq!(ctrl.phase(), Phase::Error);
}

#[test]
fn reset_releases_fault_and_keeps_count() {
    let mut ctrl = latched(5);
    let out = ctrl.handle(Reset);
    assert!(out.error_code.is_none());
    assert_eq!(out.phase(), Phase::WaitEmpty);

    let mut idle = StationState::new();
    idle.completed_count = 5;
    assert_eq!(ctrl.state(), &idle);

    // Station is fully operational again.
    for &cmd in &[S2, Tick, Tick, N1, Tick, Clamp, Tick, Tick, Tick, Tick] {
        ctrl.handle(cmd);
    }
    assert_eq!(ctrl.state().completed_count, 6);
}

#[test]
fn runner_records_lock_and_exit() {
    let sink = MemorySink::new();
    let mut runner = StationRunner::new(latched(0), sink, "run-lock");

    let locked = runner.step("s1");
    assert_eq!(locked.record.error_code, Some(ErrorCode::ErrorLocked));
    assert_eq!(locked.record.phase, Phase::Error);

    let exit = runner.step("exit");
    assert!(exit.exit);
    assert_eq!(runner.stats().errors, 1);
    assert_eq!(runner.sink().records().len(), 2);
}
