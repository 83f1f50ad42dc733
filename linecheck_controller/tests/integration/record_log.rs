//! Integration test: JSON Lines record log through the runner.
//!
//! Validates: one line per persisted record, monotonic sequence ids,
//! `log toggle` gaps, `clear log` truncation and that a broken log location
//! never stops the station.

use std::fs;
use std::path::Path;

use linecheck_common::station::error::ErrorCode;
use linecheck_common::station::record::OutputRecord;
use linecheck_common::station::state::{ActuatorFlags, Phase};

use linecheck_controller::cycle::StationRunner;
use linecheck_controller::sink::JsonlSink;
use linecheck_controller::state::machine::StationController;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

fn jsonl_runner(dir: &Path, enabled: bool) -> StationRunner<JsonlSink> {
    let sink = JsonlSink::new(dir, "run-it", enabled);
    StationRunner::new(StationController::default(), sink, "run-it")
}

fn read_records(path: &Path) -> Vec<OutputRecord> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn drive(runner: &mut StationRunner<JsonlSink>, tokens: &[&str]) {
    for token in tokens {
        runner.step(token);
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn full_cycle_is_logged_line_by_line() {
    let dir = TempDir::new().unwrap();
    let mut runner = jsonl_runner(dir.path(), true);
    drive(
        &mut runner,
        &[
            "s1", "tick", "tick", "tick", "s2", "tick", "tick", "n1", "tick", "clamp", "tick",
            "tick", "tick", "tick",
        ],
    );

    let records = read_records(runner.sink().path());
    assert_eq!(records.len(), 14);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.sequence_id, i as u64 + 1);
        assert_eq!(record.run_id, "run-it");
    }
    assert!(records.windows(2).all(|w| w[0].timestamp_us <= w[1].timestamp_us));

    let done = records.last().unwrap();
    assert_eq!(done.phase, Phase::Done);
    assert_eq!(done.snapshot.completed_count, 1);
    assert_eq!(done.actuators, ActuatorFlags::empty());

    let discharge = &records[11];
    assert_eq!(discharge.phase, Phase::Discharge);
    assert!(discharge.actuators.contains(ActuatorFlags::MOTOR_SECONDARY));
}

#[test]
fn error_codes_survive_serialization() {
    let dir = TempDir::new().unwrap();
    let mut runner = jsonl_runner(dir.path(), true);
    drive(&mut runner, &["n1", "s1", "tick", "tick", "tick", "tick"]);

    let records = read_records(runner.sink().path());
    assert_eq!(records[0].error_code, Some(ErrorCode::N1Unexpected));
    assert_eq!(records[5].error_code, Some(ErrorCode::S2Timeout));
    assert!(records[1..5].iter().all(|r| r.error_code.is_none()));

    let raw = fs::read_to_string(runner.sink().path()).unwrap();
    assert!(raw.contains("\"N1_UNEXPECTED\""));
    assert!(raw.contains("\"S2_TIMEOUT\""));
}

#[test]
fn toggle_and_clear_shape_the_file() {
    let dir = TempDir::new().unwrap();
    let mut runner = jsonl_runner(dir.path(), true);
    drive(&mut runner, &["s1", "tick", "log toggle", "tick", "tick"]);
    assert_eq!(
        read_records(runner.sink().path())
            .iter()
            .map(|r| r.sequence_id)
            .collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    drive(&mut runner, &["log toggle", "clear log", "s2"]);
    let records = read_records(runner.sink().path());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message, "Log cleared");
    assert_eq!(records[1].phase, Phase::AtEnd);

    // Maintenance never touched the station.
    assert_eq!(runner.controller().state().completed_count, 0);
    assert_eq!(runner.controller().phase(), Phase::AtEnd);
}

#[test]
fn disabled_log_creates_no_file() {
    let dir = TempDir::new().unwrap();
    let mut runner = jsonl_runner(&dir.path().join("never"), false);
    drive(&mut runner, &["s2", "tick", "reset"]);
    assert!(!runner.sink().path().exists());
    assert!(!dir.path().join("never").exists());
    assert_eq!(runner.stats().sink_failures, 0);
}

#[test]
fn broken_log_location_does_not_stop_station() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file_not_dir");
    fs::write(&blocker, "occupied").unwrap();

    let mut runner = jsonl_runner(&blocker, true);
    drive(&mut runner, &["s2", "tick", "tick", "n1"]);

    assert_eq!(runner.controller().phase(), Phase::Aligning);
    assert_eq!(runner.stats().sink_failures, 4);
    assert_eq!(runner.stats().commands, 4);
}
