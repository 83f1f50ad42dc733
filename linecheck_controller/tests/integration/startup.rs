//! Integration test: configuration-driven startup.
//!
//! Validates: shipped config file → validation passes → controller runs on
//! the configured tick ceilings; invalid ceilings are rejected before any
//! station is built.

use std::io::Write;

use linecheck_common::config::{ConfigError, LogLevel};
use linecheck_common::station::command::Command::*;
use linecheck_common::station::config::TimeoutPolicy;
use linecheck_common::station::error::ErrorCode;
use linecheck_common::station::state::Phase;

use linecheck_controller::config::{ConfigSource, load_config_from_str, resolve_config};
use linecheck_controller::state::machine::StationController;
use tempfile::NamedTempFile;

const SHIPPED_TOML: &str = include_str!("../../../config/linecheck.toml");

#[test]
fn shipped_config_matches_defaults() {
    let cfg = load_config_from_str(SHIPPED_TOML).unwrap();
    assert_eq!(cfg.timeouts, TimeoutPolicy::default());
    assert_eq!(cfg.shared.log_level, LogLevel::Info);
    assert_eq!(cfg.shared.service_name, "linecheck-01");
    assert!(cfg.log.enabled);
}

#[test]
fn configured_ceilings_drive_the_station() {
    let cfg = load_config_from_str(
        r#"
[timeouts]
move_to_s2_ticks = 6
aligning_ticks = 3
"#,
    )
    .unwrap();
    let mut ctrl = StationController::new(cfg.timeouts);

    ctrl.handle(S1);
    for _ in 0..5 {
        assert!(ctrl.handle(Tick).error_code.is_none());
    }
    assert_eq!(ctrl.handle(Tick).error_code, Some(ErrorCode::S2Timeout));

    for &cmd in &[S1, S2, Tick, Tick, N1, Tick, Tick] {
        ctrl.handle(cmd);
    }
    assert_eq!(ctrl.phase(), Phase::Aligning);
    ctrl.handle(Tick);
    assert_eq!(ctrl.phase(), Phase::WaitClamp);
}

#[test]
fn invalid_ceilings_are_rejected() {
    for toml in [
        "[timeouts]\nmove_to_s2_ticks = 0\n",
        "[timeouts]\nclamp_finish_ticks = 12\n",
        "[timeouts]\ndischarge_ticks = 100000\n",
        "[log]\ndir = \"\"\n",
        "[shared]\nlog_level = \"loud\"\n",
    ] {
        let err = load_config_from_str(toml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { .. } | ConfigError::Syntax(_)),
            "accepted: {toml}"
        );
    }
}

#[test]
fn explicit_file_feeds_controller() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[timeouts]\ntransfer_ticks = 2\n").unwrap();
    file.flush().unwrap();

    let (cfg, source) = resolve_config(Some(file.path())).unwrap();
    assert!(matches!(source, ConfigSource::File(_)));

    let mut ctrl = StationController::new(cfg.timeouts);
    for &cmd in &[S2, Tick, Tick, Tick] {
        ctrl.handle(cmd);
    }
    let out = ctrl.handle(Tick);
    assert_eq!(out.error_code, Some(ErrorCode::N1Timeout));
}
