//! Configuration structures for the station controller.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Tick ceilings are bounded by `[1, TICKS_MAX]`; optional fields use
//! `#[serde(default)]` so a partial file falls back to the defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{
    ALIGNING_TICKS_DEFAULT, CLAMP_FINISH_TICKS_DEFAULT, CLAMP_TIMEOUT_TICKS_DEFAULT,
    DEFAULT_LOG_DIR, DISCHARGE_TICKS_DEFAULT, MOVE_TO_S2_TICKS_DEFAULT, TICKS_MAX,
    TRANSFER_TICKS_DEFAULT,
};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level LineCheck configuration.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "linecheck-01"
///
/// [timeouts]
/// clamp_timeout_ticks = 12
///
/// [log]
/// dir = "/var/log/linecheck"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineCheckConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub timeouts: TimeoutPolicy,
    #[serde(default)]
    pub log: RecordLogConfig,
}

impl LineCheckConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.timeouts.validate()?;
        self.log.validate()
    }
}

// ─── Timeout Policy ─────────────────────────────────────────────────

/// Per-phase tick ceilings.
///
/// A ceiling `n` fires on the tick where `tick_counter + 1 >= n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutPolicy {
    /// MOVE_TO_S2 ceiling → `S2_TIMEOUT`.
    pub move_to_s2_ticks: u32,
    /// TRANSFER ceiling without `n1` → `N1_TIMEOUT`.
    pub transfer_ticks: u32,
    /// ALIGNING dwell before WAIT_CLAMP.
    pub aligning_ticks: u32,
    /// CLAMPING ticks until holding.
    pub clamp_finish_ticks: u32,
    /// CLAMPING fatal ceiling → `CLAMP_TIMEOUT`.
    pub clamp_timeout_ticks: u32,
    /// DISCHARGE ticks until the part leaves the station.
    pub discharge_ticks: u32,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            move_to_s2_ticks: MOVE_TO_S2_TICKS_DEFAULT,
            transfer_ticks: TRANSFER_TICKS_DEFAULT,
            aligning_ticks: ALIGNING_TICKS_DEFAULT,
            clamp_finish_ticks: CLAMP_FINISH_TICKS_DEFAULT,
            clamp_timeout_ticks: CLAMP_TIMEOUT_TICKS_DEFAULT,
            discharge_ticks: DISCHARGE_TICKS_DEFAULT,
        }
    }
}

impl TimeoutPolicy {
    /// Validate bounds and the clamp window ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("timeouts.move_to_s2_ticks", self.move_to_s2_ticks),
            ("timeouts.transfer_ticks", self.transfer_ticks),
            ("timeouts.aligning_ticks", self.aligning_ticks),
            ("timeouts.clamp_finish_ticks", self.clamp_finish_ticks),
            ("timeouts.clamp_timeout_ticks", self.clamp_timeout_ticks),
            ("timeouts.discharge_ticks", self.discharge_ticks),
        ] {
            if value == 0 || value > TICKS_MAX {
                return Err(ConfigError::invalid(
                    name,
                    format!("{value} out of range [1, {TICKS_MAX}]"),
                ));
            }
        }
        if self.clamp_finish_ticks >= self.clamp_timeout_ticks {
            return Err(ConfigError::invalid(
                "timeouts.clamp_finish_ticks",
                format!(
                    "{} must be below clamp_timeout_ticks {}",
                    self.clamp_finish_ticks, self.clamp_timeout_ticks
                ),
            ));
        }
        Ok(())
    }
}

// ─── Record Log ─────────────────────────────────────────────────────

/// Append-only record log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordLogConfig {
    /// Start with logging enabled (`log toggle` flips it at runtime).
    pub enabled: bool,
    /// Directory receiving `linecheck_<run_id>.jsonl`.
    pub dir: PathBuf,
}

impl Default for RecordLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl RecordLogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("log.dir", "must not be empty"));
        }
        Ok(())
    }
}
