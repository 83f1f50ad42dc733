//! Error codes, event classification and snapshot validation errors.
//!
//! `ErrorCode` values are data carried in output records. They never surface
//! as Rust `Err`s: every domain fault is recovered inside the controller or
//! latched in `Phase::Error` until an operator reset.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::Phase;

/// Named station error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No `s2` within the MOVE_TO_S2 ceiling.
    S2Timeout,
    /// No `n1` within the TRANSFER ceiling.
    N1Timeout,
    /// `n1` received outside TRANSFER.
    N1Unexpected,
    /// AT_END without a part at the end sensor.
    StateMismatch,
    /// Downstream station not clear.
    StationBusy,
    /// Next transport section occupied.
    NextBlocked,
    /// Clamp never reached holding. **FATAL → ERROR**.
    ClampTimeout,
    /// `clamp` outside WAIT_CLAMP.
    InvalidState,
    /// Command rejected while latched in ERROR.
    ErrorLocked,
}

impl ErrorCode {
    /// Wire name, identical to the serde representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::S2Timeout => "S2_TIMEOUT",
            Self::N1Timeout => "N1_TIMEOUT",
            Self::N1Unexpected => "N1_UNEXPECTED",
            Self::StateMismatch => "STATE_MISMATCH",
            Self::StationBusy => "STATION_BUSY",
            Self::NextBlocked => "NEXT_BLOCKED",
            Self::ClampTimeout => "CLAMP_TIMEOUT",
            Self::InvalidState => "INVALID_STATE",
            Self::ErrorLocked => "ERROR_LOCKED",
        }
    }

    /// Returns true if this code latches the station in ERROR.
    #[inline]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ClampTimeout)
    }

    /// Default severity for a record carrying this code.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::ClampTimeout | Self::ErrorLocked => Severity::Error,
            _ => Severity::Warn,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// Source classification of an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Physical sensor edge (`s1`, `s2`, `n1`).
    Sensor,
    /// Controller bookkeeping: ticks, resets, ignored input.
    Controller,
    /// Interlock evaluation or downstream availability change.
    Interlock,
    /// Actuator command (stopper, clamp).
    Actuator,
    /// Operator maintenance command.
    Maintenance,
    /// Forced return to a safe phase after an inconsistency.
    AutoRecover,
    /// Completed part accounting.
    Qa,
    /// Phase-local tick ceiling exceeded.
    Timeout,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sensor => "sensor",
            Self::Controller => "controller",
            Self::Interlock => "interlock",
            Self::Actuator => "actuator",
            Self::Maintenance => "maintenance",
            Self::AutoRecover => "auto_recover",
            Self::Qa => "qa",
            Self::Timeout => "timeout",
        })
    }
}

/// Snapshot rejected by `StationState::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("phase {0} requires an error code")]
    MissingErrorCode(Phase),

    #[error("error code {code} set outside ERROR (phase {phase})")]
    StrayErrorCode { phase: Phase, code: ErrorCode },

    #[error("part flagged at end sensor while in {0}")]
    AtEndInTransit(Phase),

    #[error("motors running in {0}")]
    MotorsInHoldPhase(Phase),

    #[error("transient phase DONE cannot be restored")]
    TransientPhase,
}
