//! Output records emitted once per command.
//!
//! A record pairs the controller's verdict (message, event kind, severity,
//! optional error code) with a full `StationState` snapshot. The runner
//! stamps run identity, sequence number and emission time before handing
//! it to a sink.

use serde::{Deserialize, Serialize};

use super::error::{ErrorCode, EventKind, Severity};
use super::state::{ActuatorFlags, Phase, StationState};

/// Controller verdict for one command, before run stamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub command: String,
    pub message: String,
    pub event_kind: EventKind,
    pub severity: Severity,
    pub error_code: Option<ErrorCode>,
    pub snapshot: StationState,
    /// `exit` was requested.
    pub exit: bool,
}

impl Outcome {
    /// Phase at emission time.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.snapshot.phase
    }
}

/// Persisted output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub run_id: String,
    pub sequence_id: u64,
    /// Emission time [µs since UNIX epoch].
    pub timestamp_us: u64,
    pub command: String,
    pub message: String,
    pub phase: Phase,
    pub event_kind: EventKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    pub actuators: ActuatorFlags,
    pub snapshot: StationState,
}

impl OutputRecord {
    /// Stamp an outcome with run identity and emission time.
    pub fn from_outcome(
        outcome: Outcome,
        run_id: &str,
        sequence_id: u64,
        timestamp_us: u64,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            sequence_id,
            timestamp_us,
            phase: outcome.snapshot.phase,
            actuators: outcome.snapshot.actuators(),
            command: outcome.command,
            message: outcome.message,
            event_kind: outcome.event_kind,
            severity: outcome.severity,
            error_code: outcome.error_code,
            snapshot: outcome.snapshot,
        }
    }
}
