//! Command cycle: read → process → record.
//!
//! `StationRunner` pairs one `StationController` with one `RecordSink`.
//! Each `step` accepts a single command token, lets the controller process
//! it to completion, stamps the outcome with run identity, sequence number
//! and emission time, applies sink maintenance (`log toggle`, `clear log`)
//! and persists the record.
//!
//! Sink failures never stop the run: they are counted and reported as
//! `tracing` warnings.

use std::time::{SystemTime, UNIX_EPOCH};

use linecheck_common::station::command::Command;
use linecheck_common::station::error::Severity;
use linecheck_common::station::record::{Outcome, OutputRecord};
use tracing::{info, warn};

use crate::sink::RecordSink;
use crate::state::machine::StationController;

/// Microseconds since the UNIX epoch.
pub fn now_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}

/// Run identifier derived from the start time.
pub fn new_run_id() -> String {
    format!("run-{}", now_us())
}

// ─── Run Statistics ─────────────────────────────────────────────────

/// Per-run counters, updated once per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Commands processed (including unknown tokens).
    pub commands: u64,
    /// Records with WARN severity.
    pub warnings: u64,
    /// Records with ERROR severity.
    pub errors: u64,
    /// Records the sink failed to persist.
    pub sink_failures: u64,
}

impl RunStats {
    #[inline]
    fn record(&mut self, severity: Severity) {
        self.commands += 1;
        match severity {
            Severity::Info => {}
            Severity::Warn => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
    }
}

/// Result of one runner step.
#[derive(Debug, Clone)]
pub struct Step {
    pub record: OutputRecord,
    /// The command source should stop.
    pub exit: bool,
}

// ─── Runner ─────────────────────────────────────────────────────────

/// Drives a controller from a command source into a record sink.
#[derive(Debug)]
pub struct StationRunner<S: RecordSink> {
    controller: StationController,
    sink: S,
    run_id: String,
    next_sequence: u64,
    stats: RunStats,
}

impl<S: RecordSink> StationRunner<S> {
    pub fn new(controller: StationController, sink: S, run_id: impl Into<String>) -> Self {
        Self {
            controller,
            sink,
            run_id: run_id.into(),
            next_sequence: 1,
            stats: RunStats::default(),
        }
    }

    #[inline]
    pub fn controller(&self) -> &StationController {
        &self.controller
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    #[inline]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Process one command token.
    pub fn step(&mut self, token: &str) -> Step {
        let mut outcome = self.controller.handle_token(token);
        let exit = outcome.exit;

        // Known commands are recorded under their canonical token.
        let record = if outcome.command == Command::LogToggle.token() {
            self.toggle_log(outcome)
        } else if outcome.command == Command::ClearLog.token() {
            self.clear_log(&mut outcome);
            self.persist(outcome)
        } else {
            self.persist(outcome)
        };
        Step { record, exit }
    }

    /// The disabling record is still written; the enabling one is the first
    /// record after the gap.
    fn toggle_log(&mut self, mut outcome: Outcome) -> OutputRecord {
        if self.sink.is_enabled() {
            outcome.message = "Logging disabled".to_string();
            let record = self.persist(outcome);
            self.sink.set_enabled(false);
            record
        } else {
            self.sink.set_enabled(true);
            outcome.message = "Logging enabled".to_string();
            self.persist(outcome)
        }
    }

    fn clear_log(&mut self, outcome: &mut Outcome) {
        match self.sink.clear() {
            Ok(()) => outcome.message = "Log cleared".to_string(),
            Err(e) => {
                warn!(run_id = %self.run_id, "record log clear failed: {e}");
                self.stats.sink_failures += 1;
                outcome.message = format!("Log clear failed: {e}");
            }
        }
    }

    /// Stamp and write. The stamped record is returned even if the sink
    /// rejected it.
    fn persist(&mut self, outcome: Outcome) -> OutputRecord {
        self.stats.record(outcome.severity);
        let record =
            OutputRecord::from_outcome(outcome, &self.run_id, self.next_sequence, now_us());
        self.next_sequence += 1;

        if let Err(e) = self.sink.write(&record) {
            self.stats.sink_failures += 1;
            warn!(
                run_id = %self.run_id,
                sequence_id = record.sequence_id,
                "record not persisted: {e}"
            );
        }
        record
    }

    /// Log a run summary.
    pub fn finish(&self) {
        info!(
            run_id = %self.run_id,
            commands = self.stats.commands,
            warnings = self.stats.warnings,
            errors = self.stats.errors,
            sink_failures = self.stats.sink_failures,
            completed = self.controller.state().completed_count,
            "run finished"
        );
    }
}
