//! Station controller: the single transition table.
//!
//! `StationController` owns the only `StationState`. Every command is
//! accepted, fully processed and answered with exactly one `Outcome`
//! (message, event kind, severity, optional error code, snapshot) before
//! the next command is read.
//!
//! While the phase is ERROR only `reset`, maintenance commands and `exit`
//! are accepted; anything else is answered with `ERROR_LOCKED` and leaves
//! the state untouched. DONE is folded into WAIT_EMPTY right after the
//! completing tick has been reported.

use linecheck_common::station::command::Command;
use linecheck_common::station::config::TimeoutPolicy;
use linecheck_common::station::error::{ErrorCode, EventKind, Severity, StateError};
use linecheck_common::station::record::Outcome;
use linecheck_common::station::state::{Phase, StationState};
use tracing::{debug, error, warn};

use crate::safety::interlock::{TransferPermit, deny_transfer_outputs, evaluate_transfer};
use crate::safety::recovery::{clear_fault, release_actuators, restore_downstream, safe_recover};
use crate::safety::timeout::{ClampVerdict, TickVerdict, advance, advance_clamp};

/// Controller answer for one command, before it is paired with a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Verdict {
    message: String,
    kind: EventKind,
    severity: Severity,
    code: Option<ErrorCode>,
}

impl Verdict {
    fn info(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            severity: Severity::Info,
            code: None,
        }
    }

    fn warn(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            severity: Severity::Warn,
            code: None,
        }
    }

    fn fault(kind: EventKind, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            severity: code.severity(),
            code: Some(code),
        }
    }
}

/// Single-station controller.
#[derive(Debug, Clone)]
pub struct StationController {
    state: StationState,
    policy: TimeoutPolicy,
}

impl Default for StationController {
    fn default() -> Self {
        Self::new(TimeoutPolicy::default())
    }
}

impl StationController {
    /// Create a controller in the canonical idle configuration.
    pub const fn new(policy: TimeoutPolicy) -> Self {
        Self {
            state: StationState::new(),
            policy,
        }
    }

    /// Resume from an externally supplied snapshot.
    ///
    /// The snapshot must satisfy `StationState::validate`.
    pub fn from_state(policy: TimeoutPolicy, state: StationState) -> Result<Self, StateError> {
        state.validate()?;
        Ok(Self { state, policy })
    }

    /// Current snapshot.
    #[inline]
    pub const fn state(&self) -> &StationState {
        &self.state
    }

    /// Current phase.
    #[inline]
    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Parse and handle a raw token. Unknown tokens change nothing.
    pub fn handle_token(&mut self, token: &str) -> Outcome {
        match Command::from_token(token) {
            Some(command) => self.handle(command),
            None => {
                warn!(command = token, "unknown command");
                Outcome {
                    command: token.trim().to_string(),
                    message: "Unknown command".to_string(),
                    event_kind: EventKind::Controller,
                    severity: Severity::Warn,
                    error_code: None,
                    snapshot: self.state.clone(),
                    exit: false,
                }
            }
        }
    }

    /// Handle one command.
    pub fn handle(&mut self, command: Command) -> Outcome {
        let verdict = if self.state.phase == Phase::Error && !command.allowed_in_error() {
            Verdict::fault(
                EventKind::Controller,
                ErrorCode::ErrorLocked,
                "ERROR state: only 'reset' or 'exit' allowed",
            )
        } else {
            self.dispatch(command)
        };
        if let Some(code) = verdict.code.filter(ErrorCode::is_fatal) {
            self.latch(code, &verdict.message);
        }

        trace_verdict(command, self.state.phase, &verdict);

        let outcome = Outcome {
            command: command.token().to_string(),
            message: verdict.message,
            event_kind: verdict.kind,
            severity: verdict.severity,
            error_code: verdict.code,
            snapshot: self.state.clone(),
            exit: command == Command::Exit,
        };

        if self.state.phase == Phase::Done {
            self.state.full_reset();
        }
        outcome
    }

    /// Enter ERROR with every drive stopped and the clamp released.
    fn latch(&mut self, code: ErrorCode, message: &str) {
        self.state.motors_off();
        self.state.clamp_active = false;
        self.state.enter(Phase::Error);
        self.state.error_code = Some(code);
        self.state.error_message = Some(message.to_string());
    }

    fn dispatch(&mut self, command: Command) -> Verdict {
        match command {
            Command::S1 => self.on_entry_sensor(),
            Command::S2 => self.on_end_sensor(),
            Command::N1 => self.on_next_sensor(),
            Command::Tick => self.handle_tick(),
            Command::Clamp => self.on_clamp(),
            Command::Reset => self.on_reset(),
            Command::StationBusy | Command::StationReady => {
                self.state.station_clear = command == Command::StationReady;
                Verdict::info(
                    EventKind::Interlock,
                    if self.state.station_clear {
                        "Downstream station ready"
                    } else {
                        "Downstream station busy"
                    },
                )
            }
            Command::NextBlocked | Command::NextFree => {
                self.state.next_section_free = command == Command::NextFree;
                Verdict::info(
                    EventKind::Interlock,
                    if self.state.next_section_free {
                        "Next section is free"
                    } else {
                        "Next section is blocked"
                    },
                )
            }
            Command::LogToggle => Verdict::info(EventKind::Maintenance, "Log toggle requested"),
            Command::ClearLog => Verdict::info(EventKind::Maintenance, "Log clear requested"),
            Command::ClearCount => {
                self.state.completed_count = 0;
                Verdict::info(EventKind::Maintenance, "Completed counter cleared")
            }
            Command::Exit => Verdict::info(EventKind::Controller, "Simulation stopped by user"),
        }
    }

    // ─── Sensors ────────────────────────────────────────────────────

    fn on_entry_sensor(&mut self) -> Verdict {
        match self.state.phase {
            Phase::WaitEmpty | Phase::WaitEntry => {
                self.state.entry_present = true;
                self.state.motor_primary_on = true;
                self.state.enter(Phase::MoveToS2);
                Verdict::info(EventKind::Sensor, "S1 triggered (radiator detected at entry)")
            }
            phase => Verdict::warn(EventKind::Sensor, format!("S1 ignored in {phase}")),
        }
    }

    /// `s2` is accepted in every unlatched phase. A part seen at S2 after the handoff
    /// started abandons the handoff: every output drops and the downstream
    /// claims are given back.
    fn on_end_sensor(&mut self) -> Verdict {
        let from = self.state.phase;
        if from.is_downstream() {
            restore_downstream(&mut self.state);
        }
        release_actuators(&mut self.state);
        self.state.entry_present = false;
        self.state.at_end_present = true;
        self.state.enter(Phase::AtEnd);

        let message = match from {
            Phase::WaitEmpty => "Manual load at S2 (radiator placed manually)".to_string(),
            phase if phase.is_downstream() => {
                format!("S2 triggered during {phase}: handoff abandoned, radiator at end position")
            }
            _ => "S2 triggered (radiator at end position)".to_string(),
        };
        Verdict::info(EventKind::Sensor, message)
    }

    fn on_next_sensor(&mut self) -> Verdict {
        if self.state.phase != Phase::Transfer {
            return Verdict::fault(
                EventKind::Sensor,
                ErrorCode::N1Unexpected,
                format!("N1 unexpected in {}", self.state.phase),
            );
        }
        self.state.next_sensor_triggered = true;
        self.complete_transfer();
        Verdict::info(
            EventKind::Sensor,
            "N1 triggered: radiator reached next section, aligning",
        )
    }

    // ─── Operator ───────────────────────────────────────────────────

    fn on_clamp(&mut self) -> Verdict {
        if self.state.phase != Phase::WaitClamp {
            return Verdict::fault(
                EventKind::Actuator,
                ErrorCode::InvalidState,
                format!("Clamp rejected: not waiting for clamp ({})", self.state.phase),
            );
        }
        self.state.clamp_active = true;
        self.state.motors_off();
        self.state.enter(Phase::Clamping);
        Verdict::info(EventKind::Actuator, "Clamp closing")
    }

    fn on_reset(&mut self) -> Verdict {
        if self.state.phase == Phase::Error {
            let phase = clear_fault(&mut self.state);
            return Verdict::info(
                EventKind::Controller,
                format!("Manual reset: fault cleared, system returned to {phase}"),
            );
        }
        let phase = safe_recover(&mut self.state);
        Verdict::info(
            EventKind::Controller,
            format!("Manual reset: system returned to {phase}"),
        )
    }

    // ─── Clock ──────────────────────────────────────────────────────

    /// Advance the station clock by one tick.
    fn handle_tick(&mut self) -> Verdict {
        match self.state.phase {
            Phase::MoveToS2 => self.tick_move_to_s2(),
            Phase::AtEnd => self.tick_at_end(),
            Phase::PrepTransfer => {
                self.state.station_clear = false;
                self.state.motor_primary_on = true;
                self.state.at_end_present = false;
                self.state.enter(Phase::Transfer);
                Verdict::info(EventKind::Controller, "Transfer started, waiting for N1")
            }
            Phase::Transfer => self.tick_transfer(),
            Phase::Aligning => self.tick_aligning(),
            Phase::Clamping => self.tick_clamping(),
            Phase::Discharge => self.tick_discharge(),
            Phase::WaitClamp => {
                Verdict::info(EventKind::Controller, "Tick ignored (waiting for clamp)")
            }
            Phase::WaitEmpty | Phase::WaitEntry | Phase::Done | Phase::Error => {
                Verdict::info(EventKind::Controller, "Tick ignored (not moving)")
            }
        }
    }

    fn tick_move_to_s2(&mut self) -> Verdict {
        match advance(self.state.tick_counter, self.policy.move_to_s2_ticks) {
            TickVerdict::Counting(counter) => {
                self.state.tick_counter = counter;
                self.state.motor_primary_on = true;
                Verdict::info(
                    EventKind::Controller,
                    format!("Tick: moving... counter={counter}"),
                )
            }
            TickVerdict::Reached => {
                self.state.motor_primary_on = false;
                let phase = safe_recover(&mut self.state);
                Verdict::fault(
                    EventKind::Timeout,
                    ErrorCode::S2Timeout,
                    format!("No S2 confirmation (timeout) -> {phase}"),
                )
            }
        }
    }

    fn tick_at_end(&mut self) -> Verdict {
        let permit = evaluate_transfer(&self.state);
        match permit {
            TransferPermit::Granted => {
                self.state.motor_secondary_on = true;
                self.state.stopper_extended = true;
                self.state.enter(Phase::PrepTransfer);
                Verdict::info(
                    EventKind::Interlock,
                    "Interlocks OK: next-section drive on, stopper extended",
                )
            }
            TransferPermit::PartMissing => {
                self.state.full_reset();
                Verdict::fault(
                    EventKind::AutoRecover,
                    ErrorCode::StateMismatch,
                    "AT_END without radiator at S2 -> WAIT_EMPTY",
                )
            }
            TransferPermit::StationBusy => {
                self.deny_transfer(ErrorCode::StationBusy, "station not clear")
            }
            TransferPermit::NextBlocked => {
                self.deny_transfer(ErrorCode::NextBlocked, "next section blocked")
            }
        }
    }

    fn deny_transfer(&mut self, code: ErrorCode, reason: &str) -> Verdict {
        deny_transfer_outputs(&mut self.state);
        Verdict::fault(
            EventKind::Interlock,
            code,
            format!("Transfer denied: {reason}"),
        )
    }

    fn tick_transfer(&mut self) -> Verdict {
        if self.state.next_sensor_triggered {
            self.complete_transfer();
            return Verdict::info(EventKind::Sensor, "N1 confirmed, aligning");
        }
        match advance(self.state.tick_counter, self.policy.transfer_ticks) {
            TickVerdict::Counting(counter) => {
                self.state.tick_counter = counter;
                Verdict::info(
                    EventKind::Controller,
                    format!("Tick: transferring... counter={counter}"),
                )
            }
            TickVerdict::Reached => {
                let phase = safe_recover(&mut self.state);
                Verdict::fault(
                    EventKind::Timeout,
                    ErrorCode::N1Timeout,
                    format!("No N1 confirmation (timeout) -> {phase}"),
                )
            }
        }
    }

    /// TRANSFER → ALIGNING, consuming the `n1` edge.
    fn complete_transfer(&mut self) {
        self.state.next_sensor_triggered = false;
        self.state.next_section_free = false;
        self.state.motor_primary_on = false;
        self.state.motor_secondary_on = true;
        self.state.enter(Phase::Aligning);
    }

    fn tick_aligning(&mut self) -> Verdict {
        match advance(self.state.tick_counter, self.policy.aligning_ticks) {
            TickVerdict::Counting(counter) => {
                self.state.tick_counter = counter;
                Verdict::info(
                    EventKind::Controller,
                    format!("Tick: aligning... counter={counter}"),
                )
            }
            TickVerdict::Reached => {
                self.state.motors_off();
                self.state.stopper_extended = false;
                self.state.aligned = true;
                self.state.enter(Phase::WaitClamp);
                Verdict::info(
                    EventKind::Actuator,
                    "Radiator aligned, stopper retracted, waiting for clamp",
                )
            }
        }
    }

    fn tick_clamping(&mut self) -> Verdict {
        match advance_clamp(self.state.tick_counter, &self.policy) {
            ClampVerdict::Closing(counter) => {
                self.state.tick_counter = counter;
                Verdict::info(
                    EventKind::Actuator,
                    format!("Tick: clamping... counter={counter}"),
                )
            }
            ClampVerdict::Holding => {
                self.state.clamped = true;
                self.state.clamp_active = false;
                self.state.motor_secondary_on = true;
                self.state.enter(Phase::Discharge);
                Verdict::info(EventKind::Actuator, "Clamped, discharging")
            }
            ClampVerdict::TimedOut => Verdict::fault(
                EventKind::Timeout,
                ErrorCode::ClampTimeout,
                format!(
                    "Clamp did not reach holding within {} ticks",
                    self.policy.clamp_timeout_ticks
                ),
            ),
        }
    }

    fn tick_discharge(&mut self) -> Verdict {
        match advance(self.state.tick_counter, self.policy.discharge_ticks) {
            TickVerdict::Counting(counter) => {
                self.state.tick_counter = counter;
                self.state.motor_secondary_on = true;
                Verdict::info(
                    EventKind::Controller,
                    format!("Tick: discharging... counter={counter}"),
                )
            }
            TickVerdict::Reached => {
                self.state.station_clear = true;
                self.state.next_section_free = true;
                self.state.motor_secondary_on = false;
                self.state.clamped = false;
                self.state.clamp_active = false;
                self.state.aligned = false;
                self.state.completed_count += 1;
                self.state.enter(Phase::Done);
                Verdict::info(
                    EventKind::Qa,
                    format!(
                        "Radiator discharged, cycle complete (completed={})",
                        self.state.completed_count
                    ),
                )
            }
        }
    }
}

fn trace_verdict(command: Command, phase: Phase, verdict: &Verdict) {
    let code = verdict.code.map(|c| c.as_str()).unwrap_or("-");
    match verdict.severity {
        Severity::Info => {
            debug!(command = %command, phase = %phase, kind = %verdict.kind, "{}", verdict.message)
        }
        Severity::Warn => warn!(command = %command, phase = %phase, code, "{}", verdict.message),
        Severity::Error => error!(command = %command, phase = %phase, code, "{}", verdict.message),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
