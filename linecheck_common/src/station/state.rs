//! Station phase enum and the `StationState` aggregate.
//!
//! `StationState` is a fixed-shape snapshot exclusively owned by the
//! controller. Every field is named and typed; there is no keyed fallback.
//! The only field that survives a full reset is `completed_count`.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::error::{ErrorCode, StateError};

/// Station FSM phase.
///
/// `Done` is transient: the dispatcher folds it into `WaitEmpty` before the
/// next command is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Phase {
    /// Idle, no part on the conveyor.
    #[default]
    WaitEmpty = 0,
    /// Part detected at entry, waiting to be moved.
    WaitEntry = 1,
    /// Primary drive moving the part towards S2.
    MoveToS2 = 2,
    /// Part at the end sensor, interlocks evaluated on next tick.
    AtEnd = 3,
    /// Secondary drive and stopper engaged, transfer about to start.
    PrepTransfer = 4,
    /// Part handed over, waiting for `n1`.
    Transfer = 5,
    /// Part running against the stopper.
    Aligning = 6,
    /// Aligned, waiting for the operator clamp command.
    WaitClamp = 7,
    /// Clamp closing.
    Clamping = 8,
    /// Secondary drive discharging the clamped part.
    Discharge = 9,
    /// Cycle complete (transient).
    Done = 10,
    /// Latched fault. Only `reset` leaves this phase.
    Error = 11,
}

impl Phase {
    /// Upper-case phase name as used in records and status lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WaitEmpty => "WAIT_EMPTY",
            Self::WaitEntry => "WAIT_ENTRY",
            Self::MoveToS2 => "MOVE_TO_S2",
            Self::AtEnd => "AT_END",
            Self::PrepTransfer => "PREP_TRANSFER",
            Self::Transfer => "TRANSFER",
            Self::Aligning => "ALIGNING",
            Self::WaitClamp => "WAIT_CLAMP",
            Self::Clamping => "CLAMPING",
            Self::Discharge => "DISCHARGE",
            Self::Done => "DONE",
            Self::Error => "ERROR",
        }
    }

    /// Phases in which no drive may run.
    #[inline]
    pub const fn is_motor_hold(&self) -> bool {
        matches!(self, Self::Error | Self::WaitClamp)
    }

    /// Phases after the part has left S2: the downstream station is claimed
    /// and the next section is occupied by this part.
    #[inline]
    pub const fn is_downstream(&self) -> bool {
        matches!(
            self,
            Self::Transfer | Self::Aligning | Self::WaitClamp | Self::Clamping | Self::Discharge
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Actuator outputs driven by the station, one bit per output.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ActuatorFlags: u8 {
        /// Current-section drive.
        const MOTOR_PRIMARY   = 0x01;
        /// Next-section drive.
        const MOTOR_SECONDARY = 0x02;
        /// Mechanical stopper extended.
        const STOPPER         = 0x04;
        /// Clamp in motion.
        const CLAMP           = 0x08;
    }
}

impl Default for ActuatorFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl ActuatorFlags {
    /// Both drives.
    pub const MOTORS: Self = Self::from_bits_truncate(
        Self::MOTOR_PRIMARY.bits() | Self::MOTOR_SECONDARY.bits(),
    );
}

/// Complete station snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationState {
    pub phase: Phase,
    /// Phase-local progress counter. Reset to 0 on every phase entry.
    pub tick_counter: u32,

    // ── Presence ──
    pub entry_present: bool,
    pub at_end_present: bool,

    // ── Downstream availability ──
    pub station_clear: bool,
    pub next_section_free: bool,

    // ── Actuator outputs ──
    pub motor_primary_on: bool,
    pub motor_secondary_on: bool,
    pub stopper_extended: bool,
    pub aligned: bool,
    pub clamp_active: bool,
    pub clamped: bool,

    /// `n1` edge flag, consumed once acted upon.
    pub next_sensor_triggered: bool,

    /// Parts discharged since start (or since `clear count`).
    pub completed_count: u64,

    pub error_code: Option<ErrorCode>,
    pub error_message: Option<String>,
}

impl Default for StationState {
    fn default() -> Self {
        Self::new()
    }
}

impl StationState {
    /// Canonical idle configuration.
    pub const fn new() -> Self {
        Self {
            phase: Phase::WaitEmpty,
            tick_counter: 0,
            entry_present: false,
            at_end_present: false,
            station_clear: true,
            next_section_free: true,
            motor_primary_on: false,
            motor_secondary_on: false,
            stopper_extended: false,
            aligned: false,
            clamp_active: false,
            clamped: false,
            next_sensor_triggered: false,
            completed_count: 0,
            error_code: None,
            error_message: None,
        }
    }

    /// Re-apply the idle configuration, keeping `completed_count`.
    pub fn full_reset(&mut self) {
        let completed = self.completed_count;
        *self = Self::new();
        self.completed_count = completed;
    }

    /// Enter `phase` with a fresh tick counter.
    #[inline]
    pub fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.tick_counter = 0;
    }

    /// Switch both drives off.
    #[inline]
    pub fn motors_off(&mut self) {
        self.motor_primary_on = false;
        self.motor_secondary_on = false;
    }

    /// Current actuator outputs as flags.
    pub fn actuators(&self) -> ActuatorFlags {
        let mut flags = ActuatorFlags::empty();
        flags.set(ActuatorFlags::MOTOR_PRIMARY, self.motor_primary_on);
        flags.set(ActuatorFlags::MOTOR_SECONDARY, self.motor_secondary_on);
        flags.set(ActuatorFlags::STOPPER, self.stopper_extended);
        flags.set(ActuatorFlags::CLAMP, self.clamp_active);
        flags
    }

    /// True if neither presence sensor reports a part.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !self.entry_present && !self.at_end_present
    }

    /// Check the snapshot invariants.
    pub fn validate(&self) -> Result<(), StateError> {
        match (self.phase, self.error_code) {
            (Phase::Error, None) => return Err(StateError::MissingErrorCode(self.phase)),
            (phase, Some(code)) if phase != Phase::Error => {
                return Err(StateError::StrayErrorCode { phase, code });
            }
            _ => {}
        }
        if self.phase == Phase::Done {
            return Err(StateError::TransientPhase);
        }
        if self.phase == Phase::MoveToS2 && self.at_end_present {
            return Err(StateError::AtEndInTransit(self.phase));
        }
        if self.phase.is_motor_hold() && self.actuators().intersects(ActuatorFlags::MOTORS) {
            return Err(StateError::MotorsInHoldPhase(self.phase));
        }
        Ok(())
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "ON" } else { "OFF" }
}

impl fmt::Display for StationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {} | counter={} | S1={} S2={} | M1={} M2={} | stopper={} aligned={} clamp={} | \
             station_clear={} next_free={} | completed={}",
            self.phase,
            self.tick_counter,
            u8::from(self.entry_present),
            u8::from(self.at_end_present),
            on_off(self.motor_primary_on),
            on_off(self.motor_secondary_on),
            if self.stopper_extended { "OUT" } else { "IN" },
            self.aligned,
            if self.clamped {
                "HOLD"
            } else if self.clamp_active {
                "MOVING"
            } else {
                "OPEN"
            },
            self.station_clear,
            self.next_section_free,
            self.completed_count,
        )?;
        if let Some(code) = self.error_code {
            write!(f, " | error={code}")?;
        }
        Ok(())
    }
}
