//! Safe recovery after timeouts and manual resets.
//!
//! Recovery never forgets a physically present part:
//! 1. All actuator outputs off, clamp released, `n1` edge dropped.
//!    Leaving a downstream phase also gives back the downstream station
//!    and the next section.
//! 2. Part at entry → WAIT_ENTRY.
//! 3. Else part at end sensor → AT_END.
//! 4. Else full reset → WAIT_EMPTY (`completed_count` kept).
//!
//! Applying recovery to an already recovered state is a no-op.

use linecheck_common::station::state::{Phase, StationState};

/// Phase a recovery would land in, given the presence flags.
pub const fn recovery_target(state: &StationState) -> Phase {
    if state.is_empty() {
        Phase::WaitEmpty
    } else if state.entry_present {
        Phase::WaitEntry
    } else {
        Phase::AtEnd
    }
}

/// Release every actuator output.
pub fn release_actuators(state: &mut StationState) {
    state.motors_off();
    state.stopper_extended = false;
    state.clamp_active = false;
    state.clamped = false;
    state.aligned = false;
    state.next_sensor_triggered = false;
}

/// Hand the downstream station and the next section back.
pub fn restore_downstream(state: &mut StationState) {
    state.station_clear = true;
    state.next_section_free = true;
}

/// Presence-aware recovery. Returns the phase entered.
pub fn safe_recover(state: &mut StationState) -> Phase {
    let target = recovery_target(state);
    match target {
        Phase::WaitEmpty => state.full_reset(),
        phase => {
            if state.phase.is_downstream() {
                restore_downstream(state);
            }
            release_actuators(state);
            state.enter(phase);
        }
    }
    target
}

/// Clear a latched fault. Everything but `completed_count` returns to idle.
pub fn clear_fault(state: &mut StationState) -> Phase {
    state.full_reset();
    state.phase
}
