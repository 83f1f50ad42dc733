//! Transfer interlock evaluation.
//!
//! Pure predicates over a `StationState` snapshot. The AT_END tick asks
//! `evaluate_transfer` whether the part may be handed to the next section;
//! the first failing gate wins, in this order:
//!
//! 1. Part present at the end sensor (else `STATE_MISMATCH`).
//! 2. Downstream station clear (else `STATION_BUSY`).
//! 3. Next transport section free (else `NEXT_BLOCKED`).

use linecheck_common::station::state::StationState;

/// Result of the AT_END interlock evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPermit {
    /// All gates pass: transfer outputs may be driven.
    Granted,
    /// AT_END without a part at the end sensor.
    PartMissing,
    /// Downstream station not ready to receive.
    StationBusy,
    /// Next transport section occupied.
    NextBlocked,
}

#[inline]
pub const fn part_at_end(state: &StationState) -> bool {
    state.at_end_present
}

#[inline]
pub const fn station_clear(state: &StationState) -> bool {
    state.station_clear
}

#[inline]
pub const fn next_section_free(state: &StationState) -> bool {
    state.next_section_free
}

/// Evaluate the transfer gates in priority order.
pub const fn evaluate_transfer(state: &StationState) -> TransferPermit {
    if !part_at_end(state) {
        TransferPermit::PartMissing
    } else if !station_clear(state) {
        TransferPermit::StationBusy
    } else if !next_section_free(state) {
        TransferPermit::NextBlocked
    } else {
        TransferPermit::Granted
    }
}

/// Drop the transfer outputs after a denied permit.
pub fn deny_transfer_outputs(state: &mut StationState) {
    state.motor_secondary_on = false;
    state.stopper_extended = false;
}
