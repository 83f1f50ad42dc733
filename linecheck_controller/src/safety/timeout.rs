//! Tick-counted ceilings.
//!
//! A phase ceiling `n` is reached on the tick where `counter + 1 >= n`.
//! The same rule drives both fault timeouts (MOVE_TO_S2, TRANSFER) and
//! dwell completion (ALIGNING, DISCHARGE). CLAMPING has a two-sided window:
//! the clamp holds once the finish count is reached, unless the fatal
//! ceiling is reached first.

use linecheck_common::station::config::TimeoutPolicy;

/// Outcome of advancing a phase-local counter by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickVerdict {
    /// Still below the ceiling, with the new counter value.
    Counting(u32),
    /// Ceiling reached on this tick.
    Reached,
}

/// Advance `counter` against `ceiling`.
#[inline]
pub const fn advance(counter: u32, ceiling: u32) -> TickVerdict {
    let next = counter.saturating_add(1);
    if next >= ceiling {
        TickVerdict::Reached
    } else {
        TickVerdict::Counting(next)
    }
}

/// Outcome of one CLAMPING tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampVerdict {
    /// Clamp still closing, with the new counter value.
    Closing(u32),
    /// Clamp reports holding.
    Holding,
    /// Fatal ceiling reached.
    TimedOut,
}

/// Advance the clamp counter. The fatal ceiling is checked first.
pub const fn advance_clamp(counter: u32, policy: &TimeoutPolicy) -> ClampVerdict {
    let next = counter.saturating_add(1);
    if next >= policy.clamp_timeout_ticks {
        ClampVerdict::TimedOut
    } else if next >= policy.clamp_finish_ticks {
        ClampVerdict::Holding
    } else {
        ClampVerdict::Closing(next)
    }
}
