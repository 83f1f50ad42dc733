//! Operator and sensor command tokens.
//!
//! One lowercase token per control step. Tokens map 1:1 to `Command`
//! variants; anything else is reported as an unknown command by the
//! controller without touching station state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single discrete station input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Entry sensor edge.
    S1,
    /// End-of-line sensor edge.
    S2,
    /// Next-section confirmation sensor edge.
    N1,
    /// Advance the station clock by one tick.
    Tick,
    /// Operator clamp command.
    Clamp,
    /// Operator manual reset.
    Reset,
    /// Downstream station reports busy (`station_clear = false`).
    StationBusy,
    /// Downstream station reports ready (`station_clear = true`).
    StationReady,
    /// Next transport section occupied.
    NextBlocked,
    /// Next transport section free.
    NextFree,
    /// Enable/disable the record sink.
    LogToggle,
    /// Truncate the record sink.
    ClearLog,
    /// Zero `completed_count`.
    ClearCount,
    /// Stop the command source.
    Exit,
}

impl Command {
    /// Parse a command token. Whitespace and case are normalised.
    pub fn from_token(token: &str) -> Option<Self> {
        let normalized = token
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Some(match normalized.as_str() {
            "s1" => Self::S1,
            "s2" => Self::S2,
            "n1" => Self::N1,
            "tick" => Self::Tick,
            "clamp" => Self::Clamp,
            "reset" => Self::Reset,
            "station busy" => Self::StationBusy,
            "station ready" => Self::StationReady,
            "next blocked" => Self::NextBlocked,
            "next free" => Self::NextFree,
            "log toggle" => Self::LogToggle,
            "clear log" => Self::ClearLog,
            "clear count" => Self::ClearCount,
            "exit" => Self::Exit,
            _ => return None,
        })
    }

    /// Canonical token.
    pub const fn token(&self) -> &'static str {
        match self {
            Self::S1 => "s1",
            Self::S2 => "s2",
            Self::N1 => "n1",
            Self::Tick => "tick",
            Self::Clamp => "clamp",
            Self::Reset => "reset",
            Self::StationBusy => "station busy",
            Self::StationReady => "station ready",
            Self::NextBlocked => "next blocked",
            Self::NextFree => "next free",
            Self::LogToggle => "log toggle",
            Self::ClearLog => "clear log",
            Self::ClearCount => "clear count",
            Self::Exit => "exit",
        }
    }

    /// Bookkeeping commands with no FSM effect.
    #[inline]
    pub const fn is_maintenance(&self) -> bool {
        matches!(self, Self::LogToggle | Self::ClearLog | Self::ClearCount)
    }

    /// Commands still accepted while latched in ERROR.
    #[inline]
    pub const fn allowed_in_error(&self) -> bool {
        matches!(self, Self::Reset | Self::Exit) || self.is_maintenance()
    }

    /// Every token the command source understands, for help output.
    pub const ALL: [Command; 14] = [
        Self::S1,
        Self::S2,
        Self::N1,
        Self::Tick,
        Self::Clamp,
        Self::Reset,
        Self::StationBusy,
        Self::StationReady,
        Self::NextBlocked,
        Self::NextFree,
        Self::LogToggle,
        Self::ClearLog,
        Self::ClearCount,
        Self::Exit,
    ];
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
