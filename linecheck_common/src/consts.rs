//! Station-wide constants for the LineCheck workspace.
//!
//! Single source of truth for tick ceilings, bounds and default paths.
//! Imported by all crates.

use static_assertions::const_assert;

/// Ticks allowed between `s1` and `s2` before `S2_TIMEOUT`.
pub const MOVE_TO_S2_TICKS_DEFAULT: u32 = 4;

/// Ticks allowed in TRANSFER waiting for `n1` before `N1_TIMEOUT`.
pub const TRANSFER_TICKS_DEFAULT: u32 = 4;

/// Ticks spent against the stopper before the part counts as aligned.
pub const ALIGNING_TICKS_DEFAULT: u32 = 1;

/// Ticks after `clamp` until the clamp reports holding.
pub const CLAMP_FINISH_TICKS_DEFAULT: u32 = 2;

/// Fatal clamp ceiling. Reaching it latches ERROR.
pub const CLAMP_TIMEOUT_TICKS_DEFAULT: u32 = 10;

/// Ticks of secondary drive needed to discharge the part.
pub const DISCHARGE_TICKS_DEFAULT: u32 = 2;

/// Upper bound for any configured tick ceiling.
pub const TICKS_MAX: u32 = 10_000;

/// Default directory for JSONL record logs.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/linecheck.toml";

/// Record log file prefix (`<prefix>_<run_id>.jsonl`).
pub const LOG_FILE_PREFIX: &str = "linecheck";

// The clamp must always be able to finish before the fatal ceiling.
const_assert!(CLAMP_FINISH_TICKS_DEFAULT >= 2);
const_assert!(CLAMP_FINISH_TICKS_DEFAULT < CLAMP_TIMEOUT_TICKS_DEFAULT);
const_assert!(MOVE_TO_S2_TICKS_DEFAULT > 0 && TRANSFER_TICKS_DEFAULT > 0);
const_assert!(ALIGNING_TICKS_DEFAULT > 0 && DISCHARGE_TICKS_DEFAULT > 0);
