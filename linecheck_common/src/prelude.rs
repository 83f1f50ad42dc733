//! Prelude module for common re-exports.
//!
//! ```rust
//! use linecheck_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::station::config::{LineCheckConfig, RecordLogConfig, TimeoutPolicy};

// ─── Station ────────────────────────────────────────────────────────
pub use crate::station::command::Command;
pub use crate::station::error::{ErrorCode, EventKind, Severity, StateError};
pub use crate::station::record::{Outcome, OutputRecord};
pub use crate::station::state::{ActuatorFlags, Phase, StationState};
