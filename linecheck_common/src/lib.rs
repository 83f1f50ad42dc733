//! LineCheck Common Library
//!
//! Shared station types, constants and configuration loading utilities for
//! all LineCheck workspace crates.
//!
//! # Module Structure
//!
//! - [`station`] - Phase, snapshot, error codes, commands, records, config
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Tick ceilings and default paths
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use linecheck_common::prelude::*;
//!
//! let state = StationState::new();
//! assert_eq!(state.phase, Phase::WaitEmpty);
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod station;
