//! # LineCheck Station Controller Library
//!
//! Control logic for a single-station conveyor transfer cell: a radiator
//! enters at S1, moves to S2, is handed to the next section, aligned against
//! a stopper, clamped and discharged. Timeouts and interlocks guard every
//! phase.
//!
//! ## Layers
//!
//! 1. **`state::machine`**: the `StationController` transition table
//! 2. **`safety`**: interlock gates, tick ceilings, safe recovery
//! 3. **`cycle`**: `StationRunner`: one command in, one stamped record out
//! 4. **`sink`**: append-only record persistence
//!
//! ## Determinism
//!
//! Time exists only as explicit `tick` commands. There is no background
//! timer and no shared state: one controller owns one `StationState`.

pub mod config;
pub mod cycle;
pub mod safety;
pub mod sink;
pub mod state;
