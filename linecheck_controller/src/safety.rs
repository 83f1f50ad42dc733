//! Safety module root.
//!
//! Transfer interlocks, per-phase tick ceilings and the presence-aware
//! recovery shared by timeouts and manual resets.

pub mod interlock;
pub mod recovery;
pub mod timeout;
