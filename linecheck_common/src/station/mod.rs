//! Station shared types.
//!
//! Everything exchanged between the controller, its runner, sinks and the
//! CLI lives here: phase and snapshot types, error codes and event
//! classification, command tokens, output records and configuration.

pub mod command;
pub mod config;
pub mod error;
pub mod record;
pub mod state;
