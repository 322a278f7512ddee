//! OVERWATCH application shell.
//!
//! Wires the simulation, overlay and feed crates together: runtime config,
//! the tick loop thread, and the control entry points used by the CLI.

pub mod config;
pub mod control;
pub mod game_loop;
pub mod state;
pub mod telemetry;

pub use overwatch_core as core;
