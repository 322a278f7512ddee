//! Core types and definitions for the OVERWATCH track simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! track components, control commands, snapshots, replay records and
//! constants. It has no dependency on any runtime or rendering framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod replay;
pub mod state;
pub mod types;
