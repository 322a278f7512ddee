//! Track simulation for OVERWATCH.
//!
//! Owns the hecs ECS world, generates scenario tracks, advances their
//! motion models at a fixed tick rate and produces SimSnapshots for the
//! renderers.

pub mod engine;
pub mod generator;
pub mod motion;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use overwatch_core as core;

#[cfg(test)]
mod tests;
