//! Control commands sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::replay::ReplayScript;

/// All possible operator actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlCommand {
    /// Load a scenario from the catalog, discarding every current track.
    SelectScenario { scenario: ScenarioId },
    /// Replace tracks with a recorded script, one timestep per tick.
    StartReplay { script: ReplayScript },
    /// Override the catalog motion model. Takes effect on the next
    /// scenario selection; `None` restores the catalog default.
    SetMotionModel { model: Option<MotionModelKind> },
    /// Pause the tick loop without discarding state.
    Pause,
    /// Resume after a pause.
    Resume,
    /// Cancel the simulation and discard all tracks.
    Stop,
}
