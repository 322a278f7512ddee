//! Replay records: the static simulation file consumed one timestep per tick.

use serde::{Deserialize, Serialize};

use crate::enums::Allegiance;

/// A whole replay file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Restart from the first timestep once the last one has been shown.
    #[serde(default)]
    pub looping: bool,
    pub timesteps: Vec<Timestep>,
}

/// Every entity visible at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timestep {
    /// Seconds from the start of the recording.
    #[serde(default)]
    pub time: f64,
    pub entities: Vec<ReplayEntity>,
}

/// One recorded entity position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntity {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias = "allegiance")]
    pub side: Allegiance,
    #[serde(default)]
    pub attribution: Option<f64>,
}
