//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side a track belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allegiance {
    Friendly,
    #[default]
    Enemy,
}

/// Motion model applied to every generated track of a scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionModelKind {
    /// Closed elliptical patrol orbit, periodic forever.
    #[default]
    EllipticalOrbit,
    /// Slightly curved forward transit that freezes after a tick cap.
    CappedTransit,
}

/// Named scenarios available in the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Paired friendly/enemy formations on fixed bearings around Taipei.
    TaiwanStrait,
    /// Dense randomized battlefield over the South China Sea.
    SouthChinaSea,
    /// Mid-size randomized patrol over the East China Sea.
    EastChinaSea,
    /// Randomized transit scenario across the Korean peninsula.
    KoreanPeninsula,
}

/// Visual severity bucket for a classified track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityBucket {
    /// Friendly tracks are never graded.
    Friendly,
    Low,
    Elevated,
    High,
    Critical,
}

/// Simulation run state (top-level).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// No scenario loaded.
    #[default]
    Idle,
    Running,
    Paused,
    /// Tick loop cancelled; all tracks discarded.
    Stopped,
}

impl Allegiance {
    /// Short tag shown in tooltips.
    pub fn tag(&self) -> &'static str {
        match self {
            Allegiance::Friendly => "FRIENDLY",
            Allegiance::Enemy => "HOSTILE",
        }
    }
}

impl ScenarioId {
    /// All scenarios in selector order.
    pub const ALL: [ScenarioId; 4] = [
        ScenarioId::TaiwanStrait,
        ScenarioId::SouthChinaSea,
        ScenarioId::EastChinaSea,
        ScenarioId::KoreanPeninsula,
    ];
}
