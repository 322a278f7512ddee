//! Simulation snapshot: the complete visible state handed to the renderers each tick.

use serde::{Deserialize, Serialize};

use crate::components::{Kinematics, ThreatAttributes, TrackIdentity};
use crate::enums::*;
use crate::types::{GeoPoint, SimTime, Viewport};

/// Immutable per-tick view of every track. Renderers only ever read this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub scenario: Option<ScenarioId>,
    pub motion_model: Option<MotionModelKind>,
    pub viewport: Viewport,
    /// Sorted by track id.
    pub tracks: Vec<TrackPoint>,
}

/// One track on the display.
///
/// The variant is fixed where the point is built: generated tracks are
/// `Jet`, replayed points are `Plain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TrackPoint {
    Plain(PlainPoint),
    Jet(FighterJet),
}

/// Minimal replayed track: where it is and which side it is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainPoint {
    pub id: String,
    pub position: GeoPoint,
    pub allegiance: Allegiance,
    pub attribution: Option<f64>,
}

/// Fully attributed generated aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterJet {
    pub identity: TrackIdentity,
    pub threat: ThreatAttributes,
    pub kinematics: Kinematics,
}

impl TrackPoint {
    pub fn id(&self) -> &str {
        match self {
            TrackPoint::Plain(p) => &p.id,
            TrackPoint::Jet(j) => &j.identity.id,
        }
    }

    pub fn position(&self) -> GeoPoint {
        match self {
            TrackPoint::Plain(p) => p.position,
            TrackPoint::Jet(j) => j.kinematics.position,
        }
    }

    pub fn allegiance(&self) -> Allegiance {
        match self {
            TrackPoint::Plain(p) => p.allegiance,
            TrackPoint::Jet(j) => j.identity.allegiance,
        }
    }

    /// Attribution score, only ever present on enemy tracks.
    pub fn attribution(&self) -> Option<f64> {
        match self {
            TrackPoint::Plain(p) => p.attribution,
            TrackPoint::Jet(j) => j.threat.attribution,
        }
    }

    /// Strategic value; plain replay points carry none.
    pub fn strategic_value(&self) -> Option<f64> {
        match self {
            TrackPoint::Plain(_) => None,
            TrackPoint::Jet(j) => Some(j.threat.strategic_value),
        }
    }
}

impl PlainPoint {
    /// Build a plain point, dropping attribution for friendlies and
    /// clamping it into [0, 1] otherwise.
    pub fn new(
        id: impl Into<String>,
        position: GeoPoint,
        allegiance: Allegiance,
        attribution: Option<f64>,
    ) -> Self {
        let attribution = match allegiance {
            Allegiance::Friendly => None,
            Allegiance::Enemy => attribution.map(|a| a.clamp(0.0, 1.0)),
        };
        Self {
            id: id.into(),
            position: position.normalized(),
            allegiance,
            attribution,
        }
    }
}

impl SimSnapshot {
    /// Number of tracks on a given side.
    pub fn count(&self, allegiance: Allegiance) -> usize {
        self.tracks
            .iter()
            .filter(|t| t.allegiance() == allegiance)
            .count()
    }

    pub fn track(&self, id: &str) -> Option<&TrackPoint> {
        self.tracks.iter().find(|t| t.id() == id)
    }
}
