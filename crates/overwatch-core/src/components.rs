//! ECS components for hecs entities.
//!
//! Components are plain data structs. The only methods are constructors
//! that enforce attribute bounds; track logic lives in systems.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Allegiance;
use crate::types::GeoPoint;

/// Who a track is. Never modified after spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackIdentity {
    /// Stable id, unique within a scenario run.
    pub id: String,
    pub allegiance: Allegiance,
    /// Aircraft type label, e.g. "F-16V".
    pub aircraft_type: String,
    pub call_sign: Option<String>,
}

/// Threat scoring for a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatAttributes {
    /// 1..=10.
    pub threat_level: f64,
    /// 1..=10.
    pub armament_level: f64,
    /// Weighted composite of threat and armament, 1..=10.
    pub strategic_value: f64,
    /// Confidence the hostile classification is correct, 0..=1.
    /// Always `None` for friendly tracks.
    pub attribution: Option<f64>,
    /// Designated high-value asset (formation lead, tanker, AEW).
    pub high_value: bool,
}

/// Current kinematic state, rewritten every tick by the motion system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: GeoPoint,
    /// Degrees, 0 = North, clockwise, in [0, 360).
    pub heading: f64,
    /// Metres.
    pub altitude: f64,
    /// Knots. Zero once a capped transit has frozen.
    pub speed: f64,
    /// Tick of the last motion update.
    pub last_updated: u64,
}

/// Speed a track flies at while its motion model is still moving (knots).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CruiseSpeed(pub f64);

impl ThreatAttributes {
    /// Build attributes with every bound enforced.
    ///
    /// Levels are clamped into [1, 10], strategic value is derived from them,
    /// and attribution is clamped into [0, 1] for enemies and dropped for
    /// friendlies.
    pub fn new(
        allegiance: Allegiance,
        threat_level: f64,
        armament_level: f64,
        high_value: bool,
        attribution: Option<f64>,
    ) -> Self {
        let threat_level = clamp_level(threat_level);
        let armament_level = clamp_level(armament_level);
        let attribution = match allegiance {
            Allegiance::Friendly => None,
            Allegiance::Enemy => attribution.map(|a| a.clamp(0.0, 1.0)),
        };
        Self {
            threat_level,
            armament_level,
            strategic_value: strategic_value(threat_level, armament_level, high_value),
            attribution,
            high_value,
        }
    }
}

/// `clamp(threat*0.6 + armament*0.4 + bonus, 1, 10)`.
pub fn strategic_value(threat_level: f64, armament_level: f64, high_value: bool) -> f64 {
    let bonus = if high_value { HIGH_VALUE_BONUS } else { 0.0 };
    clamp_level(
        threat_level * STRATEGIC_THREAT_WEIGHT + armament_level * STRATEGIC_ARMAMENT_WEIGHT + bonus,
    )
}

fn clamp_level(value: f64) -> f64 {
    if value.is_nan() {
        return ATTRIBUTE_MIN;
    }
    value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
}

impl Kinematics {
    pub fn at(position: GeoPoint, altitude: f64, speed: f64) -> Self {
        Self {
            position,
            heading: 0.0,
            altitude,
            speed,
            last_updated: 0,
        }
    }
}

/// Normalize a heading in degrees into [0, 360).
pub fn normalize_heading(heading_deg: f64) -> f64 {
    let h = heading_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}
