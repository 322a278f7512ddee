//! Scenario catalog: the named entries offered by the scenario selector.
//!
//! Each scenario binds a viewport, a generator layout and the motion model
//! its tracks fly.

use overwatch_core::constants::DEFAULT_SPREAD_DEG;
use overwatch_core::enums::{MotionModelKind, ScenarioId};
use overwatch_core::types::{GeoPoint, Viewport};

/// How a scenario's tracks are generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// The twelve-slot paired formation layout.
    Fixed { radius_deg: f64 },
    /// `count` tracks across random formations.
    Random { count: usize, radius_deg: f64 },
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDef {
    pub id: ScenarioId,
    pub name: &'static str,
    pub viewport: Viewport,
    pub layout: Layout,
    pub motion: MotionModelKind,
}

impl ScenarioDef {
    /// Number of tracks this scenario spawns.
    pub fn track_count(&self) -> usize {
        match self.layout {
            Layout::Fixed { .. } => crate::generator::CALL_SIGNS.len(),
            Layout::Random { count, .. } => count,
        }
    }
}

/// Look up a scenario definition.
pub fn definition(id: ScenarioId) -> ScenarioDef {
    match id {
        // Paired formations around Taipei, flying patrol orbits.
        ScenarioId::TaiwanStrait => ScenarioDef {
            id,
            name: "Taiwan Strait Patrol",
            viewport: Viewport::new(GeoPoint::new(25.047, 121.532), 7),
            layout: Layout::Fixed {
                radius_deg: DEFAULT_SPREAD_DEG,
            },
            motion: MotionModelKind::EllipticalOrbit,
        },
        ScenarioId::SouthChinaSea => ScenarioDef {
            id,
            name: "South China Sea Saturation",
            viewport: Viewport::new(GeoPoint::new(15.0, 114.0), 6),
            layout: Layout::Random {
                count: 40,
                radius_deg: 3.0,
            },
            motion: MotionModelKind::CappedTransit,
        },
        ScenarioId::EastChinaSea => ScenarioDef {
            id,
            name: "East China Sea Watch",
            viewport: Viewport::new(GeoPoint::new(29.5, 125.0), 6),
            layout: Layout::Random {
                count: 24,
                radius_deg: 2.0,
            },
            motion: MotionModelKind::EllipticalOrbit,
        },
        ScenarioId::KoreanPeninsula => ScenarioDef {
            id,
            name: "Korean Peninsula Transit",
            viewport: Viewport::new(GeoPoint::new(37.5, 127.0), 7),
            layout: Layout::Random {
                count: 16,
                radius_deg: 1.2,
            },
            motion: MotionModelKind::CappedTransit,
        },
    }
}

/// Every scenario in selector order.
pub fn catalog() -> Vec<ScenarioDef> {
    ScenarioId::ALL.iter().map(|&id| definition(id)).collect()
}
