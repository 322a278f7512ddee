//! Replay system: plays a recorded script back one timestep per tick.

use std::collections::BTreeMap;

use tracing::warn;

use overwatch_core::replay::{ReplayScript, Timestep};
use overwatch_core::state::{PlainPoint, TrackPoint};
use overwatch_core::types::GeoPoint;

/// Position within a replay script.
#[derive(Debug, Clone, Default)]
pub struct ReplayCursor {
    script: ReplayScript,
    next: usize,
    /// Number of times the script has wrapped back to the start.
    pub laps: u32,
}

impl ReplayCursor {
    pub fn new(script: ReplayScript) -> Self {
        Self {
            script,
            next: 0,
            laps: 0,
        }
    }

    /// Timestep for this tick.
    ///
    /// A looping script wraps to the start after its last timestep; a
    /// non-looping one keeps showing the last timestep. `None` only for
    /// an empty script.
    pub fn advance(&mut self) -> Option<&Timestep> {
        let len = self.script.timesteps.len();
        if len == 0 {
            return None;
        }
        let current = self.next;
        if current + 1 < len {
            self.next += 1;
        } else if self.script.looping {
            self.next = 0;
            self.laps += 1;
        }
        self.script.timesteps.get(current)
    }

    pub fn len(&self) -> usize {
        self.script.timesteps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.timesteps.is_empty()
    }
}

/// Convert a timestep into plain track points, sorted by id.
///
/// Entities with non-finite coordinates are skipped. When an id repeats
/// within the timestep, the last entry wins.
pub fn to_points(timestep: &Timestep) -> Vec<TrackPoint> {
    let mut by_id: BTreeMap<&str, TrackPoint> = BTreeMap::new();
    for e in timestep
        .entities
        .iter()
        .filter(|e| e.latitude.is_finite() && e.longitude.is_finite())
    {
        let point = TrackPoint::Plain(PlainPoint::new(
            e.id.clone(),
            GeoPoint::new(e.latitude, e.longitude),
            e.side,
            e.attribution,
        ));
        if by_id.insert(e.id.as_str(), point).is_some() {
            warn!(id = %e.id, time = timestep.time, "duplicate replay entity; keeping the last");
        }
    }
    by_id.into_values().collect()
}
