//! Marker and tooltip renderer.
//!
//! One marker per track, styled only through `style::classify`. Two
//! strategies are available: rebuild every marker each tick, or keep
//! markers keyed by track id and update them in place.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use overwatch_core::enums::Allegiance;
use overwatch_core::state::{SimSnapshot, TrackPoint};
use overwatch_core::types::GeoPoint;

use crate::error::RenderError;
use crate::style::{classify, IconRegistry, TrackStyle};
use crate::surface::{Layer, LayerHandle, MapSurface};

/// Hover text for a marker, one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub lines: Vec<String>,
}

impl Tooltip {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Icon marker for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub position: GeoPoint,
    /// Icon rotation; plain points have no heading.
    pub heading: Option<f64>,
    pub icon: String,
    pub class: String,
    pub style: TrackStyle,
    pub tooltip: Tooltip,
}

impl Marker {
    pub fn for_track(point: &TrackPoint, icons: &IconRegistry) -> Self {
        let style = classify(point);
        let heading = match point {
            TrackPoint::Jet(j) => Some(j.kinematics.heading),
            TrackPoint::Plain(_) => None,
        };
        Self {
            id: point.id().to_string(),
            position: point.position(),
            heading,
            icon: icons.icon_for(point).to_string(),
            class: style.class_name(),
            style,
            tooltip: tooltip_for(point),
        }
    }
}

/// Tooltip lines: type, call sign, side, threat, armament, attribution
/// (enemies that have one), altitude, speed, heading.
pub fn tooltip_for(point: &TrackPoint) -> Tooltip {
    let mut lines = Vec::new();
    match point {
        TrackPoint::Jet(jet) => {
            let id = &jet.identity;
            let k = &jet.kinematics;
            lines.push(format!("Type: {}", id.aircraft_type));
            lines.push(format!(
                "Call sign: {}",
                id.call_sign.as_deref().unwrap_or("N/A")
            ));
            lines.push(format!("Side: {}", id.allegiance.tag()));
            lines.push(format!("Threat: {:.0}/10", jet.threat.threat_level));
            lines.push(format!("Armament: {:.0}/10", jet.threat.armament_level));
            push_attribution(&mut lines, point);
            lines.push(format!("Altitude: {:.0} m", k.altitude));
            lines.push(format!("Speed: {:.0} kt", k.speed));
            lines.push(format!("Heading: {:03.0}°", k.heading));
        }
        TrackPoint::Plain(plain) => {
            lines.push(format!("Track: {}", plain.id));
            lines.push(format!("Side: {}", plain.allegiance.tag()));
            push_attribution(&mut lines, point);
        }
    }
    Tooltip { lines }
}

fn push_attribution(lines: &mut Vec<String>, point: &TrackPoint) {
    if point.allegiance() == Allegiance::Enemy {
        if let Some(a) = point.attribution() {
            lines.push(format!("Attribution: {:.0}%", a * 100.0));
        }
    }
}

/// How markers are reconciled with a new snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerStrategy {
    /// Remove every marker and recreate all of them.
    #[default]
    Rebuild,
    /// Update markers in place by id; add new ids, remove vanished ones.
    Keyed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub skipped: usize,
}

pub struct MarkerRenderer {
    icons: IconRegistry,
    strategy: MarkerStrategy,
    handles: BTreeMap<String, LayerHandle>,
}

impl MarkerRenderer {
    pub fn new(icons: IconRegistry, strategy: MarkerStrategy) -> Self {
        Self {
            icons,
            strategy,
            handles: BTreeMap::new(),
        }
    }

    pub fn strategy(&self) -> MarkerStrategy {
        self.strategy
    }

    /// Number of markers currently on the surface.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn render(&mut self, surface: &mut dyn MapSurface, snapshot: &SimSnapshot) -> MarkerReport {
        let report = match self.strategy {
            MarkerStrategy::Rebuild => self.rebuild(surface, snapshot),
            MarkerStrategy::Keyed => self.reconcile(surface, snapshot),
        };
        debug!(
            markers = self.handles.len(),
            added = report.added,
            updated = report.updated,
            removed = report.removed,
            "markers rendered"
        );
        report
    }

    /// Remove every marker this renderer placed.
    pub fn clear(&mut self, surface: &mut dyn MapSurface) -> usize {
        let removed = self.handles.len();
        for (id, handle) in std::mem::take(&mut self.handles) {
            if let Err(err) = surface.remove_layer(handle) {
                warn!(track = %id, %err, "failed to remove marker");
            }
        }
        removed
    }

    fn rebuild(&mut self, surface: &mut dyn MapSurface, snapshot: &SimSnapshot) -> MarkerReport {
        let mut report = MarkerReport {
            removed: self.clear(surface),
            ..Default::default()
        };
        for point in &snapshot.tracks {
            if self.add(surface, point) {
                report.added += 1;
            } else {
                report.skipped += 1;
            }
        }
        report
    }

    fn reconcile(&mut self, surface: &mut dyn MapSurface, snapshot: &SimSnapshot) -> MarkerReport {
        let mut report = MarkerReport::default();
        let live: HashSet<&str> = snapshot.tracks.iter().map(|t| t.id()).collect();

        let vanished: Vec<String> = self
            .handles
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in vanished {
            if let Some(handle) = self.handles.remove(&id) {
                if let Err(err) = surface.remove_layer(handle) {
                    warn!(track = %id, %err, "failed to remove marker");
                }
                report.removed += 1;
            }
        }

        for point in &snapshot.tracks {
            let Some(&handle) = self.handles.get(point.id()) else {
                if self.add(surface, point) {
                    report.added += 1;
                } else {
                    report.skipped += 1;
                }
                continue;
            };
            let marker = Marker::for_track(point, &self.icons);
            match surface.update_layer(handle, Layer::Marker(marker)) {
                Ok(()) => report.updated += 1,
                Err(RenderError::UnknownLayer(_)) => {
                    // Surface lost the layer; place it again.
                    self.handles.remove(point.id());
                    if self.add(surface, point) {
                        report.added += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                Err(err) => {
                    warn!(track = point.id(), %err, "marker update skipped");
                    report.skipped += 1;
                }
            }
        }
        report
    }

    fn add(&mut self, surface: &mut dyn MapSurface, point: &TrackPoint) -> bool {
        let marker = Marker::for_track(point, &self.icons);
        match surface.add_layer(Layer::Marker(marker)) {
            Ok(handle) => {
                // One marker per id: a repeated id replaces the earlier marker.
                if let Some(stale) = self.handles.insert(point.id().to_string(), handle) {
                    if let Err(err) = surface.remove_layer(stale) {
                        warn!(track = point.id(), %err, "failed to remove replaced marker");
                    }
                }
                true
            }
            Err(err) => {
                warn!(track = point.id(), %err, "marker skipped");
                false
            }
        }
    }
}
