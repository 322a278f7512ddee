//! Heat layer renderer.
//!
//! Each tick the snapshot is projected into weighted point sets: one for
//! friendly tracks, one for enemies, and optionally a wider attribution
//! layer for enemies that carry an attribution score. Every layer drawn on
//! the previous tick is removed before the new ones are added, so layers
//! never accumulate.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use overwatch_core::constants::*;
use overwatch_core::enums::Allegiance;
use overwatch_core::state::{SimSnapshot, TrackPoint};
use overwatch_core::types::GeoPoint;

use crate::style::Rgb;
use crate::surface::{Layer, LayerHandle, MapSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatLayerKind {
    Friendly,
    Enemy,
    /// Enemies weighted by attribution instead of strategic value.
    Attribution,
}

impl HeatLayerKind {
    pub fn slug(&self) -> &'static str {
        match self {
            HeatLayerKind::Friendly => "friendly",
            HeatLayerKind::Enemy => "enemy",
            HeatLayerKind::Attribution => "attribution",
        }
    }

    /// Colour ramp, cold to hot.
    pub fn gradient(&self) -> Vec<GradientStop> {
        let stops: &[(f64, Rgb)] = match self {
            HeatLayerKind::Friendly => &[
                (0.2, Rgb(0x00, 0x1f, 0x5c)),
                (0.5, Rgb(0x00, 0x66, 0xcc)),
                (0.8, Rgb(0x33, 0xb5, 0xff)),
                (1.0, Rgb(0xcc, 0xf2, 0xff)),
            ],
            HeatLayerKind::Enemy => &[
                (0.2, Rgb(0x5c, 0x00, 0x00)),
                (0.5, Rgb(0xcc, 0x00, 0x00)),
                (0.8, Rgb(0xff, 0x4d, 0x00)),
                (1.0, Rgb(0xff, 0xe0, 0x66)),
            ],
            HeatLayerKind::Attribution => &[
                (0.3, Rgb(0x4b, 0x00, 0x82)),
                (0.6, Rgb(0xc7, 0x15, 0x85)),
                (1.0, Rgb(0xff, 0xa5, 0x00)),
            ],
        };
        stops
            .iter()
            .map(|&(at, color)| GradientStop { at, color })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub at: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub position: GeoPoint,
    /// In [0, 1].
    pub intensity: f64,
}

/// One weighted-point overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatLayer {
    pub kind: HeatLayerKind,
    pub points: Vec<HeatPoint>,
    pub radius_px: f64,
    pub blur_px: f64,
    pub gradient: Vec<GradientStop>,
}

/// Heat layer appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatConfig {
    pub radius_px: f64,
    pub blur_px: f64,
    /// Draw the attribution-weighted layer.
    pub attribution_layer: bool,
    pub attribution_radius_px: f64,
    pub attribution_blur_px: f64,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            radius_px: HEAT_RADIUS_PX,
            blur_px: HEAT_BLUR_PX,
            attribution_layer: true,
            attribution_radius_px: ATTRIBUTION_HEAT_RADIUS_PX,
            attribution_blur_px: ATTRIBUTION_HEAT_BLUR_PX,
        }
    }
}

/// Heat weight of a track: strategic value over ten, or a flat weight for
/// plain points.
pub fn intensity(point: &TrackPoint) -> f64 {
    point
        .strategic_value()
        .map_or(PLAIN_POINT_INTENSITY, |v| (v / 10.0).clamp(0.0, 1.0))
}

/// Build this tick's heat layers. Point sets that come out empty produce
/// no layer.
pub fn build_layers(snapshot: &SimSnapshot, config: &HeatConfig) -> Vec<HeatLayer> {
    let mut friendly = Vec::new();
    let mut enemy = Vec::new();
    let mut attribution = Vec::new();

    for point in &snapshot.tracks {
        let heat = HeatPoint {
            position: point.position(),
            intensity: intensity(point),
        };
        match point.allegiance() {
            Allegiance::Friendly => friendly.push(heat),
            Allegiance::Enemy => {
                enemy.push(heat);
                if let Some(a) = point.attribution() {
                    attribution.push(HeatPoint {
                        position: heat.position,
                        intensity: a,
                    });
                }
            }
        }
    }

    let mut layers = Vec::with_capacity(3);
    let mut push = |kind: HeatLayerKind, points: Vec<HeatPoint>, radius_px, blur_px| {
        if !points.is_empty() {
            layers.push(HeatLayer {
                kind,
                points,
                radius_px,
                blur_px,
                gradient: kind.gradient(),
            });
        }
    };
    push(HeatLayerKind::Friendly, friendly, config.radius_px, config.blur_px);
    push(HeatLayerKind::Enemy, enemy, config.radius_px, config.blur_px);
    if config.attribution_layer {
        push(
            HeatLayerKind::Attribution,
            attribution,
            config.attribution_radius_px,
            config.attribution_blur_px,
        );
    }
    layers
}

/// What a heat render did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeatReport {
    pub drawn: usize,
    pub skipped: usize,
}

/// Owns the handles of the heat layers it drew last.
#[derive(Debug, Default)]
pub struct HeatLayerRenderer {
    config: HeatConfig,
    handles: Vec<LayerHandle>,
}

impl HeatLayerRenderer {
    pub fn new(config: HeatConfig) -> Self {
        Self {
            config,
            handles: Vec::new(),
        }
    }

    /// Replace last tick's layers with layers for `snapshot`.
    pub fn render(&mut self, surface: &mut dyn MapSurface, snapshot: &SimSnapshot) -> HeatReport {
        self.clear(surface);

        let mut report = HeatReport::default();
        for layer in build_layers(snapshot, &self.config) {
            let kind = layer.kind;
            match surface.add_layer(Layer::Heat(layer)) {
                Ok(handle) => {
                    self.handles.push(handle);
                    report.drawn += 1;
                }
                Err(err) => {
                    warn!(layer = kind.slug(), %err, "heat layer skipped");
                    report.skipped += 1;
                }
            }
        }
        debug!(drawn = report.drawn, skipped = report.skipped, "heat layers rendered");
        report
    }

    /// Remove every layer this renderer drew.
    pub fn clear(&mut self, surface: &mut dyn MapSurface) {
        for handle in self.handles.drain(..) {
            if let Err(err) = surface.remove_layer(handle) {
                warn!(%err, "failed to remove heat layer");
            }
        }
    }

    pub fn live_layers(&self) -> usize {
        self.handles.len()
    }
}
