//! Overlay pipeline: everything drawn for one snapshot.
//!
//! Owns the readiness gate, the heat and marker renderers and the track
//! style sheet. `render` redraws both renderers from the same snapshot;
//! `teardown` removes every layer, marker and style it put on the surface.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use overwatch_core::constants::SURFACE_READY_TIMEOUT_MS;
use overwatch_core::state::SimSnapshot;

use crate::heat::{HeatConfig, HeatLayerRenderer, HeatReport};
use crate::markers::{MarkerRenderer, MarkerReport, MarkerStrategy};
use crate::style::{IconRegistry, StyleSheet};
use crate::surface::{MapSurface, ReadinessGate, StyleHandle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub heat: HeatConfig,
    pub marker_strategy: MarkerStrategy,
    /// How long to wait for the surface before drawing anyway.
    pub readiness_timeout_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            heat: HeatConfig::default(),
            marker_strategy: MarkerStrategy::default(),
            readiness_timeout_ms: SURFACE_READY_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Surface not ready yet; nothing drawn.
    Deferred,
    Drawn { heat: HeatReport, markers: MarkerReport },
}

pub struct OverlayPipeline {
    gate: ReadinessGate,
    heat: HeatLayerRenderer,
    markers: MarkerRenderer,
    sheet: StyleSheet,
    style: Option<StyleHandle>,
}

impl OverlayPipeline {
    pub fn new(config: OverlayConfig, icons: IconRegistry) -> Self {
        Self {
            gate: ReadinessGate::new(Duration::from_millis(config.readiness_timeout_ms)),
            heat: HeatLayerRenderer::new(config.heat),
            markers: MarkerRenderer::new(icons, config.marker_strategy),
            sheet: StyleSheet::tracks(),
            style: None,
        }
    }

    pub fn render(
        &mut self,
        surface: &mut dyn MapSurface,
        snapshot: &SimSnapshot,
        now: Instant,
    ) -> RenderOutcome {
        if !self.gate.poll(surface.is_ready(), now) {
            debug!(tick = snapshot.time.tick, "surface not ready; render deferred");
            return RenderOutcome::Deferred;
        }

        if self.style.is_none() {
            match surface.attach_style(&self.sheet) {
                Ok(handle) => self.style = Some(handle),
                Err(err) => warn!(sheet = %self.sheet.name, %err, "style sheet not attached"),
            }
        }

        let heat = self.heat.render(surface, snapshot);
        let markers = self.markers.render(surface, snapshot);
        RenderOutcome::Drawn { heat, markers }
    }

    /// Remove everything this pipeline drew and detach its style sheet.
    /// The gate closes again so a later render waits for readiness anew.
    pub fn teardown(&mut self, surface: &mut dyn MapSurface) {
        self.heat.clear(surface);
        let markers = self.markers.clear(surface);
        if let Some(handle) = self.style.take() {
            if let Err(err) = surface.detach_style(handle) {
                warn!(%err, "failed to detach style sheet");
            }
        }
        self.gate.reset();
        debug!(markers, "overlay torn down");
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn heat_layer_count(&self) -> usize {
        self.heat.live_layers()
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }
}
