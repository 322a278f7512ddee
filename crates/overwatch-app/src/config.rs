//! Runtime configuration, read from an optional JSON file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use overwatch_core::constants::{SURFACE_READY_TIMEOUT_MS, TICK_RATE};
use overwatch_core::enums::MotionModelKind;
use overwatch_render::heat::HeatConfig;
use overwatch_render::markers::MarkerStrategy;
use overwatch_render::OverlayConfig;
use overwatch_sim::SimConfig;

/// Nominal tick interval at the configured tick rate.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000 / TICK_RATE as u64;

/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seed: u64,
    pub motion_override: Option<MotionModelKind>,
    /// Wall-clock time between ticks on the loop thread. Zero runs flat out.
    pub tick_interval_ms: u64,
    pub readiness_timeout_ms: u64,
    pub marker_strategy: MarkerStrategy,
    pub heat: HeatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            seed: sim.seed,
            motion_override: sim.motion_override,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            readiness_timeout_ms: SURFACE_READY_TIMEOUT_MS,
            marker_strategy: MarkerStrategy::default(),
            heat: HeatConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn sim(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            motion_override: self.motion_override,
        }
    }

    pub fn overlay(&self) -> OverlayConfig {
        OverlayConfig {
            heat: self.heat.clone(),
            marker_strategy: self.marker_strategy,
            readiness_timeout_ms: self.readiness_timeout_ms,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
