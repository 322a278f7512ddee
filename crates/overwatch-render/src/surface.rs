//! Map surface abstraction.
//!
//! Renderers never talk to a concrete map widget: they add, update and
//! remove layers through `MapSurface`, holding on to the handles it
//! returns. `LayerStack` is the in-memory surface used by the app and
//! by tests. `ReadinessGate` holds drawing back until the surface reports
//! ready, or until a timeout passes.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::heat::HeatLayer;
use crate::markers::Marker;
use crate::style::StyleSheet;

/// Opaque handle to a layer on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerHandle(pub u64);

/// Opaque handle to an attached style sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleHandle(pub u64);

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

impl fmt::Display for StyleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "style#{}", self.0)
    }
}

/// Anything drawn on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer")]
pub enum Layer {
    Heat(HeatLayer),
    Marker(Marker),
}

impl Layer {
    /// Layer name, used in logs and for rejection.
    pub fn name(&self) -> String {
        match self {
            Layer::Heat(h) => format!("heat:{}", h.kind.slug()),
            Layer::Marker(m) => format!("marker:{}", m.id),
        }
    }
}

/// A map that can hold overlay layers and style sheets.
pub trait MapSurface {
    /// Whether the surface has signalled that it finished loading.
    fn is_ready(&self) -> bool;

    fn add_layer(&mut self, layer: Layer) -> RenderResult<LayerHandle>;

    /// Replace the content of an existing layer in place.
    fn update_layer(&mut self, handle: LayerHandle, layer: Layer) -> RenderResult<()>;

    fn remove_layer(&mut self, handle: LayerHandle) -> RenderResult<()>;

    fn attach_style(&mut self, sheet: &StyleSheet) -> RenderResult<StyleHandle>;

    fn detach_style(&mut self, handle: StyleHandle) -> RenderResult<()>;

    fn layer_count(&self) -> usize;

    fn style_count(&self) -> usize;
}

/// In-memory surface: an ordered set of layers and attached style sheets.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    ready: bool,
    next_id: u64,
    layers: BTreeMap<LayerHandle, Layer>,
    styles: BTreeMap<StyleHandle, StyleSheet>,
    capacity: Option<usize>,
    rejected_names: HashSet<String>,
}

impl LayerStack {
    /// A surface that is already loaded.
    pub fn new() -> Self {
        Self {
            ready: true,
            ..Default::default()
        }
    }

    /// A surface still loading; see `set_ready`.
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Refuse any new layer beyond `limit` layers.
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.capacity = Some(limit);
        self
    }

    /// Refuse every layer with this name (see `Layer::name`).
    pub fn reject_named(mut self, name: impl Into<String>) -> Self {
        self.rejected_names.insert(name.into());
        self
    }

    pub fn get(&self, handle: LayerHandle) -> Option<&Layer> {
        self.layers.get(&handle)
    }

    pub fn layers(&self) -> impl Iterator<Item = (&LayerHandle, &Layer)> {
        self.layers.iter()
    }

    pub fn heat_layers(&self) -> impl Iterator<Item = &HeatLayer> {
        self.layers.values().filter_map(|l| match l {
            Layer::Heat(h) => Some(h),
            Layer::Marker(_) => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.layers.values().filter_map(|l| match l {
            Layer::Marker(m) => Some(m),
            Layer::Heat(_) => None,
        })
    }

    pub fn styles(&self) -> impl Iterator<Item = &StyleSheet> {
        self.styles.values()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_accepts(&self, layer: &Layer) -> RenderResult<()> {
        if !self.ready {
            return Err(RenderError::SurfaceNotReady);
        }
        let name = layer.name();
        if self.rejected_names.contains(&name) {
            return Err(RenderError::Rejected {
                name,
                reason: "layer refused by surface".to_string(),
            });
        }
        Ok(())
    }
}

impl MapSurface for LayerStack {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn add_layer(&mut self, layer: Layer) -> RenderResult<LayerHandle> {
        self.check_accepts(&layer)?;
        if let Some(limit) = self.capacity {
            if self.layers.len() >= limit {
                return Err(RenderError::Rejected {
                    name: layer.name(),
                    reason: format!("surface full ({limit} layers)"),
                });
            }
        }
        let handle = LayerHandle(self.next_id());
        self.layers.insert(handle, layer);
        Ok(handle)
    }

    fn update_layer(&mut self, handle: LayerHandle, layer: Layer) -> RenderResult<()> {
        self.check_accepts(&layer)?;
        match self.layers.get_mut(&handle) {
            Some(slot) => {
                *slot = layer;
                Ok(())
            }
            None => Err(RenderError::UnknownLayer(handle)),
        }
    }

    fn remove_layer(&mut self, handle: LayerHandle) -> RenderResult<()> {
        self.layers
            .remove(&handle)
            .map(|_| ())
            .ok_or(RenderError::UnknownLayer(handle))
    }

    fn attach_style(&mut self, sheet: &StyleSheet) -> RenderResult<StyleHandle> {
        let handle = StyleHandle(self.next_id());
        self.styles.insert(handle, sheet.clone());
        Ok(handle)
    }

    fn detach_style(&mut self, handle: StyleHandle) -> RenderResult<()> {
        self.styles
            .remove(&handle)
            .map(|_| ())
            .ok_or(RenderError::UnknownStyle(handle))
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn style_count(&self) -> usize {
        self.styles.len()
    }
}

// ---- Readiness gate ----

/// Why the gate opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOpened {
    /// The surface reported ready.
    Signalled,
    /// The timeout passed first; drawing proceeds anyway.
    TimedOut,
}

/// Defers drawing until the surface is ready, or a bounded time has passed.
///
/// The wait starts at the first poll. Once open the gate stays open until
/// `reset`.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    timeout: Duration,
    waiting_since: Option<Instant>,
    opened: Option<GateOpened>,
}

impl ReadinessGate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            waiting_since: None,
            opened: None,
        }
    }

    /// Returns true when drawing may proceed.
    pub fn poll(&mut self, surface_ready: bool, now: Instant) -> bool {
        if self.opened.is_some() {
            return true;
        }
        let since = *self.waiting_since.get_or_insert(now);
        if surface_ready {
            self.opened = Some(GateOpened::Signalled);
        } else if now.saturating_duration_since(since) >= self.timeout {
            self.opened = Some(GateOpened::TimedOut);
        }
        if let Some(reason) = self.opened {
            tracing::info!(?reason, "map surface gate open");
        }
        self.opened.is_some()
    }

    pub fn opened(&self) -> Option<GateOpened> {
        self.opened
    }

    /// Close the gate; the next poll starts a new wait.
    pub fn reset(&mut self) {
        self.waiting_since = None;
        self.opened = None;
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            overwatch_core::constants::SURFACE_READY_TIMEOUT_MS,
        ))
    }
}
