//! Overlay rendering for OVERWATCH snapshots.
//!
//! Classifies tracks, projects them into heat layers and icon markers, and
//! draws both onto an abstract `MapSurface`. Rendering only reads the
//! snapshot; it never touches simulation state.

pub mod error;
pub mod heat;
pub mod markers;
pub mod overlay;
pub mod style;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use overlay::{OverlayConfig, OverlayPipeline, RenderOutcome};
pub use surface::{LayerStack, MapSurface};

#[cfg(test)]
mod tests;
