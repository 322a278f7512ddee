//! Errors raised while drawing onto a map surface.

use thiserror::Error;

use crate::surface::{LayerHandle, StyleHandle};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("unknown layer handle {0}")]
    UnknownLayer(LayerHandle),

    #[error("unknown style handle {0}")]
    UnknownStyle(StyleHandle),

    #[error("map surface is not ready")]
    SurfaceNotReady,

    #[error("surface rejected layer `{name}`: {reason}")]
    Rejected { name: String, reason: String },
}

pub type RenderResult<T> = Result<T, RenderError>;
