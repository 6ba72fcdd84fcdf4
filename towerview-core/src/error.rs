/// Error types shared across the core
use thiserror::Error;

use crate::scene::RenderableId;

/// Input that would produce a degenerate or negative mesh
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },
}

impl GeometryError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }
}

/// Scene bookkeeping errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("device {0} is not in the scene")]
    DeviceNotFound(RenderableId),
}

/// Errors surfaced by the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("viewer is not mounted")]
    NotMounted,

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("render failed: {0}")]
    Render(String),
}
