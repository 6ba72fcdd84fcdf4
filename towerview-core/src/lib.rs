/// Towerview Core - placement geometry and scene bookkeeping for tower views
///
/// Turns tower, level and device records into positioned meshes, keeps the
/// displayed set in sync with the scene graph, and provides the software
/// camera and projection the terminal and web hosts draw with.

pub mod color;
pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod manager;
pub mod model;
pub mod placement;
pub mod primitives;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use color::Rgb;
pub use config::{AzimuthMode, ConfigError, ViewerConfig};
pub use error::{GeometryError, SceneError, ViewerError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use manager::SceneManager;
pub use model::{DatasetError, Device, Equipment, Level, Status, Tower, TowerDataset};
pub use placement::Placement;
pub use primitives::PrimitiveTowerParams;
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use scene::{Renderable, RenderableId, RenderableKind, Scene, SceneBackend, ScreenTriangle};
pub use transform::{OrbitControls, Transform};
pub use viewer::{FrameRenderer, TickOutcome, Viewer};
