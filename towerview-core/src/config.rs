/// Viewer configuration
///
/// Every value has a default, so an empty file (or no file at all) gives the
/// stock viewer. Colors are packed `0xRRGGBB` integers.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgb;
use crate::model::Status;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub lights: LightsConfig,
    pub placement: PlacementConfig,
    pub render: RenderConfig,
}

impl ViewerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Perspective camera and framing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Eye distance before any tower is set
    pub default_distance: f32,
    /// Camera distance as a multiple of the tower's vertical extent
    pub framing_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 10_000.0,
            default_distance: 100.0,
            framing_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: Rgb,
    pub intensity: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub ambient: LightConfig,
    pub point: LightConfig,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            intensity: 1.0,
            position: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient: LightConfig {
                color: Rgb::WHITE,
                intensity: 0.5,
                position: [100.0, 100.0, -100.0],
            },
            point: LightConfig {
                color: Rgb::WHITE,
                intensity: 0.8,
                position: [100.0, 200.0, 100.0],
            },
        }
    }
}

/// Two-valued color policy keyed by status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusColors {
    pub available: Rgb,
    pub other: Rgb,
}

impl StatusColors {
    pub fn for_status(&self, status: Status) -> Rgb {
        match status {
            Status::Available => self.available,
            Status::Busy | Status::Other => self.other,
        }
    }
}

/// How device azimuth feeds into placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AzimuthMode {
    /// Every device sits on the +Z side of the column
    #[default]
    Ignore,
    /// Devices are turned around the column by their `azimuthDeg`
    Angular,
}

/// Constants of the placement geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Tower top width is `height / top_width_divisor`
    pub top_width_divisor: f32,
    /// Base width is `(taper + 1)` times the top width
    pub taper: f32,
    /// Ring thickness is `height / ring_thickness_divisor`
    pub ring_thickness_divisor: f32,
    pub ring_clearance: f32,
    pub device_clearance: f32,
    pub radial_segments: usize,
    pub azimuth: AzimuthMode,
    pub tower_color: Rgb,
    pub level_colors: StatusColors,
    pub device_colors: StatusColors,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            top_width_divisor: 300.0,
            taper: 5.0,
            ring_thickness_divisor: 100.0,
            ring_clearance: 1.02,
            device_clearance: 1.01,
            radial_segments: 32,
            azimuth: AzimuthMode::Ignore,
            tower_color: Rgb(0x999999),
            level_colors: StatusColors {
                available: Rgb(0x00aa00),
                other: Rgb(0x6666ff),
            },
            device_colors: StatusColors {
                available: Rgb(0x00ff00),
                other: Rgb(0x0000ff),
            },
        }
    }
}

/// Host render loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub target_fps: u32,
    pub auto_rotate: bool,
    pub background: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            auto_rotate: false,
            background: Rgb(0x000000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [camera]
            framing_factor = 2.0

            [placement]
            azimuth = "angular"
            level_colors = { available = 0x112233, other = 0x445566 }
            "#,
        )
        .unwrap();
        assert_eq!(config.camera.framing_factor, 2.0);
        assert_eq!(config.camera.fov_deg, 45.0);
        assert_eq!(config.placement.azimuth, AzimuthMode::Angular);
        assert_eq!(config.placement.level_colors.for_status(Status::Busy), Rgb(0x445566));
        assert_eq!(config.placement.device_colors.available, Rgb(0x00ff00));
    }

    #[test]
    fn test_round_trip() {
        let config = ViewerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(ViewerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let err = ViewerConfig::load("viewer.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_status_colors() {
        let colors = PlacementConfig::default().level_colors;
        assert_eq!(colors.for_status(Status::Available), Rgb(0x00aa00));
        assert_eq!(colors.for_status(Status::Busy), Rgb(0x6666ff));
        assert_eq!(colors.for_status(Status::Other), Rgb(0x6666ff));
    }
}
