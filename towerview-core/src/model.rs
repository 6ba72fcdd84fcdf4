/// Tower, level and device records
///
/// Records arrive as JSON from the inventory service. Field names follow
/// its camelCase schema; fields the viewer does not use are ignored.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GeometryError;

/// Occupancy status of a level or device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    Busy,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Feet
    pub height: f32,
}

impl Tower {
    pub fn new(height: f32) -> Result<Self, GeometryError> {
        if height.is_finite() && height > 0.0 {
            Ok(Self { height })
        } else {
            Err(GeometryError::invalid(format!(
                "tower height must be positive, got {height}"
            )))
        }
    }
}

/// A mounting level (horizontal ring) on the tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub structure_id: Option<String>,
    /// Feet from the tower base
    pub mount_level: f32,
    #[serde(default)]
    pub status: Status,
}

impl Level {
    pub fn new(mount_level: f32, status: Status) -> Self {
        Self {
            id: None,
            structure_id: None,
            mount_level,
            status,
        }
    }
}

/// Physical description of a piece of equipment. Dimensions are in inches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub manufacture: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    #[serde(default)]
    pub weight: f32,
}

impl Equipment {
    pub fn with_dimensions(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            ..Self::default()
        }
    }
}

/// Equipment mounted at a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub structure_id: Option<String>,
    /// Feet from the tower base
    pub mount_level: f32,
    #[serde(default)]
    pub status: Status,
    pub equipment: Equipment,
    #[serde(default)]
    pub azimuth_deg: Option<f32>,
    /// Leg or face the device hangs on (`LegA`, `FaceB`, ...)
    #[serde(default, rename = "antennaLegFaceTypeLookupCode")]
    pub leg_face: Option<String>,
}

impl Device {
    pub fn new(mount_level: f32, status: Status, equipment: Equipment) -> Self {
        Self {
            id: None,
            structure_id: None,
            mount_level,
            status,
            equipment,
            azimuth_deg: None,
            leg_face: None,
        }
    }
}

/// Everything needed to draw one tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerDataset {
    pub tower: Tower,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

impl TowerDataset {
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
