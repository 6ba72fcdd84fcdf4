/// Placement geometry
///
/// Pure functions that turn tower height, mount levels and equipment sizes
/// into mesh dimensions and scene positions. The scene is centered on the
/// tower's vertical midpoint: a mount level `l` on a tower of height `h`
/// sits at `y = l - h / 2`.
///
/// The tower column tapers linearly from `top` at the tip to
/// `(taper + 1) * top` at the base, with `top = h / top_width_divisor`.
/// Widths are used as radii when meshes are built.
use nalgebra::Point3;

use crate::color::Rgb;
use crate::config::{AzimuthMode, PlacementConfig};
use crate::error::GeometryError;
use crate::model::{Device, Equipment, Level};

pub const INCHES_PER_FOOT: f32 = 12.0;

pub fn inches_to_feet(inches: f32) -> f32 {
    inches / INCHES_PER_FOOT
}

/// Radii and height of the tapered tower column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDimensions {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
}

/// Ring segment drawn for a level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingDimensions {
    pub width_top: f32,
    pub width_bottom: f32,
    pub thickness: f32,
    pub y_offset: f32,
    pub color: Rgb,
}

/// Equipment box size in feet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// Where a device box goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePlacement {
    /// Distance from the tower axis to the box center
    pub radial_offset: f32,
    pub y_offset: f32,
    /// Rotation around the tower axis, radians
    pub yaw: f32,
    pub color: Rgb,
}

impl DevicePlacement {
    /// Center of the device box in scene coordinates
    pub fn position(&self) -> Point3<f32> {
        Point3::new(
            self.radial_offset * self.yaw.sin(),
            self.y_offset,
            self.radial_offset * self.yaw.cos(),
        )
    }
}

/// Placement calculator, parameterized by [`PlacementConfig`]
#[derive(Debug, Clone, Default)]
pub struct Placement {
    config: PlacementConfig,
}

impl Placement {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn tower_top_width(&self, height: f32) -> Result<f32, GeometryError> {
        check_height(height)?;
        Ok(height / self.config.top_width_divisor)
    }

    /// Column width at `level` feet above the base. Widest at the base,
    /// equal to the top width at `level == height`.
    pub fn tower_width_at_level(&self, height: f32, level: f32) -> Result<f32, GeometryError> {
        let top = self.tower_top_width(height)?;
        if !level.is_finite() || level < 0.0 || level > height {
            return Err(GeometryError::invalid(format!(
                "level {level} is outside the tower (0..={height})"
            )));
        }
        let taper = self.config.taper;
        Ok((taper - (level / height) * taper) * top + top)
    }

    pub fn tower_column_dimensions(&self, height: f32) -> Result<ColumnDimensions, GeometryError> {
        Ok(ColumnDimensions {
            radius_top: self.tower_top_width(height)?,
            radius_bottom: self.tower_width_at_level(height, 0.0)?,
            height,
        })
    }

    pub fn level_ring_dimensions(
        &self,
        height: f32,
        level: &Level,
    ) -> Result<RingDimensions, GeometryError> {
        let mount = level.mount_level;
        check_level(height, mount)?;

        let thickness = height / self.config.ring_thickness_divisor;
        let half = thickness / 2.0;
        // Rings at the very base or tip evaluate the taper at the tower ends
        let upper = (mount + half).min(height);
        let lower = (mount - half).max(0.0);
        let clearance = self.config.ring_clearance;

        Ok(RingDimensions {
            width_top: self.tower_width_at_level(height, upper)? * clearance,
            width_bottom: self.tower_width_at_level(height, lower)? * clearance,
            thickness,
            y_offset: scene_y(height, mount),
            color: self.config.level_colors.for_status(level.status),
        })
    }

    pub fn device_mesh_dimensions(&self, equipment: &Equipment) -> Result<BoxDimensions, GeometryError> {
        for (name, value) in [
            ("width", equipment.width),
            ("height", equipment.height),
            ("depth", equipment.depth),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::invalid(format!(
                    "equipment {name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(BoxDimensions {
            width: inches_to_feet(equipment.width),
            height: inches_to_feet(equipment.height),
            depth: inches_to_feet(equipment.depth),
        })
    }

    /// The box sits flush against the column surface: radial offset is the
    /// column width at the mount level plus half the box depth.
    pub fn device_placement(
        &self,
        height: f32,
        device: &Device,
    ) -> Result<DevicePlacement, GeometryError> {
        let dims = self.device_mesh_dimensions(&device.equipment)?;
        let surface = self.tower_width_at_level(height, device.mount_level)?;
        let yaw = match self.config.azimuth {
            AzimuthMode::Ignore => 0.0,
            AzimuthMode::Angular => device.azimuth_deg.unwrap_or(0.0).to_radians(),
        };

        Ok(DevicePlacement {
            radial_offset: surface * self.config.device_clearance + dims.depth / 2.0,
            y_offset: scene_y(height, device.mount_level),
            yaw,
            color: self.config.device_colors.for_status(device.status),
        })
    }
}

/// Convert a base-relative height to the scene's centered Y axis
pub fn scene_y(height: f32, level: f32) -> f32 {
    level - height / 2.0
}

fn check_height(height: f32) -> Result<(), GeometryError> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::invalid(format!(
            "tower height must be positive, got {height}"
        )))
    }
}

fn check_level(height: f32, level: f32) -> Result<(), GeometryError> {
    check_height(height)?;
    if level.is_finite() && (0.0..=height).contains(&level) {
        Ok(())
    } else {
        Err(GeometryError::invalid(format!(
            "level {level} is outside the tower (0..={height})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use approx::assert_relative_eq;

    fn placement() -> Placement {
        Placement::default()
    }

    #[test]
    fn test_top_width() {
        assert_relative_eq!(placement().tower_top_width(180.0).unwrap(), 0.6);
        assert!(placement().tower_top_width(0.0).is_err());
        assert!(placement().tower_top_width(-1.0).is_err());
    }

    #[test]
    fn test_taper_ends() {
        let p = placement();
        let top = p.tower_top_width(180.0).unwrap();
        let base = p.tower_width_at_level(180.0, 0.0).unwrap();
        let tip = p.tower_width_at_level(180.0, 180.0).unwrap();
        assert_relative_eq!(base, 6.0 * top, epsilon = 1e-5);
        assert_relative_eq!(tip, top, epsilon = 1e-6);
        assert!(base > tip && tip > 0.0);
    }

    #[test]
    fn test_taper_is_monotonic() {
        let p = placement();
        for height in [1.0f32, 50.0, 180.0, 1000.0] {
            let mut previous = f32::INFINITY;
            for step in 0..=100 {
                let level = height * step as f32 / 100.0;
                let width = p.tower_width_at_level(height, level).unwrap();
                assert!(width.is_finite() && width > 0.0);
                assert!(width <= previous + 1e-5);
                previous = width;
            }
        }
    }

    #[test]
    fn test_level_outside_tower_is_rejected() {
        let p = placement();
        assert!(p.tower_width_at_level(180.0, -0.1).is_err());
        assert!(p.tower_width_at_level(180.0, 180.1).is_err());
        assert!(p.tower_width_at_level(0.0, 0.0).is_err());
    }

    #[test]
    fn test_ring_for_busy_level() {
        let ring = placement()
            .level_ring_dimensions(180.0, &Level::new(72.0, Status::Busy))
            .unwrap();
        assert_relative_eq!(ring.y_offset, -18.0);
        assert_relative_eq!(ring.thickness, 1.8);
        assert_eq!(ring.color, Rgb(0x6666ff));
        assert!(ring.width_bottom > ring.width_top);

        let column = placement().tower_width_at_level(180.0, 72.0).unwrap();
        assert!(ring.width_top > column * 0.99);
    }

    #[test]
    fn test_ring_at_tower_ends() {
        let p = placement();
        let base = p.level_ring_dimensions(180.0, &Level::new(0.0, Status::Available)).unwrap();
        let tip = p.level_ring_dimensions(180.0, &Level::new(180.0, Status::Available)).unwrap();
        assert_eq!(base.color, Rgb(0x00aa00));
        assert_relative_eq!(base.y_offset, -90.0);
        assert_relative_eq!(tip.y_offset, 90.0);
        assert!(tip.width_top > 0.0);

        // Evaluation points past the tower ends are clamped to them
        assert_relative_eq!(
            base.width_bottom,
            p.tower_width_at_level(180.0, 0.0).unwrap() * 1.02,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            tip.width_top,
            p.tower_top_width(180.0).unwrap() * 1.02,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_device_dimensions_convert_inches() {
        let p = placement();
        let dims = p
            .device_mesh_dimensions(&Equipment::with_dimensions(12.0, 24.0, 36.0))
            .unwrap();
        assert_eq!(dims, BoxDimensions { width: 1.0, height: 2.0, depth: 3.0 });

        let empty = p
            .device_mesh_dimensions(&Equipment::with_dimensions(0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(empty, BoxDimensions { width: 0.0, height: 0.0, depth: 0.0 });
    }

    #[test]
    fn test_negative_dimensions_are_rejected() {
        let err = placement()
            .device_mesh_dimensions(&Equipment::with_dimensions(1.0, -2.0, 1.0))
            .unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_device_sits_flush_on_column() {
        let p = placement();
        let device = Device::new(147.0, Status::Other, Equipment::with_dimensions(11.9, 96.6, 7.1));
        let placed = p.device_placement(180.0, &device).unwrap();
        let surface = p.tower_width_at_level(180.0, 147.0).unwrap() * 1.01;

        assert_relative_eq!(placed.y_offset, 57.0);
        assert_relative_eq!(placed.radial_offset, surface + 7.1 / 24.0, epsilon = 1e-5);
        assert_eq!(placed.color, Rgb(0x0000ff));
        assert_eq!(placed.yaw, 0.0);

        let position = placed.position();
        assert_relative_eq!(position.x, 0.0);
        assert_relative_eq!(position.z, placed.radial_offset);
    }

    #[test]
    fn test_angular_azimuth_turns_device() {
        let p = Placement::new(PlacementConfig {
            azimuth: AzimuthMode::Angular,
            ..PlacementConfig::default()
        });
        let mut device = Device::new(100.0, Status::Available, Equipment::with_dimensions(10.0, 10.0, 10.0));
        device.azimuth_deg = Some(90.0);
        let placed = p.device_placement(180.0, &device).unwrap();
        let position = placed.position();
        assert_relative_eq!(position.x, placed.radial_offset, epsilon = 1e-5);
        assert_relative_eq!(position.z, 0.0, epsilon = 1e-5);
        assert_eq!(placed.color, Rgb(0x00ff00));
    }
}
