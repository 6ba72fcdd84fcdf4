/// Renderables for the tower column, level rings and device boxes
use nalgebra::Point3;

use crate::error::GeometryError;
use crate::geometry::Mesh;
use crate::model::{Device, Level};
use crate::placement::Placement;
use crate::scene::{Renderable, RenderableKind};

/// Tapered column spanning the whole tower, centered at the origin
pub fn tower_renderable(placement: &Placement, height: f32) -> Result<Renderable, GeometryError> {
    let column = placement.tower_column_dimensions(height)?;
    let mesh = Mesh::frustum(
        column.radius_top,
        column.radius_bottom,
        column.height,
        placement.config().radial_segments,
    );
    Ok(Renderable::new(RenderableKind::Tower, mesh, placement.config().tower_color))
}

pub fn level_renderable(
    placement: &Placement,
    height: f32,
    level: &Level,
) -> Result<Renderable, GeometryError> {
    let ring = placement.level_ring_dimensions(height, level)?;
    let mesh = Mesh::frustum(
        ring.width_top,
        ring.width_bottom,
        ring.thickness,
        placement.config().radial_segments,
    );
    Ok(Renderable::new(RenderableKind::Level, mesh, ring.color)
        .at(Point3::new(0.0, ring.y_offset, 0.0)))
}

pub fn device_renderable(
    placement: &Placement,
    height: f32,
    device: &Device,
) -> Result<Renderable, GeometryError> {
    let dims = placement.device_mesh_dimensions(&device.equipment)?;
    let placed = placement.device_placement(height, device)?;

    let mesh = Mesh::cuboid(dims.width, dims.height, dims.depth);
    Ok(Renderable::new(RenderableKind::Device, mesh, placed.color)
        .at(placed.position())
        .turned(placed.yaw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::model::{Equipment, Status};
    use approx::assert_relative_eq;

    #[test]
    fn test_tower_spans_height() {
        let tower = tower_renderable(&Placement::default(), 180.0).unwrap();
        assert_eq!(tower.kind, RenderableKind::Tower);
        assert_relative_eq!(tower.vertical_extent(), 180.0, epsilon = 1e-3);
        assert_eq!(tower.color, Rgb(0x999999));
        assert_eq!(tower.position, Point3::origin());
    }

    #[test]
    fn test_level_ring_position() {
        let ring = level_renderable(&Placement::default(), 180.0, &Level::new(72.0, Status::Busy)).unwrap();
        assert_relative_eq!(ring.position.y, -18.0);
        assert_relative_eq!(ring.vertical_extent(), 1.8, epsilon = 1e-5);
    }

    #[test]
    fn test_device_box_size() {
        let device = Device::new(147.0, Status::Busy, Equipment::with_dimensions(11.9, 96.6, 7.1));
        let boxed = device_renderable(&Placement::default(), 180.0, &device).unwrap();
        assert_relative_eq!(boxed.vertical_extent(), 8.05, epsilon = 1e-4);
        assert_relative_eq!(boxed.position.y, 57.0);
        let (min, max) = boxed.mesh.bounds().unwrap();
        assert_relative_eq!(max.x - min.x, 11.9 / 12.0, epsilon = 1e-5);
        assert_relative_eq!(max.z - min.z, 7.1 / 12.0, epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_height_is_rejected() {
        assert!(tower_renderable(&Placement::default(), 0.0).is_err());
        assert!(level_renderable(&Placement::default(), 10.0, &Level::new(11.0, Status::Busy)).is_err());
    }
}
