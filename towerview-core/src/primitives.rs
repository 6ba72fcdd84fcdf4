/// Demo tower made of primitives: a straight column, a flat triangle
/// platform and a box, described by a flat parameter object.
///
/// Figure heights are measured from the column base, like mount levels.
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::ViewerConfig;
use crate::error::GeometryError;
use crate::geometry::Mesh;
use crate::placement::scene_y;
use crate::projection::Camera;
use crate::scene::{Renderable, RenderableKind, Scene, SceneBackend};

/// Every box drawn by the demo is this tall
pub const BOX_HEIGHT: f32 = 10.0;

const COLUMN_COLOR: Rgb = Rgb(0xffff00);
const BOX_COLOR: Rgb = Rgb(0x0ffff0);
const TRIANGLE_COLOR: Rgb = Rgb(0x8080ff);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnParams {
    pub height: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub height: f32,
    pub width: f32,
    pub length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriangleParams {
    pub height: f32,
    pub side_length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveTowerParams {
    pub column: ColumnParams,
    #[serde(rename = "box")]
    pub block: BoxParams,
    pub triangle: TriangleParams,
}

impl PrimitiveTowerParams {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The three renderables of a primitive tower
#[derive(Debug, Clone)]
pub struct PrimitiveTower {
    pub column: Renderable,
    pub triangle: Renderable,
    pub block: Renderable,
}

/// Scene Y of a figure mounted `figure_height` above the column base
pub fn figure_height(column_height: f32, figure_height: f32) -> f32 {
    scene_y(column_height, figure_height)
}

pub fn build_column_mesh(height: f32, radius: f32, segments: usize) -> Renderable {
    Renderable::new(
        RenderableKind::Tower,
        Mesh::cylinder(radius, height, segments),
        COLUMN_COLOR,
    )
}

/// Box of [`BOX_HEIGHT`] centered at scene height `y`
pub fn build_box_mesh(y: f32, width: f32, length: f32) -> Renderable {
    Renderable::new(
        RenderableKind::Primitive,
        Mesh::cuboid(width, BOX_HEIGHT, length),
        BOX_COLOR,
    )
    .at(Point3::new(0.0, y, 0.0))
}

/// Horizontal triangle at scene height `y`, visible from above and below
pub fn build_triangle_mesh(y: f32, side_length: f32) -> Renderable {
    let s = side_length;
    let mesh = Mesh::double_sided_triangle(
        Point3::new(s, 0.0, s),
        Point3::new(-(s * 2.0), 0.0, 0.0),
        Point3::new(s, 0.0, -s),
    );
    Renderable::new(RenderableKind::Primitive, mesh, TRIANGLE_COLOR).at(Point3::new(0.0, y, 0.0))
}

pub fn build_primitive_tower(
    params: &PrimitiveTowerParams,
    segments: usize,
) -> Result<PrimitiveTower, GeometryError> {
    let column = params.column;
    if !(column.height.is_finite() && column.height > 0.0) {
        return Err(GeometryError::invalid(format!(
            "column height must be positive, got {}",
            column.height
        )));
    }
    for (name, value) in [
        ("column radius", column.radius),
        ("box width", params.block.width),
        ("box length", params.block.length),
        ("triangle side length", params.triangle.side_length),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(GeometryError::invalid(format!(
                "{name} must be non-negative, got {value}"
            )));
        }
    }

    Ok(PrimitiveTower {
        column: build_column_mesh(column.height, column.radius, segments),
        triangle: build_triangle_mesh(
            figure_height(column.height, params.triangle.height),
            params.triangle.side_length,
        ),
        block: build_box_mesh(
            figure_height(column.height, params.block.height),
            params.block.width,
            params.block.length,
        ),
    })
}

/// Standalone lit scene holding a primitive tower
pub fn build_primitive_tower_scene(
    params: &PrimitiveTowerParams,
    config: &ViewerConfig,
    width: u32,
    height: u32,
) -> Result<Scene, GeometryError> {
    let tower = build_primitive_tower(params, config.placement.radial_segments)?;
    let mut scene = Scene::lit(Camera::from_config(&config.camera, width, height), &config.lights);
    scene.set_camera_distance(params.column.height * config.camera.framing_factor);
    scene.attach(tower.column);
    scene.attach(tower.triangle);
    scene.attach(tower.block);
    Ok(scene)
}
