/// Scene graph: attached renderables, lights and the camera
///
/// [`SceneBackend`] is the surface the scene manager drives. [`Scene`] is the
/// in-process implementation both hosts draw from.
use nalgebra::{Point3, Vector3};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::Rgb;
use crate::config::{LightConfig, LightsConfig};
use crate::geometry::Mesh;
use crate::projection::{Camera, ScreenPoint};
use crate::transform::Transform;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a renderable. Two renderables built from equal inputs still
/// have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableId(u64);

impl RenderableId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RenderableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a renderable stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderableKind {
    Tower,
    Level,
    Device,
    Primitive,
}

/// Mesh + color + transform, attachable to a scene
#[derive(Debug, Clone)]
pub struct Renderable {
    id: RenderableId,
    pub kind: RenderableKind,
    pub mesh: Mesh,
    pub color: Rgb,
    pub position: Point3<f32>,
    /// Rotation around the vertical axis, radians
    pub yaw: f32,
}

impl Renderable {
    pub fn new(kind: RenderableKind, mesh: Mesh, color: Rgb) -> Self {
        Self {
            id: RenderableId::next(),
            kind,
            mesh,
            color,
            position: Point3::origin(),
            yaw: 0.0,
        }
    }

    pub fn at(mut self, position: Point3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn turned(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn id(&self) -> RenderableId {
        self.id
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Point3::new(x, y, z);
    }

    pub fn vertical_extent(&self) -> f32 {
        self.mesh.vertical_extent()
    }
}

/// Capabilities the scene manager needs from a rendering engine
pub trait SceneBackend {
    fn attach(&mut self, renderable: Renderable);

    /// Remove a renderable, returning it if it was attached
    fn detach(&mut self, id: RenderableId) -> Option<Renderable>;

    fn is_attached(&self, id: RenderableId) -> bool;

    fn set_camera_distance(&mut self, distance: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Point { position: Point3<f32> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Rgb,
    pub intensity: f32,
}

impl Light {
    pub fn ambient(config: &LightConfig) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: config.color,
            intensity: config.intensity,
        }
    }

    pub fn point(config: &LightConfig) -> Self {
        let [x, y, z] = config.position;
        Self {
            kind: LightKind::Point {
                position: Point3::new(x, y, z),
            },
            color: config.color,
            intensity: config.intensity,
        }
    }
}

/// A triangle ready for rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [ScreenPoint; 3],
    pub color: Rgb,
    /// Lambert shading factor in `[0, 1]`
    pub brightness: f32,
}

impl ScreenTriangle {
    pub fn mean_depth(&self) -> f32 {
        self.points.iter().map(|p| p.depth).sum::<f32>() / 3.0
    }
}

/// The live scene
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<Renderable>,
    lights: Vec<Light>,
    camera: Camera,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            camera,
        }
    }

    /// Scene with the configured ambient and point lights
    pub fn lit(camera: Camera, lights: &LightsConfig) -> Self {
        let mut scene = Self::new(camera);
        scene.add_light(Light::ambient(&lights.ambient));
        scene.add_light(Light::point(&lights.point));
        scene
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Attached renderables in attach order
    pub fn objects(&self) -> &[Renderable] {
        &self.objects
    }

    pub fn get(&self, id: RenderableId) -> Option<&Renderable> {
        self.objects.iter().find(|r| r.id() == id)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Lambert shading for a world-space normal. Point lights are treated as
    /// directional from their position towards the origin.
    pub fn brightness(&self, normal: &Vector3<f32>) -> f32 {
        let total: f32 = self
            .lights
            .iter()
            .map(|light| match light.kind {
                LightKind::Ambient => light.intensity,
                LightKind::Point { position } => {
                    let direction = position.coords.try_normalize(f32::EPSILON);
                    direction.map_or(0.0, |d| normal.dot(&d).max(0.0) * light.intensity)
                }
            })
            .sum();
        total.clamp(0.0, 1.0)
    }

    /// Project every attached triangle onto a `width` x `height` surface.
    /// Faces with no area and faces with a vertex behind the eye are skipped.
    pub fn project(&self, width: u32, height: u32) -> Vec<ScreenTriangle> {
        let view_projection = self.camera.view_projection();
        let mut out = Vec::new();

        for object in &self.objects {
            let model = Transform::model_matrix(&object.position, object.yaw);
            let mvp = view_projection * model;
            let turn = Transform::yaw_matrix(object.yaw);

            for triangle in &object.mesh.triangles {
                let Some(normal) = triangle.face_normal() else {
                    continue;
                };
                let mut points = [ScreenPoint { x: 0.0, y: 0.0, depth: 0.0 }; 3];
                let projected = triangle.vertices.iter().zip(points.iter_mut()).all(|(v, slot)| {
                    match Camera::project_with(&mvp, &v.position, width, height) {
                        Some(p) => {
                            *slot = p;
                            true
                        }
                        None => false,
                    }
                });
                if !projected {
                    continue;
                }
                let world_normal = turn.transform_vector(&normal);
                out.push(ScreenTriangle {
                    points,
                    color: object.color,
                    brightness: self.brightness(&world_normal),
                });
            }
        }

        out
    }
}

impl SceneBackend for Scene {
    fn attach(&mut self, renderable: Renderable) {
        log::debug!("attach {:?} {}", renderable.kind, renderable.id());
        self.objects.push(renderable);
    }

    fn detach(&mut self, id: RenderableId) -> Option<Renderable> {
        let index = self.objects.iter().position(|r| r.id() == id)?;
        log::debug!("detach {}", id);
        Some(self.objects.remove(index))
    }

    fn is_attached(&self, id: RenderableId) -> bool {
        self.objects.iter().any(|r| r.id() == id)
    }

    fn set_camera_distance(&mut self, distance: f32) {
        self.camera.set_distance(distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scene() -> Scene {
        Scene::lit(Camera::new(80, 40), &LightsConfig::default())
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Renderable::new(RenderableKind::Device, Mesh::cube(1.0), Rgb::WHITE);
        let b = Renderable::new(RenderableKind::Device, Mesh::cube(1.0), Rgb::WHITE);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_attach_detach() {
        let mut scene = scene();
        let cube = Renderable::new(RenderableKind::Primitive, Mesh::cube(1.0), Rgb::WHITE);
        let id = cube.id();
        scene.attach(cube);
        assert!(scene.is_attached(id));
        assert_eq!(scene.detach(id).map(|r| r.id()), Some(id));
        assert!(!scene.is_attached(id));
        assert!(scene.detach(id).is_none());
    }

    #[test]
    fn test_brightness_is_clamped() {
        let scene = scene();
        let towards_light = Vector3::new(100.0, 200.0, 100.0).normalize();
        assert_relative_eq!(scene.brightness(&towards_light), 1.0);
        assert_relative_eq!(scene.brightness(&-towards_light), 0.5);
    }

    #[test]
    fn test_project_visible_cube() {
        let mut scene = scene();
        scene.camera_mut().set_distance(5.0);
        scene.attach(Renderable::new(RenderableKind::Primitive, Mesh::cube(1.0), Rgb(0x00ff00)));
        let triangles = scene.project(80, 40);
        assert_eq!(triangles.len(), 12);
        assert!(triangles.iter().all(|t| t.color == Rgb(0x00ff00)));
    }

    #[test]
    fn test_project_skips_zero_size_box() {
        let mut scene = scene();
        scene.attach(Renderable::new(RenderableKind::Device, Mesh::cuboid(0.0, 0.0, 0.0), Rgb::WHITE));
        assert!(scene.project(80, 40).is_empty());
    }
}
