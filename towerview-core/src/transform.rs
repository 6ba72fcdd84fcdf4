/// Model transforms and orbit camera controls
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::PI;

use crate::projection::Camera;

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation around the vertical axis
    pub fn yaw_matrix(yaw: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, yaw, 0.0))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Model matrix of an object placed at `position` and turned by `yaw`
    pub fn model_matrix(position: &Point3<f32>, yaw: f32) -> Matrix4<f32> {
        Self::translation_matrix(position.x, position.y, position.z) * Self::yaw_matrix(yaw)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

/// Keeps the polar angle away from the poles so `look_at` stays defined
const POLAR_MARGIN: f32 = 1e-3;

/// Orbit navigation around the camera target.
///
/// Input accumulates as pending deltas; `update` applies them to the camera
/// once per frame. The current distance is read back from the camera each
/// time, so framing changes made elsewhere (a new tower) are kept.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,
    pub auto_rotate: bool,
    /// Radians per update while auto-rotating
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 1.0,
            auto_rotate: false,
            auto_rotate_speed: 0.01,
            min_distance: 0.1,
            max_distance: f32::INFINITY,
        }
    }

    /// Orbit horizontally by `angle` radians
    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_azimuth += angle;
    }

    /// Orbit vertically by `angle` radians
    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_polar -= angle;
    }

    /// Multiply the camera distance by `scale` (< 1 moves closer)
    pub fn zoom(&mut self, scale: f32) {
        if scale > 0.0 {
            self.pending_zoom *= scale;
        }
    }

    /// Apply pending input to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            self.reset_pending();
            return false;
        }

        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        if self.auto_rotate {
            azimuth += self.auto_rotate_speed;
        }
        azimuth += self.pending_azimuth;
        polar = (polar + self.pending_polar).clamp(POLAR_MARGIN, PI - POLAR_MARGIN);
        let distance = (radius * self.pending_zoom).clamp(self.min_distance, self.max_distance);

        let moved = self.auto_rotate
            || self.pending_azimuth != 0.0
            || self.pending_polar != 0.0
            || self.pending_zoom != 1.0;
        self.reset_pending();

        let new_offset = Vector3::new(
            distance * polar.sin() * azimuth.sin(),
            distance * polar.cos(),
            distance * polar.sin() * azimuth.cos(),
        );
        camera.position = camera.target + new_offset;
        moved
    }

    fn reset_pending(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_zoom = 1.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
