/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;
use crate::transform::Transform;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A vertex after projection: pixel coordinates plus NDC depth in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_config(&CameraConfig::default(), width, height)
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, config.default_distance),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: config.fov_deg.to_radians(),
            aspect: aspect_ratio(width, height),
            near: config.near,
            far: config.far,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Update the aspect ratio for a new surface size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Distance from the eye to the target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Move the eye along its current viewing direction so it sits `distance`
    /// away from the target. A camera sitting on its target backs off along +Z.
    pub fn set_distance(&mut self, distance: f32) {
        let direction = (self.position - self.target)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);
        self.position = self.target + direction * distance;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.distance();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Combined projection * view matrix
    pub fn view_projection(&self) -> Matrix4<f32> {
        Transform::mvp_matrix(&Matrix4::identity(), &self.view_matrix(), &self.projection_matrix())
    }

    /// Project a point through a precomputed model-view-projection matrix.
    ///
    /// Points behind the eye or outside the depth range yield `None`. Points
    /// off the sides of the surface are kept so partly visible triangles can
    /// still be clipped by the rasterizer.
    pub fn project_with(
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let clip = mvp * point.to_homogeneous();

        if clip.w.abs() < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if clip.w < 0.0 || !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc_y) * 0.5 * height as f32,
            depth,
        })
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let mvp = Transform::mvp_matrix(model_matrix, &self.view_matrix(), &self.projection_matrix());
        Self::project_with(&mvp, point, width, height)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_relative_eq!(camera.fov, 45f32.to_radians());
        assert_relative_eq!(camera.position.z, 100.0);
    }

    #[test]
    fn test_zero_height_surface_has_finite_aspect() {
        let camera = Camera::new(800, 0);
        assert!(camera.aspect.is_finite());
    }

    #[test]
    fn test_set_distance_keeps_direction() {
        let mut camera = Camera::new(800, 600);
        camera.position = Point3::new(3.0, 0.0, 4.0);
        camera.set_distance(10.0);
        assert_relative_eq!(camera.position.x, 6.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(800, 600);
        let p = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert_relative_eq!(p.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(800, 600);
        let behind = Point3::new(0.0, 0.0, 200.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_higher_points_land_higher_on_screen() {
        let camera = Camera::new(800, 600);
        let identity = Matrix4::identity();
        let low = camera.project_to_screen(&Point3::new(0.0, -10.0, 0.0), &identity, 800, 600).unwrap();
        let high = camera.project_to_screen(&Point3::new(0.0, 10.0, 0.0), &identity, 800, 600).unwrap();
        assert!(high.y < low.y);
    }
}
