/// Viewer lifecycle and the render loop tick
///
/// A host mounts the viewer on a surface, feeds it tower data, and calls
/// [`Viewer::tick`] once per frame for as long as it returns
/// [`TickOutcome::Continue`].
use log::info;

use crate::config::ViewerConfig;
use crate::error::{GeometryError, ViewerError};
use crate::geometry::Mesh;
use crate::manager::SceneManager;
use crate::model::{Device, Level, TowerDataset};
use crate::placement::Placement;
use crate::primitives::{build_primitive_tower, PrimitiveTowerParams};
use crate::projection::Camera;
use crate::scene::{Renderable, RenderableId, RenderableKind, Scene};
use crate::transform::OrbitControls;

/// Draws a scene onto a host surface
pub trait FrameRenderer {
    type Error: std::fmt::Display;

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn render(&mut self, scene: &Scene) -> Result<(), Self::Error>;
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

pub struct Viewer<R: FrameRenderer> {
    config: ViewerConfig,
    renderer: R,
    controls: OrbitControls,
    manager: Option<SceneManager<Scene>>,
    torn_down: bool,
}

impl<R: FrameRenderer> Viewer<R> {
    pub fn new(config: ViewerConfig, renderer: R) -> Self {
        let mut controls = OrbitControls::new();
        controls.auto_rotate = config.render.auto_rotate;
        controls.min_distance = config.camera.near;
        controls.max_distance = config.camera.far;
        Self {
            config,
            renderer,
            controls,
            manager: None,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Build the scene for a `width` x `height` surface. Mounting an
    /// already mounted viewer only resizes it.
    pub fn mount(&mut self, width: u32, height: u32) {
        if self.manager.is_some() {
            self.resize(width, height);
            return;
        }
        let camera = Camera::from_config(&self.config.camera, width, height);
        let scene = Scene::lit(camera, &self.config.lights);
        self.manager = Some(SceneManager::new(
            scene,
            Placement::new(self.config.placement.clone()),
            self.config.camera.framing_factor,
        ));
        self.renderer.resize(width, height);
        self.torn_down = false;
        info!("viewer mounted on {}x{} surface", width, height);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(manager) = self.manager.as_mut() {
            manager.backend_mut().camera_mut().resize(width, height);
        }
        self.renderer.resize(width, height);
    }

    /// Drop the scene. Later ticks return [`TickOutcome::Stop`].
    pub fn unmount(&mut self) {
        if self.manager.take().is_some() {
            info!("viewer unmounted");
        }
        self.torn_down = true;
    }

    pub fn is_mounted(&self) -> bool {
        self.manager.is_some()
    }

    pub fn manager(&self) -> Result<&SceneManager<Scene>, ViewerError> {
        self.manager.as_ref().ok_or(ViewerError::NotMounted)
    }

    pub fn manager_mut(&mut self) -> Result<&mut SceneManager<Scene>, ViewerError> {
        self.manager.as_mut().ok_or(ViewerError::NotMounted)
    }

    pub fn scene(&self) -> Result<&Scene, ViewerError> {
        Ok(self.manager()?.backend())
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Replace the tower. A tower with no vertical extent cannot be framed
    /// and is rejected.
    pub fn set_tower(&mut self, tower: Renderable) -> Result<RenderableId, ViewerError> {
        let extent = tower.vertical_extent();
        if !(extent.is_finite() && extent > 0.0) {
            return Err(GeometryError::invalid(format!(
                "tower must have a positive height, got {extent}"
            ))
            .into());
        }
        Ok(self.manager_mut()?.set_tower(tower))
    }

    /// Use an arbitrary mesh (a loaded model) as the tower
    pub fn set_tower_model(&mut self, mesh: Mesh) -> Result<RenderableId, ViewerError> {
        let color = self.config.placement.tower_color;
        self.set_tower(Renderable::new(RenderableKind::Tower, mesh, color))
    }

    pub fn add_device(&mut self, device: Renderable) -> Result<RenderableId, ViewerError> {
        Ok(self.manager_mut()?.add_device(device))
    }

    pub fn remove_device(&mut self, id: RenderableId) -> Result<Renderable, ViewerError> {
        Ok(self.manager_mut()?.remove_device(id)?)
    }

    pub fn refresh_components(
        &mut self,
        tower_height: f32,
        levels: &[Level],
        devices: &[Device],
    ) -> Result<(), ViewerError> {
        Ok(self
            .manager_mut()?
            .refresh_components(tower_height, levels, devices)?)
    }

    pub fn load_dataset(&mut self, dataset: &TowerDataset) -> Result<(), ViewerError> {
        self.refresh_components(dataset.tower.height, &dataset.levels, &dataset.devices)
    }

    /// Show the column + triangle + box demo tower
    pub fn load_primitive_tower(&mut self, params: &PrimitiveTowerParams) -> Result<(), ViewerError> {
        let primitive = build_primitive_tower(params, self.config.placement.radial_segments)?;
        let manager = self.manager_mut()?;
        manager.clear_devices();
        manager.set_tower(primitive.column);
        manager.add_device(primitive.triangle);
        manager.add_device(primitive.block);
        Ok(())
    }

    /// One frame: apply orbit input, then draw
    pub fn tick(&mut self) -> Result<TickOutcome, ViewerError> {
        if self.torn_down {
            return Ok(TickOutcome::Stop);
        }
        let manager = self.manager.as_mut().ok_or(ViewerError::NotMounted)?;
        let scene = manager.backend_mut();
        self.controls.update(scene.camera_mut());
        self.renderer
            .render(scene)
            .map_err(|e| ViewerError::Render(e.to_string()))?;
        Ok(TickOutcome::Continue)
    }
}
