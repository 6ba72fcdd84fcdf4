/// Scene manager
///
/// Tracks which tower and which devices are on display and keeps that record
/// in lockstep with the backend: every tracked id is attached, every attached
/// tower/device id is tracked.
use log::{debug, info, warn};

use crate::components::{device_renderable, level_renderable, tower_renderable};
use crate::error::{GeometryError, SceneError};
use crate::model::{Device, Level};
use crate::placement::Placement;
use crate::scene::{Renderable, RenderableId, SceneBackend};

#[derive(Debug, Clone, Copy, PartialEq)]
struct TowerSlot {
    id: RenderableId,
    extent: f32,
}

pub struct SceneManager<B: SceneBackend> {
    backend: B,
    placement: Placement,
    framing_factor: f32,
    tower: Option<TowerSlot>,
    devices: Vec<RenderableId>,
}

impl<B: SceneBackend> SceneManager<B> {
    pub fn new(backend: B, placement: Placement, framing_factor: f32) -> Self {
        Self {
            backend,
            placement,
            framing_factor,
            tower: None,
            devices: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn tower(&self) -> Option<RenderableId> {
        self.tower.map(|slot| slot.id)
    }

    /// Vertical extent of the current tower
    pub fn tower_height(&self) -> Option<f32> {
        self.tower.map(|slot| slot.extent)
    }

    /// Tracked devices in insertion order
    pub fn devices(&self) -> &[RenderableId] {
        &self.devices
    }

    /// Replace the tower and frame the camera around it
    pub fn set_tower(&mut self, tower: Renderable) -> RenderableId {
        if let Some(previous) = self.tower.take() {
            self.backend.detach(previous.id);
        }

        let slot = TowerSlot {
            id: tower.id(),
            extent: tower.vertical_extent(),
        };
        self.backend.attach(tower);
        self.backend.set_camera_distance(slot.extent * self.framing_factor);
        self.tower = Some(slot);
        debug!("tower {} set, extent {}", slot.id, slot.extent);
        slot.id
    }

    pub fn add_device(&mut self, device: Renderable) -> RenderableId {
        let id = device.id();
        self.devices.push(id);
        self.backend.attach(device);
        id
    }

    /// Remove a tracked device. Unknown ids leave the scene untouched.
    pub fn remove_device(&mut self, id: RenderableId) -> Result<Renderable, SceneError> {
        let Some(index) = self.devices.iter().position(|tracked| *tracked == id) else {
            warn!("remove_device: {} is not tracked", id);
            return Err(SceneError::DeviceNotFound(id));
        };
        self.devices.remove(index);
        self.backend.detach(id).ok_or(SceneError::DeviceNotFound(id))
    }

    /// Detach and forget every device
    pub fn clear_devices(&mut self) {
        for id in self.devices.drain(..) {
            self.backend.detach(id);
        }
    }

    /// Rebuild the whole tower from records.
    ///
    /// All renderables are built before the scene is touched, so invalid
    /// input leaves the current scene as it was.
    pub fn refresh_components(
        &mut self,
        tower_height: f32,
        levels: &[Level],
        devices: &[Device],
    ) -> Result<(), GeometryError> {
        let tower = tower_renderable(&self.placement, tower_height)?;
        let rings = levels
            .iter()
            .map(|level| level_renderable(&self.placement, tower_height, level))
            .collect::<Result<Vec<_>, _>>()?;
        let boxes = devices
            .iter()
            .map(|device| device_renderable(&self.placement, tower_height, device))
            .collect::<Result<Vec<_>, _>>()?;

        self.clear_devices();
        self.set_tower(tower);
        for renderable in rings.into_iter().chain(boxes) {
            self.add_device(renderable);
        }

        info!(
            "tower of {} ft refreshed with {} levels and {} devices",
            tower_height,
            levels.len(),
            devices.len()
        );
        Ok(())
    }
}
