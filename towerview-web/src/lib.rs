/// Towerview Web - canvas tower viewer compiled to WASM
///
/// Mounts a viewer on a `<canvas>` element and drives it from
/// `requestAnimationFrame` until stopped or unmounted.
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use towerview_core::{
    stl, PrimitiveTowerParams, TickOutcome, TowerDataset, Viewer, ViewerConfig,
};

pub mod canvas;

pub use canvas::CanvasRenderer;

type FrameCallback = Closure<dyn FnMut()>;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn request_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())
}

#[wasm_bindgen]
pub struct TowerViewer {
    viewer: Rc<RefCell<Viewer<CanvasRenderer>>>,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

#[wasm_bindgen]
impl TowerViewer {
    /// Mount on the canvas with id `canvas_id` using the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<TowerViewer, JsValue> {
        Self::mount(canvas_id, ViewerConfig::default())
    }

    /// Mount with a TOML configuration
    pub fn with_config(canvas_id: &str, config_toml: &str) -> Result<TowerViewer, JsValue> {
        let config = ViewerConfig::from_toml_str(config_toml).map_err(js_error)?;
        Self::mount(canvas_id, config)
    }

    fn mount(canvas_id: &str, config: ViewerConfig) -> Result<TowerViewer, JsValue> {
        let document = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let (width, height) = (canvas.width(), canvas.height());
        let renderer = CanvasRenderer::new(canvas, context, config.render.background);
        let mut viewer = Viewer::new(config, renderer);
        viewer.mount(width, height);

        Ok(TowerViewer {
            viewer: Rc::new(RefCell::new(viewer)),
            frame: Rc::new(RefCell::new(None)),
            pending: Rc::new(Cell::new(None)),
        })
    }

    /// Show a tower dataset given as JSON
    pub fn load_dataset(&mut self, json: &str) -> Result<(), JsValue> {
        let dataset = TowerDataset::from_json_str(json).map_err(js_error)?;
        info!(
            "loading tower of {} ft with {} levels and {} devices",
            dataset.tower.height,
            dataset.levels.len(),
            dataset.devices.len()
        );
        self.viewer.borrow_mut().load_dataset(&dataset).map_err(js_error)
    }

    /// Show the primitive demo tower given as JSON
    pub fn load_primitive(&mut self, json: &str) -> Result<(), JsValue> {
        let params = PrimitiveTowerParams::from_json_str(json).map_err(js_error)?;
        self.viewer
            .borrow_mut()
            .load_primitive_tower(&params)
            .map_err(js_error)
    }

    /// Replace the tower column with an STL model (binary or ASCII bytes)
    pub fn load_model(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let mesh = stl::into_scene_frame(stl::parse_stl(bytes).map_err(js_error)?);
        self.viewer
            .borrow_mut()
            .set_tower_model(mesh)
            .map(|_| ())
            .map_err(js_error)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewer.borrow_mut().resize(width, height);
    }

    pub fn rotate(&mut self, left: f32, up: f32) {
        let mut viewer = self.viewer.borrow_mut();
        let controls = viewer.controls_mut();
        controls.rotate_left(left);
        controls.rotate_up(up);
    }

    /// Multiply the camera distance by `scale` (< 1 moves closer)
    pub fn zoom(&mut self, scale: f32) {
        self.viewer.borrow_mut().controls_mut().zoom(scale);
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.viewer.borrow_mut().controls_mut().auto_rotate = enabled;
    }

    pub fn is_running(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Start the render loop. The loop re-arms itself every frame while
    /// the viewer keeps returning `Continue`.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.is_running() {
            return Ok(());
        }

        let viewer = self.viewer.clone();
        let frame = self.frame.clone();
        let pending = self.pending.clone();
        let callback = Closure::wrap(Box::new(move || {
            pending.set(None);
            match viewer.borrow_mut().tick() {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Stop) => {
                    info!("render loop stopped");
                    return;
                }
                Err(e) => {
                    error!("render loop stopped: {}", e);
                    return;
                }
            }
            if let Some(callback) = frame.borrow().as_ref() {
                match request_frame(callback) {
                    Ok(id) => pending.set(Some(id)),
                    Err(e) => error!("failed to schedule frame: {:?}", e),
                }
            }
        }) as Box<dyn FnMut()>);

        let id = request_frame(&callback)?;
        *self.frame.borrow_mut() = Some(callback);
        self.pending.set(Some(id));
        Ok(())
    }

    /// Cancel the scheduled frame, if any
    pub fn stop(&mut self) -> Result<(), JsValue> {
        if let Some(id) = self.pending.take() {
            window()?.cancel_animation_frame(id)?;
        }
        Ok(())
    }

    /// Stop the loop and drop the scene
    pub fn unmount(&mut self) -> Result<(), JsValue> {
        self.stop()?;
        self.viewer.borrow_mut().unmount();
        // Breaks the callback -> frame -> callback cycle
        self.frame.borrow_mut().take();
        Ok(())
    }
}

impl Drop for TowerViewer {
    fn drop(&mut self) {
        if let Err(e) = self.unmount() {
            error!("failed to unmount viewer: {:?}", e);
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(js_error)?;
    Ok(())
}
