#![cfg(target_arch = "wasm32")]
//! WebAssembly binding of the navigation state machine.
//!
//! JavaScript owns the render loop and the node cache. It hands cached nodes
//! over as JSON, forwards input, calls `tick` once per animation frame and
//! reads the camera pose back.

use std::sync::Arc;

use anyhow::Context;
use glam::{DVec2, DVec3};
use instant::Instant;
use js_sys::Float64Array;
use nav_core::{
    NavigationError, NavigationParams, NavigationState, Node, RotationDelta, StateSnapshot,
    TransitionMode,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("nav-web starting");
    Ok(())
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_nodes(json: &str) -> anyhow::Result<Vec<Arc<Node>>> {
    let nodes: Vec<Node> = serde_json::from_str(json).context("parsing node list")?;
    Ok(nodes.into_iter().map(Arc::new).collect())
}

fn parse_params(json: Option<String>) -> anyhow::Result<NavigationParams> {
    match json.as_deref() {
        None | Some("") => Ok(NavigationParams::default()),
        Some(json) => serde_json::from_str(json).context("parsing navigation params"),
    }
}

#[wasm_bindgen]
pub struct WebNavigator {
    state: NavigationState,
    last_tick: Option<Instant>,
}

#[wasm_bindgen]
impl WebNavigator {
    #[wasm_bindgen(constructor)]
    pub fn new(params_json: Option<String>) -> Result<WebNavigator, JsValue> {
        let params = parse_params(params_json).map_err(|e| to_js(format!("{:#}", e)))?;
        let snapshot = StateSnapshot::initial(TransitionMode::Default, params);
        let state = NavigationState::new(&snapshot).map_err(to_js)?;
        Ok(WebNavigator {
            state,
            last_tick: None,
        })
    }

    // ---------------- Trajectory ----------------

    pub fn append(&mut self, nodes_json: &str) -> Result<(), JsValue> {
        let nodes = parse_nodes(nodes_json).map_err(|e| to_js(format!("{:#}", e)))?;
        self.state.append(nodes).map_err(to_js)
    }

    pub fn prepend(&mut self, nodes_json: &str) -> Result<(), JsValue> {
        let nodes = parse_nodes(nodes_json).map_err(|e| to_js(format!("{:#}", e)))?;
        self.state.prepend(nodes).map_err(to_js)
    }

    pub fn set(&mut self, nodes_json: &str) -> Result<(), JsValue> {
        let nodes = parse_nodes(nodes_json).map_err(|e| to_js(format!("{:#}", e)))?;
        self.state.set(nodes).map_err(to_js)
    }

    pub fn remove(&mut self, count: i32) -> Result<(), JsValue> {
        let count = usize::try_from(count)
            .map_err(|_| to_js(NavigationError::negative_removal(count as i64)))?;
        self.state.remove(count).map_err(to_js)
    }

    pub fn cut(&mut self) {
        self.state.cut();
    }

    pub fn clear_prior(&mut self) -> Result<(), JsValue> {
        self.state.clear_prior().map_err(to_js)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.state.clear().map_err(to_js)
    }

    // ---------------- Playback ----------------

    pub fn move_by(&mut self, delta: f64) {
        self.state.move_by(delta);
    }

    pub fn move_to(&mut self, position: f64) {
        self.state.move_to(position);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.state.set_speed(speed);
    }

    pub fn set_transition_mode(&mut self, instantaneous: bool) {
        let mode = if instantaneous {
            TransitionMode::Instantaneous
        } else {
            TransitionMode::Default
        };
        self.state.set_transition_mode(mode);
    }

    pub fn update(&mut self, fps: f64) {
        self.state.update(fps);
    }

    /// Advances one frame, deriving the frame rate from wall-clock time.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let fps = match self.last_tick {
            Some(last) => {
                let dt = (now - last).as_secs_f64();
                if dt > 0.0 {
                    1.0 / dt
                } else {
                    nav_core::constants::REFERENCE_FPS
                }
            }
            None => nav_core::constants::REFERENCE_FPS,
        };
        self.last_tick = Some(now);
        self.state.update(fps);
    }

    // ---------------- Input ----------------

    pub fn rotate(&mut self, phi: f64, theta: f64) {
        self.state.rotate(RotationDelta::new(phi, theta));
    }

    pub fn rotate_unbounded(&mut self, phi: f64, theta: f64) {
        self.state.rotate_unbounded(RotationDelta::new(phi, theta));
    }

    pub fn rotate_without_inertia(&mut self, phi: f64, theta: f64) {
        self.state.rotate_without_inertia(RotationDelta::new(phi, theta));
    }

    pub fn rotate_basic(&mut self, x: f64, y: f64) {
        self.state.rotate_basic(DVec2::new(x, y));
    }

    pub fn rotate_basic_unbounded(&mut self, x: f64, y: f64) {
        self.state.rotate_basic_unbounded(DVec2::new(x, y));
    }

    pub fn rotate_basic_without_inertia(&mut self, x: f64, y: f64) {
        self.state.rotate_basic_without_inertia(DVec2::new(x, y));
    }

    pub fn rotate_to_basic(&mut self, x: f64, y: f64) {
        self.state.rotate_to_basic(DVec2::new(x, y));
    }

    pub fn zoom_in(&mut self, delta: f64, reference_x: f64, reference_y: f64) {
        self.state.zoom_in(delta, DVec2::new(reference_x, reference_y));
    }

    pub fn set_center(&mut self, x: f64, y: f64) {
        self.state.set_center(DVec2::new(x, y));
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.state.set_zoom(zoom);
    }

    pub fn dolly(&mut self, delta: f64) {
        self.state.dolly(delta);
    }

    pub fn orbit(&mut self, phi: f64, theta: f64) {
        self.state.orbit(RotationDelta::new(phi, theta));
    }

    pub fn truck(&mut self, x: f64, y: f64, z: f64) {
        self.state.truck(DVec3::new(x, y, z));
    }

    // ---------------- Transitions ----------------

    pub fn traverse(&mut self) -> Result<(), JsValue> {
        self.state = self.state.traverse().map_err(to_js)?;
        Ok(())
    }

    pub fn wait(&mut self) -> Result<(), JsValue> {
        self.state = self.state.wait().map_err(to_js)?;
        Ok(())
    }

    pub fn wait_interactively(&mut self) -> Result<(), JsValue> {
        self.state = self.state.wait_interactively().map_err(to_js)?;
        Ok(())
    }

    pub fn earth(&mut self) -> Result<(), JsValue> {
        self.state = self.state.earth().map_err(to_js)?;
        Ok(())
    }

    // ---------------- Queries ----------------

    pub fn alpha(&self) -> f64 {
        self.state.alpha()
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom()
    }

    pub fn current_index(&self) -> Option<u32> {
        self.state.current_index().map(|i| i as u32)
    }

    pub fn current_node_id(&self) -> Option<String> {
        self.state.current_node().map(|n| n.id.clone())
    }

    pub fn previous_node_id(&self) -> Option<String> {
        self.state.previous_node().map(|n| n.id.clone())
    }

    pub fn motionless(&self) -> bool {
        self.state.motionless()
    }

    pub fn state_kind(&self) -> String {
        format!("{:?}", self.state.kind())
    }

    /// Basic coordinate `[x, y]` of the view center in the current image.
    pub fn center(&self) -> Float64Array {
        let center = self.state.get_center();
        Float64Array::from(&center.to_array()[..])
    }

    /// Column-major world to view matrix of the current camera.
    pub fn view_matrix(&self) -> Float64Array {
        let matrix = self.state.camera().view_matrix();
        Float64Array::from(&matrix.to_cols_array()[..])
    }

    /// `[position, lookat, up]` flattened to nine values.
    pub fn camera_pose(&self) -> Float64Array {
        let camera = self.state.camera();
        let mut pose = [0.0; 9];
        pose[..3].copy_from_slice(&camera.position.to_array());
        pose[3..6].copy_from_slice(&camera.lookat.to_array());
        pose[6..].copy_from_slice(&camera.up.to_array());
        Float64Array::from(&pose[..])
    }
}
