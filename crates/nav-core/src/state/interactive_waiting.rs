use std::sync::Arc;

use glam::DVec2;

use super::base::{StateCore, StateSnapshot};
use super::interactive::InteractiveSmoothing;
use super::State;
use crate::error::NavigationError;
use crate::node::Node;
use crate::rotation::RotationDelta;

/// Paused between two nodes while still accepting rotation and zoom.
///
/// Progress is scrubbed with `move_by`/`move_to` and never advances on its own.
#[derive(Clone, Debug)]
pub struct InteractiveWaitingState {
    core: StateCore,
    smoothing: InteractiveSmoothing,
}

impl InteractiveWaitingState {
    pub fn new(snapshot: &StateSnapshot) -> Result<Self, NavigationError> {
        let mut core = StateCore::new(snapshot)?;
        core.align_to_view();
        core.motionless = core.motionless_transition();
        let smoothing = InteractiveSmoothing::new(&core);
        Ok(Self { core, smoothing })
    }

    #[inline]
    pub fn smoothing(&self) -> &InteractiveSmoothing {
        &self.smoothing
    }

    fn trajectory_changed(&mut self) {
        self.core.set_current_camera();
        adjust_cameras(&mut self.core);
        self.core.motionless = self.core.motionless_transition();
    }
}

/// Carries the displayed look direction across full panorama cuts.
fn adjust_cameras(core: &mut StateCore) {
    let (Some(current), Some(previous)) = (core.current_node(), core.previous_node()) else {
        return;
    };
    let (current_full, previous_full) = (current.full_pano, previous.full_pano);

    if current_full {
        let direction = core.camera.lookat - core.camera.position;
        core.current_camera.lookat = core.current_camera.position + direction;
    }
    if previous_full {
        let direction = core.current_camera.lookat - core.current_camera.position;
        core.previous_camera.lookat = core.previous_camera.position + direction;
    }
}

impl State for InteractiveWaitingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn alpha(&self) -> f64 {
        if self.core.motionless {
            self.core.alpha.round()
        } else {
            self.core.alpha
        }
    }

    fn append(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        let was_empty = self.core.trajectory().is_empty();
        self.core.append(nodes)?;
        if was_empty {
            self.trajectory_changed();
        }
        Ok(())
    }

    fn prepend(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.core.prepend(nodes)?;
        self.trajectory_changed();
        Ok(())
    }

    fn set(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.core.set(nodes)?;
        self.trajectory_changed();
        Ok(())
    }

    fn move_by(&mut self, delta: f64) {
        self.core.alpha = (self.core.alpha + delta).clamp(0.0, 1.0);
    }

    fn move_to(&mut self, position: f64) {
        self.core.alpha = position.clamp(0.0, 1.0);
    }

    fn update(&mut self, fps: f64) {
        self.smoothing.integrate(&mut self.core, fps);
        let alpha = self.alpha();
        self.core.blend_camera(alpha);
    }

    fn rotate(&mut self, delta: RotationDelta) {
        self.smoothing.rotate(&self.core, delta);
    }

    fn rotate_unbounded(&mut self, delta: RotationDelta) {
        self.smoothing.rotate_unbounded(&mut self.core, delta);
    }

    fn rotate_without_inertia(&mut self, delta: RotationDelta) {
        self.smoothing.rotate_without_inertia(&mut self.core, delta);
    }

    fn rotate_basic(&mut self, basic: DVec2) {
        self.smoothing.rotate_basic(&self.core, basic);
    }

    fn rotate_basic_unbounded(&mut self, basic: DVec2) {
        self.smoothing.rotate_basic_unbounded(&self.core, basic);
    }

    fn rotate_basic_without_inertia(&mut self, basic: DVec2) {
        self.smoothing.rotate_basic_without_inertia(&mut self.core, basic);
    }

    fn rotate_to_basic(&mut self, basic: DVec2) {
        self.smoothing.rotate_to_basic(&mut self.core, basic);
    }

    fn zoom_in(&mut self, delta: f64, reference: DVec2) {
        self.smoothing.zoom_in(&self.core, delta, reference);
    }

    fn set_center(&mut self, center: DVec2) {
        self.smoothing.set_center(&mut self.core, center);
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.smoothing.set_zoom(&mut self.core, zoom);
    }

    fn desired_zoom(&self) -> f64 {
        self.smoothing.desired_zoom()
    }
}
