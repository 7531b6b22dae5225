use std::sync::Arc;

use glam::DVec2;

use super::base::{StateCore, StateSnapshot};
use super::interactive::InteractiveSmoothing;
use super::State;
use crate::constants::{BEZIER_CONTROL_POINTS, BEZIER_TRAJECTORY_LENGTH, MAX_SPEED, MIN_SPEED};
use crate::error::NavigationError;
use crate::node::Node;
use crate::rotation::RotationDelta;

/// Plays the trajectory, advancing to the next node whenever a transition
/// completes.
#[derive(Clone, Debug)]
pub struct TraversingState {
    core: StateCore,
    smoothing: InteractiveSmoothing,
    base_alpha: f64,
    speed_coefficient: f64,
    use_bezier: bool,
}

impl TraversingState {
    pub fn new(snapshot: &StateSnapshot) -> Result<Self, NavigationError> {
        let mut core = StateCore::new(snapshot)?;
        core.align_to_view();
        core.motionless = core.motionless_transition();
        let smoothing = InteractiveSmoothing::new(&core);
        // Resume from the carried progress so the switch itself never jumps.
        let base_alpha = core.alpha;
        Ok(Self {
            core,
            smoothing,
            base_alpha,
            speed_coefficient: 1.0,
            use_bezier: false,
        })
    }

    /// Linear transition progress before easing.
    #[inline]
    pub fn base_alpha(&self) -> f64 {
        self.base_alpha
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed_coefficient
    }

    #[inline]
    pub fn smoothing(&self) -> &InteractiveSmoothing {
        &self.smoothing
    }

    /// Restarts the transition into the current node.
    ///
    /// A node without predecessor has nothing to animate and starts settled.
    fn reset_transition(&mut self) {
        let alpha = if self.core.previous_node().is_some() {
            0.0
        } else {
            1.0
        };
        self.core.alpha = alpha;
        self.base_alpha = alpha;
        self.core.motionless = self.core.motionless_transition();
    }

    fn start_trajectory(&mut self) {
        self.reset_transition();
        self.smoothing.set_desired_center(&mut self.core);
        self.smoothing.set_desired_zoom(&self.core);
        self.use_bezier = self.core.trajectory().len() < BEZIER_TRAJECTORY_LENGTH;
    }

    fn eased(&self) -> f64 {
        if !self.use_bezier {
            return self.base_alpha;
        }
        ease_in_out(self.base_alpha)
    }
}

fn ease_in_out(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let [x1, y1, x2, y2] = BEZIER_CONTROL_POINTS;
    bezier_easing::bezier_easing(x1, y1, x2, y2)
        .map(|curve| (curve(x as f32) as f64).clamp(0.0, 1.0))
        .unwrap_or(x)
}

impl State for TraversingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn alpha(&self) -> f64 {
        if self.core.motionless {
            self.core.alpha.ceil()
        } else {
            self.core.alpha
        }
    }

    fn append(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        let was_empty = self.core.trajectory().is_empty();
        self.core.append(nodes)?;
        if was_empty {
            self.start_trajectory();
        }
        Ok(())
    }

    fn prepend(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        let was_empty = self.core.trajectory().is_empty();
        self.core.prepend(nodes)?;
        if was_empty {
            self.start_trajectory();
        }
        Ok(())
    }

    fn set(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.core.set(nodes)?;
        self.smoothing.clear_desired_lookat();
        self.smoothing.clear_rotation(&self.core);
        self.start_trajectory();
        Ok(())
    }

    fn set_speed(&mut self, speed: f64) {
        self.speed_coefficient = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    fn update(&mut self, fps: f64) {
        if self.base_alpha >= 1.0 && self.core.advance() {
            let len = self.core.trajectory().len();
            self.use_bezier =
                len < BEZIER_TRAJECTORY_LENGTH && self.core.current_index() == Some(len - 1);
            self.reset_transition();
            self.smoothing.clear_rotation(&self.core);
            self.smoothing.set_desired_zoom(&self.core);
            self.smoothing.clear_desired_lookat();
        }

        let frame_speed = self.core.params.frame_speed(fps);
        self.base_alpha = (self.base_alpha + self.speed_coefficient * frame_speed).min(1.0);
        self.core.alpha = self.eased();

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
