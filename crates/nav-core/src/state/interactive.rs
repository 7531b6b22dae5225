//! Rotation, pan and zoom smoothing for the states that accept user input.
//!
//! `InteractiveSmoothing` does not own the trajectory; every operation takes
//! the [`StateCore`] it acts on. Input handlers only record intent (pending
//! motion, desired zoom, desired look-at) while [`InteractiveSmoothing::integrate`]
//! turns that intent into camera motion once per frame.

use std::f64::consts::PI;

use glam::{DVec2, DVec3};

use super::base::StateCore;
use crate::constants::{
    ANGULAR_BOUND_DIVISOR, FULL_PANO_Y_MARGIN, LOOKAT_RATE, LOOKAT_SNAP_SQUARED, ZOOM_RATE,
    ZOOM_SNAP,
};
use crate::geo::{rotate_about_up, wrap, Camera, Transform};
use crate::node::Node;
use crate::rotation::RotationDelta;
use crate::smoothing::MotionBuffer;

/// How a basic center is kept inside an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CenterPolicy {
    /// X wraps around the sphere, Y stays clear of the poles.
    FullPano,
    /// Cropped panorama spanning the full horizon: X wraps, Y clamps.
    FullWidthCrop,
    /// X and Y clamp to the image.
    Rectilinear,
}

impl CenterPolicy {
    pub fn of(node: &Node, transform: &Transform) -> Self {
        if node.full_pano {
            CenterPolicy::FullPano
        } else if transform.has_full_width_crop() {
            CenterPolicy::FullWidthCrop
        } else {
            CenterPolicy::Rectilinear
        }
    }

    #[inline]
    pub fn wraps(self) -> bool {
        self != CenterPolicy::Rectilinear
    }

    pub fn constrain(self, basic: DVec2) -> DVec2 {
        match self {
            CenterPolicy::FullPano => DVec2::new(
                wrap(basic.x, 0.0, 1.0),
                basic.y.clamp(FULL_PANO_Y_MARGIN, 1.0 - FULL_PANO_Y_MARGIN),
            ),
            CenterPolicy::FullWidthCrop => {
                DVec2::new(wrap(basic.x, 0.0, 1.0), basic.y.clamp(0.0, 1.0))
            }
            CenterPolicy::Rectilinear => basic.clamp(DVec2::ZERO, DVec2::ONE),
        }
    }
}

#[derive(Clone, Debug)]
pub struct InteractiveSmoothing {
    motion: MotionBuffer,
    desired_zoom: f64,
    desired_lookat: Option<DVec3>,
    desired_center: Option<DVec2>,
}

impl InteractiveSmoothing {
    pub fn new(core: &StateCore) -> Self {
        Self {
            motion: MotionBuffer::new(core.params.smoothing),
            desired_zoom: core.zoom,
            desired_lookat: None,
            desired_center: None,
        }
    }

    #[inline]
    pub fn motion(&self) -> &MotionBuffer {
        &self.motion
    }

    #[inline]
    pub fn desired_zoom(&self) -> f64 {
        self.desired_zoom
    }

    #[inline]
    pub fn desired_lookat(&self) -> Option<DVec3> {
        self.desired_lookat
    }

    /// Cancels zoom and look-at intent in favor of a new motion request.
    fn take_over(&mut self, core: &StateCore) {
        self.desired_zoom = core.zoom;
        self.desired_lookat = None;
    }

    pub fn rotate(&mut self, core: &StateCore, delta: RotationDelta) {
        if core.current_node().is_none() || delta.is_zero() {
            return;
        }
        self.take_over(core);
        self.motion.push_rotation(delta);
    }

    /// Rotates both live cameras 1:1 with no damping.
    pub fn rotate_unbounded(&mut self, core: &mut StateCore, delta: RotationDelta) {
        if core.current_node().is_none() {
            return;
        }
        self.motion.clear_pending();
        core.current_camera.rotate_lookat(delta.phi, delta.theta);
        core.previous_camera.rotate_lookat(delta.phi, delta.theta);

        if let Some(lookat) = self.desired_lookat {
            let position = core.camera.position;
            let up = core.current_camera.up;
            let offset = rotate_about_up(lookat - position, up, delta.phi, delta.theta);
            self.desired_lookat = Some(position + offset);
        }
    }

    pub fn rotate_without_inertia(&mut self, core: &mut StateCore, delta: RotationDelta) {
        if core.current_node().is_none() {
            return;
        }
        self.take_over(core);
        self.motion.clear_pending();

        let bound = PI / (ANGULAR_BOUND_DIVISOR * 2f64.powf(core.zoom));
        let delta = delta.clamped(bound);
        core.current_camera.rotate_lookat(delta.phi, delta.theta);
        core.previous_camera.rotate_lookat(delta.phi, delta.theta);
    }

    pub fn rotate_basic(&mut self, core: &StateCore, basic: DVec2) {
        if core.current_node().is_none() {
            return;
        }
        self.take_over(core);
        self.motion.push_basic(basic, core.zoom);
    }

    pub fn rotate_basic_unbounded(&mut self, core: &StateCore, basic: DVec2) {
        if core.current_node().is_none() {
            return;
        }
        self.motion.push_basic_unbounded(basic);
    }

    pub fn rotate_basic_without_inertia(&mut self, core: &mut StateCore, basic: DVec2) {
        if core.current_node().is_none() {
            return;
        }
        self.take_over(core);
        self.motion.clear_pending();

        let bound = self.motion.basic_bound(core.zoom);
        apply_rotation_basic(core, basic.clamp(DVec2::splat(-bound), DVec2::splat(bound)));
    }

    pub fn rotate_to_basic(&mut self, core: &mut StateCore, basic: DVec2) {
        let Some(transform) = core.current_transform() else {
            return;
        };
        let basic = basic.clamp(DVec2::ZERO, DVec2::ONE);
        let lookat = transform.unproject_basic(basic, core.params.lookat_depth);
        self.take_over(core);
        core.current_camera.lookat = lookat;
    }

    /// Zooms while keeping `reference` (basic coordinates) visually fixed.
    pub fn zoom_in(&mut self, core: &StateCore, delta: f64, reference: DVec2) {
        let (Some(node), Some(transform)) = (core.current_node(), core.current_transform()) else {
            return;
        };
        self.motion.clear_pending();
        self.desired_zoom = core.params.clamp_zoom(self.desired_zoom + delta);

        let current = transform.project_basic(core.current_camera.lookat);
        let zoom0 = 2f64.powf(core.zoom);
        let zoom1 = 2f64.powf(self.desired_zoom);

        // Anchor on the copy of the reference closest to the center.
        let mut reference = reference;
        if transform.has_full_width_crop() {
            if reference.x - current.x > 0.5 {
                reference.x -= 1.0;
            } else if current.x - reference.x > 0.5 {
                reference.x += 1.0;
            }
        }

        let mut center = reference - zoom0 / zoom1 * (reference - current);
        let policy = CenterPolicy::of(node, transform);
        if policy.wraps() {
            center += self.motion.basic_rotation();
        }
        let center = policy.constrain(center);
        self.desired_lookat = Some(transform.unproject_basic(center, core.params.lookat_depth));
    }

    pub fn set_center(&mut self, core: &mut StateCore, center: DVec2) {
        self.take_over(core);
        self.motion.clear_pending();

        let clamped = center.clamp(DVec2::ZERO, DVec2::ONE);
        let Some(current) = core.current_transform() else {
            // Applied once a node arrives.
            self.desired_center = Some(clamped);
            return;
        };
        self.desired_center = None;

        let depth = core.params.lookat_depth;
        let previous = core.previous_transform().unwrap_or(current);
        let current_lookat = current.unproject_basic(clamped, depth);
        let previous_lookat = previous.unproject_basic(clamped, depth);
        core.current_camera.lookat = current_lookat;
        core.previous_camera.lookat = previous_lookat;
    }

    pub fn set_zoom(&mut self, core: &mut StateCore, zoom: f64) {
        self.desired_lookat = None;
        self.motion.clear_pending();
        core.zoom = core.params.clamp_zoom(zoom);
        self.desired_zoom = core.zoom;
    }

    /// Advances rotation, pan, zoom and look-at by one frame.
    pub(crate) fn integrate(&mut self, core: &mut StateCore, fps: f64) {
        if core.current_node().is_none() {
            return;
        }
        let frame_speed = core.params.frame_speed(fps);

        // Full panoramas keep spinning through transitions.
        let frame_factor = if core.current_is_full_pano() { 1.0 } else { core.alpha };
        let rotation = self.motion.integrate_rotation(frame_factor);
        if !rotation.is_zero() {
            core.previous_camera.rotate_lookat(rotation.phi, rotation.theta);
            core.current_camera.rotate_lookat(rotation.phi, rotation.theta);
        }

        let step = self.motion.integrate_basic(core.zoom);
        if let (Some(requested), Some(lookat), Some(transform)) =
            (step.unbounded, self.desired_lookat, core.current_transform())
        {
            let basic = transform.project_basic(lookat) + requested;
            self.desired_lookat = Some(transform.unproject_basic(basic, core.params.lookat_depth));
        }
        if step.applied != DVec2::ZERO {
            apply_rotation_basic(core, step.applied);
        }

        self.update_zoom(core, frame_speed);
        self.update_lookat(core, frame_speed);
    }

    fn update_zoom(&mut self, core: &mut StateCore, frame_speed: f64) {
        let diff = self.desired_zoom - core.zoom;
        if diff == 0.0 {
            return;
        }
        if diff.abs() < ZOOM_SNAP {
            core.zoom = self.desired_zoom;
            self.desired_lookat = None;
            return;
        }
        let step = (ZOOM_RATE * frame_speed * diff).abs().max(ZOOM_SNAP).min(diff.abs());
        core.zoom += step.copysign(diff);
    }

    fn update_lookat(&mut self, core: &mut StateCore, frame_speed: f64) {
        let Some(desired) = self.desired_lookat else {
            return;
        };
        let camera = &mut core.current_camera;
        if desired.distance_squared(camera.lookat) < LOOKAT_SNAP_SQUARED {
            camera.lookat = desired;
            self.desired_lookat = None;
        } else {
            camera.lookat = camera.lookat.lerp(desired, (LOOKAT_RATE * frame_speed).min(1.0));
        }
    }

    pub(crate) fn clear_desired_lookat(&mut self) {
        self.desired_lookat = None;
    }

    /// Stops all rotation at a transition boundary.
    ///
    /// Full panoramas keep their rotation so a pano to pano cut stays seamless.
    pub(crate) fn clear_rotation(&mut self, core: &StateCore) {
        if core.current_is_full_pano() {
            return;
        }
        self.motion.clear();
    }

    /// Applies a center requested before the first node arrived.
    pub(crate) fn set_desired_center(&mut self, core: &mut StateCore) {
        let Some(center) = self.desired_center else {
            return;
        };
        let Some(transform) = core.current_transform() else {
            return;
        };
        let direction = transform.unproject_basic(center, core.params.lookat_depth)
            - core.current_camera.position;
        core.current_camera.lookat = core.current_camera.position + direction;
        core.previous_camera.lookat = core.previous_camera.position + direction;
        self.desired_center = None;
    }

    /// Keeps zoom on panoramas and first nodes, resets it otherwise.
    pub(crate) fn set_desired_zoom(&mut self, core: &StateCore) {
        self.desired_zoom = if core.current_is_full_pano() || core.previous_node().is_none() {
            core.zoom
        } else {
            0.0
        };
    }
}

/// Pans both live cameras by `delta` in basic coordinates of their own images.
fn apply_rotation_basic(core: &mut StateCore, delta: DVec2) {
    let depth = core.params.lookat_depth;
    let (Some(current_node), Some(current_transform)) =
        (core.current_node(), core.current_transform())
    else {
        return;
    };
    let previous_node = core.previous_node().unwrap_or(current_node);
    let previous_transform = core.previous_transform().unwrap_or(current_transform);

    let current_lookat = pan_lookat(
        current_node,
        current_transform,
        &core.current_camera,
        delta,
        depth,
    );
    let previous_lookat = pan_lookat(
        previous_node,
        previous_transform,
        &core.previous_camera,
        delta,
        depth,
    );
    core.current_camera.lookat = current_lookat;
    core.previous_camera.lookat = previous_lookat;
}

fn pan_lookat(
    node: &Node,
    transform: &Transform,
    camera: &Camera,
    delta: DVec2,
    depth: f64,
) -> DVec3 {
    let basic = transform.project_basic(camera.lookat) + delta;
    let basic = CenterPolicy::of(node, transform).constrain(basic);
    transform.unproject_basic(basic, depth)
}
