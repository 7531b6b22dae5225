//! Requested vs. applied motion buffer.
//!
//! Input handlers push into a single pending slot; the next frame integrates
//! it into the applied velocity and empties the slot. Only one kind of motion
//! intent can be pending at a time, so pushing a different kind replaces the
//! previous request instead of merging with it.

use glam::DVec2;

use crate::config::SmoothingParams;
use crate::rotation::RotationDelta;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PendingMotion {
    #[default]
    None,
    /// Angular velocity request.
    Rotation(RotationDelta),
    /// Pan request in basic coordinates, bounded per axis.
    BasicRotation(DVec2),
    /// Pan request in basic coordinates that also drags a pending look-at.
    UnboundedBasicRotation(DVec2),
}

/// Result of integrating the basic pan for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasicStep {
    /// Pan to apply to the cameras this frame.
    pub applied: DVec2,
    /// Unbounded request consumed this frame, if any.
    pub unbounded: Option<DVec2>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionBuffer {
    params: SmoothingParams,
    pending: PendingMotion,
    rotation: RotationDelta,
    basic_rotation: DVec2,
}

impl MotionBuffer {
    pub fn new(params: SmoothingParams) -> Self {
        Self {
            params,
            pending: PendingMotion::None,
            rotation: RotationDelta::ZERO,
            basic_rotation: DVec2::ZERO,
        }
    }

    #[inline]
    pub fn pending(&self) -> PendingMotion {
        self.pending
    }

    /// Angular velocity applied during the last integrated frame.
    #[inline]
    pub fn rotation(&self) -> RotationDelta {
        self.rotation
    }

    #[inline]
    pub fn basic_rotation(&self) -> DVec2 {
        self.basic_rotation
    }

    /// Per-axis bound of a basic pan at `zoom`.
    #[inline]
    pub fn basic_bound(&self, zoom: f64) -> f64 {
        self.params.basic_rotation_bound / 2f64.powf(zoom)
    }

    pub fn push_rotation(&mut self, delta: RotationDelta) {
        match &mut self.pending {
            PendingMotion::Rotation(requested) => *requested += delta,
            _ => self.pending = PendingMotion::Rotation(delta),
        }
    }

    pub fn push_basic(&mut self, delta: DVec2, zoom: f64) {
        let bound = self.basic_bound(zoom);
        let requested = match self.pending {
            PendingMotion::BasicRotation(requested) => requested + delta,
            _ => delta,
        };
        self.pending = PendingMotion::BasicRotation(requested.clamp(
            DVec2::splat(-bound),
            DVec2::splat(bound),
        ));
    }

    pub fn push_basic_unbounded(&mut self, delta: DVec2) {
        match &mut self.pending {
            PendingMotion::UnboundedBasicRotation(requested) => *requested += delta,
            _ => self.pending = PendingMotion::UnboundedBasicRotation(delta),
        }
    }

    pub fn clear_pending(&mut self) {
        self.pending = PendingMotion::None;
    }

    /// Drops the pending request and stops all applied motion.
    pub fn clear(&mut self) {
        self.pending = PendingMotion::None;
        self.rotation.reset();
        self.basic_rotation = DVec2::ZERO;
    }

    /// Advances the angular velocity by one frame.
    ///
    /// A pending rotation request is blended in (faster when speeding up than
    /// when slowing down) and consumed. Without a request the velocity decays
    /// by `rotation_acceleration * frame_factor` and snaps to zero below the
    /// threshold.
    pub fn integrate_rotation(&mut self, frame_factor: f64) -> RotationDelta {
        if let PendingMotion::Rotation(requested) = self.pending {
            let alpha = if requested.length_squared() > self.rotation.length_squared() {
                self.params.rotation_increase_alpha
            } else {
                self.params.rotation_decrease_alpha
            };
            self.rotation.lerp(&requested, alpha);
            self.pending = PendingMotion::None;
            return self.rotation;
        }

        if !self.rotation.is_zero() {
            self.rotation.multiply(self.params.rotation_acceleration * frame_factor);
            self.rotation.threshold(self.params.rotation_threshold);
        }
        self.rotation
    }

    /// Advances the basic pan velocity by one frame.
    pub fn integrate_basic(&mut self, zoom: f64) -> BasicStep {
        let mut unbounded = None;
        match self.pending {
            PendingMotion::BasicRotation(requested) => {
                let x = self.blend_axis(self.basic_rotation.x, requested.x);
                let y = self.blend_axis(self.basic_rotation.y, requested.y);
                self.basic_rotation = DVec2::new(x, y);
                self.pending = PendingMotion::None;
                return BasicStep {
                    applied: self.basic_rotation,
                    unbounded: None,
                };
            }
            PendingMotion::UnboundedBasicRotation(requested) => {
                let alpha = self.params.unbounded_rotation_alpha;
                if requested.x != 0.0 {
                    self.basic_rotation.x =
                        (1.0 - alpha) * self.basic_rotation.x + alpha * requested.x;
                }
                if requested.y != 0.0 {
                    self.basic_rotation.y =
                        (1.0 - alpha) * self.basic_rotation.y + alpha * requested.y;
                }
                unbounded = Some(requested);
                self.pending = PendingMotion::None;
            }
            PendingMotion::None | PendingMotion::Rotation(_) => {}
        }

        if self.basic_rotation != DVec2::ZERO {
            self.basic_rotation *= self.params.rotation_acceleration;
            let threshold = self.params.rotation_threshold / 2f64.powf(zoom);
            if self.basic_rotation.x.abs() < threshold && self.basic_rotation.y.abs() < threshold {
                self.basic_rotation = DVec2::ZERO;
            }
        }

        BasicStep {
            applied: self.basic_rotation,
            unbounded,
        }
    }

    #[inline]
    fn blend_axis(&self, applied: f64, requested: f64) -> f64 {
        let alpha = if requested.abs() > applied.abs() {
            self.params.rotation_increase_alpha
        } else {
            self.params.rotation_decrease_alpha
        };
        (1.0 - alpha) * applied + alpha * requested
    }
}
