//! Run-time tunable navigation parameters.
//!
//! Defaults come from [`crate::constants`]. Params travel inside every
//! [`crate::StateSnapshot`], so a tuned value survives state transitions.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Coefficients of the requested/applied rotation smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    pub rotation_acceleration: f64,
    pub rotation_increase_alpha: f64,
    pub rotation_decrease_alpha: f64,
    pub rotation_threshold: f64,
    pub unbounded_rotation_alpha: f64,
    pub basic_rotation_bound: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            rotation_acceleration: ROTATION_ACCELERATION,
            rotation_increase_alpha: ROTATION_INCREASE_ALPHA,
            rotation_decrease_alpha: ROTATION_DECREASE_ALPHA,
            rotation_threshold: ROTATION_THRESHOLD,
            unbounded_rotation_alpha: UNBOUNDED_ROTATION_ALPHA,
            basic_rotation_bound: BASIC_ROTATION_BOUND,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationParams {
    pub animation_speed: f64,
    pub lookat_depth: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Degrees of lat/lon drift tolerated before the local frame is re-anchored.
    pub reference_threshold: f64,
    /// Meters between original positions below which motion is interpolated.
    pub max_motion_distance: f64,
    pub smoothing: SmoothingParams,
}

impl Default for NavigationParams {
    fn default() -> Self {
        Self {
            animation_speed: ANIMATION_SPEED,
            lookat_depth: LOOKAT_DEPTH,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            reference_threshold: REFERENCE_THRESHOLD,
            max_motion_distance: MAX_MOTION_DISTANCE,
            smoothing: SmoothingParams::default(),
        }
    }
}

impl NavigationParams {
    /// Frame-rate independent animation step.
    #[inline]
    pub fn frame_speed(&self, fps: f64) -> f64 {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            REFERENCE_FPS
        };
        self.animation_speed * (REFERENCE_FPS / fps)
    }

    #[inline]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
