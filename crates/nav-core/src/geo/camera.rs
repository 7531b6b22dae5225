use std::f64::consts::PI;

use glam::{DMat4, DQuat, DVec3};

use super::Transform;
use crate::constants::POLAR_MARGIN;

/// Camera pose with a look-at point, blended between trajectory entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub lookat: DVec3,
    pub up: DVec3,
    pub focal: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            lookat: DVec3::Z,
            up: DVec3::NEG_Y,
            focal: 1.0,
        }
    }
}

impl Camera {
    /// Camera at the node center looking `depth` along its principal axis.
    pub fn from_transform(transform: &Transform, depth: f64) -> Self {
        let focal = if transform.gpano().is_some() {
            0.5 / (PI / 2.0).tan()
        } else {
            transform.focal()
        };
        Self {
            position: transform.center(),
            lookat: transform.unproject_sfm(glam::DVec2::ZERO, depth),
            up: transform.up_vector(),
            focal,
        }
    }

    /// Overwrites `self` with the linear blend of `a` and `b`.
    pub fn lerp_cameras(&mut self, a: &Camera, b: &Camera, alpha: f64) {
        self.position = a.position.lerp(b.position, alpha);
        self.lookat = a.lookat.lerp(b.lookat, alpha);
        self.up = a.up.lerp(b.up, alpha);
        self.focal = a.focal + (b.focal - a.focal) * alpha;
    }

    #[inline]
    pub fn viewing_direction(&self) -> DVec3 {
        (self.lookat - self.position).normalize_or_zero()
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.lookat, self.up.normalize_or_zero())
    }

    /// Rotates the look-at point around the camera position.
    pub fn rotate_lookat(&mut self, phi: f64, theta: f64) {
        let offset = self.lookat - self.position;
        self.lookat = self.position + rotate_about_up(offset, self.up, phi, theta);
    }
}

/// Rotates `offset` in spherical coordinates around `up`.
///
/// `phi` turns around the up axis, `theta` tilts towards or away from it.
/// The resulting polar angle is clamped to `[0.1, pi - 0.1]` and the length
/// of `offset` is preserved.
pub fn rotate_about_up(offset: DVec3, up: DVec3, phi: f64, theta: f64) -> DVec3 {
    let up = up.try_normalize().unwrap_or(DVec3::Z);
    let q = DQuat::from_rotation_arc(up, DVec3::Z);
    let local = q * offset;
    let length = local.length();

    let azimuth = local.y.atan2(local.x) + phi;
    let polar = (local.x.hypot(local.y).atan2(local.z) + theta)
        .clamp(POLAR_MARGIN, PI - POLAR_MARGIN);

    let (sin_polar, cos_polar) = polar.sin_cos();
    let rotated = DVec3::new(
        sin_polar * azimuth.cos(),
        sin_polar * azimuth.sin(),
        cos_polar,
    );
    q.inverse() * (rotated * length)
}
