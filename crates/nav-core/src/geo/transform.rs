//! Per-node projection between world points, SfM image coordinates and
//! normalized basic image coordinates.
//!
//! Camera frame convention: `x` right, `y` down, `z` forward. SfM coordinates
//! are centered on the principal point and normalized by the largest image
//! dimension; for panoramas they are longitude/latitude fractions of a turn.
//! Basic coordinates span the visible image as `[0, 1] x [0, 1]` with the
//! origin in the top left corner.

use std::f64::consts::TAU;

use glam::{DMat3, DQuat, DVec2, DVec3};

use crate::node::{GPano, Node};

// Projection of points behind a perspective camera
const BEHIND_CAMERA_SFM: f64 = 1e8;

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    orientation: u8,
    width: f64,
    height: f64,
    focal: f64,
    gpano: Option<GPano>,
    rotation: DMat3,
    translation: DVec3,
}

impl Transform {
    /// Builds the projection of `node` placed by `translation` (`-R * enu`).
    pub fn new(node: &Node, translation: DVec3) -> Self {
        let width = if node.width > 0.0 { node.width } else { 1.0 };
        let height = if node.height > 0.0 { node.height } else { 1.0 };
        Self {
            orientation: node.orientation,
            width,
            height,
            focal: node.focal,
            gpano: node.gpano,
            rotation: rotation_matrix(node.rotation),
            translation,
        }
    }

    #[inline]
    pub fn gpano(&self) -> Option<&GPano> {
        self.gpano.as_ref()
    }

    /// Panorama whose crop spans the full horizon.
    #[inline]
    pub fn has_full_width_crop(&self) -> bool {
        self.gpano.map(|g| g.full_width_crop()).unwrap_or(false)
    }

    #[inline]
    pub fn focal(&self) -> f64 {
        self.focal
    }

    /// Camera center in world coordinates.
    #[inline]
    pub fn center(&self) -> DVec3 {
        -(self.rotation.transpose() * self.translation)
    }

    /// World-space up direction of the image as displayed.
    pub fn up_vector(&self) -> DVec3 {
        let r = self.rotation.transpose();
        match self.orientation {
            3 => r.y_axis,
            6 => r.x_axis,
            8 => -r.x_axis,
            _ => -r.y_axis,
        }
    }

    pub fn unproject_sfm(&self, sfm: DVec2, distance: f64) -> DVec3 {
        let bearing = self.sfm_to_bearing(sfm);
        self.camera_to_world(bearing * distance)
    }

    pub fn unproject_basic(&self, basic: DVec2, distance: f64) -> DVec3 {
        self.unproject_sfm(self.basic_to_sfm(basic), distance)
    }

    pub fn project_sfm(&self, point: DVec3) -> DVec2 {
        let v = self.rotation * point + self.translation;
        self.bearing_to_sfm(v)
    }

    pub fn project_basic(&self, point: DVec3) -> DVec2 {
        self.sfm_to_basic(self.project_sfm(point))
    }

    #[inline]
    fn camera_to_world(&self, v: DVec3) -> DVec3 {
        self.rotation.transpose() * (v - self.translation)
    }

    fn sfm_to_bearing(&self, sfm: DVec2) -> DVec3 {
        match self.gpano {
            Some(_) => {
                let lon = sfm.x * TAU;
                let lat = -sfm.y * TAU;
                DVec3::new(lat.cos() * lon.sin(), -lat.sin(), lat.cos() * lon.cos())
            }
            None => DVec3::new(sfm.x, sfm.y, self.focal).normalize_or_zero(),
        }
    }

    fn bearing_to_sfm(&self, v: DVec3) -> DVec2 {
        match self.gpano {
            Some(_) => {
                let lon = v.x.atan2(v.z);
                let lat = (-v.y).atan2(v.x.hypot(v.z));
                DVec2::new(lon / TAU, -lat / TAU)
            }
            None if v.z > 0.0 => DVec2::new(v.x * self.focal / v.z, v.y * self.focal / v.z),
            None => DVec2::new(
                BEHIND_CAMERA_SFM.copysign(v.x),
                BEHIND_CAMERA_SFM.copysign(v.y),
            ),
        }
    }

    fn basic_to_sfm(&self, basic: DVec2) -> DVec2 {
        if let Some(g) = self.gpano {
            let px = basic.x * g.cropped_width + g.cropped_left;
            let py = basic.y * g.cropped_height + g.cropped_top;
            return DVec2::new(px / g.full_width - 0.5, (py / g.full_height - 0.5) / 2.0);
        }

        let rotated = match self.orientation {
            3 => DVec2::new(1.0 - basic.x, 1.0 - basic.y),
            6 => DVec2::new(basic.y, 1.0 - basic.x),
            8 => DVec2::new(1.0 - basic.y, basic.x),
            _ => basic,
        };
        let s = self.width.max(self.height);
        let w = self.width / s;
        let h = self.height / s;
        DVec2::new(rotated.x * w - w / 2.0, rotated.y * h - h / 2.0)
    }

    fn sfm_to_basic(&self, sfm: DVec2) -> DVec2 {
        if let Some(g) = self.gpano {
            let px = (sfm.x + 0.5) * g.full_width;
            let py = (2.0 * sfm.y + 0.5) * g.full_height;
            return DVec2::new(
                (px - g.cropped_left) / g.cropped_width,
                (py - g.cropped_top) / g.cropped_height,
            );
        }

        let s = self.width.max(self.height);
        let w = self.width / s;
        let h = self.height / s;
        let rx = (sfm.x + w / 2.0) / w;
        let ry = (sfm.y + h / 2.0) / h;
        match self.orientation {
            3 => DVec2::new(1.0 - rx, 1.0 - ry),
            6 => DVec2::new(1.0 - ry, rx),
            8 => DVec2::new(ry, 1.0 - rx),
            _ => DVec2::new(rx, ry),
        }
    }
}

/// Rotation matrix of an angle-axis vector.
#[inline]
pub fn rotation_matrix(angle_axis: [f64; 3]) -> DMat3 {
    DMat3::from_quat(DQuat::from_scaled_axis(DVec3::from_array(angle_axis)))
}
