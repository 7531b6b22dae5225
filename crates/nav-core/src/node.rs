//! Image nodes as delivered by the graph/cache layer.
//!
//! The navigation core only reads nodes. They are shared as `Arc<Node>` so a
//! state transition can carry the whole trajectory without copying images.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLonAlt {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

/// Panorama crop metadata in pixels.
///
/// A cropped panorama covers `cropped_width x cropped_height` pixels of an
/// equirectangular `full_width x full_height` sphere, starting at
/// (`cropped_left`, `cropped_top`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GPano {
    pub cropped_width: f64,
    pub cropped_height: f64,
    pub cropped_left: f64,
    pub cropped_top: f64,
    pub full_width: f64,
    pub full_height: f64,
}

impl GPano {
    pub fn full(width: f64) -> Self {
        Self {
            cropped_width: width,
            cropped_height: width / 2.0,
            cropped_left: 0.0,
            cropped_top: 0.0,
            full_width: width,
            full_height: width / 2.0,
        }
    }

    /// The crop spans the whole horizon, so basic x wraps around.
    #[inline]
    pub fn full_width_crop(&self) -> bool {
        self.cropped_width == self.full_width
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Adjusted (reconstructed) position.
    pub lat_lon: LatLon,
    pub alt: f64,
    /// Position as originally recorded, before any adjustment.
    pub original_lat_lon: LatLon,
    /// EXIF orientation: 1, 3, 6 or 8.
    #[serde(default = "default_orientation")]
    pub orientation: u8,
    pub width: f64,
    pub height: f64,
    /// Focal length normalized by the largest image dimension.
    pub focal: f64,
    /// Atomic scale of the reconstruction. Projection works in metres and
    /// does not read it.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// World to camera rotation as an angle-axis vector.
    pub rotation: [f64; 3],
    #[serde(default)]
    pub gpano: Option<GPano>,
    #[serde(default)]
    pub full_pano: bool,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub merge_cc: Option<u64>,
    #[serde(default)]
    pub assets_cached: bool,
}

fn default_orientation() -> u8 {
    1
}

fn default_scale() -> f64 {
    1.0
}

impl Node {
    #[inline]
    pub fn lat_lon_alt(&self) -> LatLonAlt {
        LatLonAlt {
            lat: self.lat_lon.lat,
            lon: self.lat_lon.lon,
            alt: self.alt,
        }
    }

    #[inline]
    pub fn pano(&self) -> bool {
        self.gpano.is_some()
    }
}
