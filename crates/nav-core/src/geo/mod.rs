//! Geometry collaborators: geodetic conversion, per-node projection and the
//! blendable camera pose.

mod camera;
mod coords;
mod transform;

pub use camera::*;
pub use coords::*;
pub use transform::*;

use glam::DVec3;

use crate::node::{LatLonAlt, Node};

/// Translation placing `node` in the local frame anchored at `reference`.
pub fn node_to_translation(node: &Node, reference: LatLonAlt) -> DVec3 {
    let enu = geodetic_to_enu(node.lat_lon_alt(), reference);
    -(rotation_matrix(node.rotation) * enu)
}
