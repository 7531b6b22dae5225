//! Trajectory ownership shared by every state variant.

use std::sync::Arc;

use glam::DVec2;

use crate::config::NavigationParams;
use crate::constants::BASIC_CENTER;
use crate::error::NavigationError;
use crate::geo::{distance_from_lat_lon, node_to_translation, Camera, Transform};
use crate::node::{LatLonAlt, Node};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionMode {
    /// Interpolate between nodes when they are close and connected.
    #[default]
    Default,
    /// Always cut between nodes.
    Instantaneous,
}

/// Public surface a state hands to its successor.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    pub reference: LatLonAlt,
    pub alpha: f64,
    pub camera: Camera,
    pub zoom: f64,
    pub current_index: Option<usize>,
    pub trajectory: Vec<Arc<Node>>,
    pub transition_mode: TransitionMode,
    pub params: NavigationParams,
}

impl StateSnapshot {
    /// Starting view of a navigator that has not seen any node yet.
    pub fn initial(transition_mode: TransitionMode, params: NavigationParams) -> Self {
        Self::with_trajectory(Vec::new(), None, transition_mode, params)
    }

    /// View with a ready-made trajectory and a settled transition.
    pub fn with_trajectory(
        trajectory: Vec<Arc<Node>>,
        current_index: Option<usize>,
        transition_mode: TransitionMode,
        params: NavigationParams,
    ) -> Self {
        let reference = current_index
            .and_then(|i| trajectory.get(i))
            .map(|n| n.lat_lon_alt())
            .unwrap_or_default();
        Self {
            reference,
            alpha: if trajectory.is_empty() { 0.0 } else { 1.0 },
            camera: Camera::default(),
            zoom: 0.0,
            current_index,
            trajectory,
            transition_mode,
            params,
        }
    }
}

/// Trajectory, reference frame and the live cameras.
///
/// Invariant: `current_index` is `Some(i)` with `i < trajectory.len()` iff the
/// trajectory is non-empty, and `transforms`/`cameras` run parallel to it.
#[derive(Clone, Debug)]
pub struct StateCore {
    pub(crate) params: NavigationParams,
    reference: LatLonAlt,
    pub(crate) alpha: f64,
    pub(crate) camera: Camera,
    pub(crate) zoom: f64,
    current_index: Option<usize>,
    trajectory: Vec<Arc<Node>>,
    transforms: Vec<Transform>,
    cameras: Vec<Camera>,
    pub(crate) current_camera: Camera,
    pub(crate) previous_camera: Camera,
    pub(crate) motionless: bool,
    transition_mode: TransitionMode,
}

impl StateCore {
    pub fn new(snapshot: &StateSnapshot) -> Result<Self, NavigationError> {
        ensure_cached(&snapshot.trajectory)?;
        let current_index = match snapshot.current_index {
            _ if snapshot.trajectory.is_empty() => None,
            Some(i) if i < snapshot.trajectory.len() => Some(i),
            Some(i) => {
                log::warn!("[state] current index {} outside trajectory, clamping", i);
                Some(snapshot.trajectory.len() - 1)
            }
            None => Some(0),
        };

        let mut core = Self {
            params: snapshot.params,
            reference: snapshot.reference,
            alpha: snapshot.alpha.clamp(0.0, 1.0),
            camera: snapshot.camera.clone(),
            zoom: snapshot.params.clamp_zoom(snapshot.zoom),
            current_index,
            trajectory: snapshot.trajectory.clone(),
            transforms: Vec::with_capacity(snapshot.trajectory.len()),
            cameras: Vec::with_capacity(snapshot.trajectory.len()),
            current_camera: Camera::default(),
            previous_camera: Camera::default(),
            motionless: false,
            transition_mode: snapshot.transition_mode,
        };
        core.rebuild_trajectories();
        if core.current_index.is_some() {
            core.set_current_camera();
        }
        core.motionless = core.motionless_transition();
        Ok(core)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            reference: self.reference,
            alpha: self.alpha,
            camera: self.camera.clone(),
            zoom: self.zoom,
            current_index: self.current_index,
            trajectory: self.trajectory.clone(),
            transition_mode: self.transition_mode,
            params: self.params,
        }
    }

    // ---------------- Queries ----------------

    #[inline]
    pub fn params(&self) -> &NavigationParams {
        &self.params
    }

    #[inline]
    pub fn reference(&self) -> LatLonAlt {
        self.reference
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn current_camera(&self) -> &Camera {
        &self.current_camera
    }

    #[inline]
    pub fn previous_camera(&self) -> &Camera {
        &self.previous_camera
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[inline]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    #[inline]
    pub fn trajectory(&self) -> &[Arc<Node>] {
        &self.trajectory
    }

    #[inline]
    pub fn motionless(&self) -> bool {
        self.motionless
    }

    #[inline]
    pub fn transition_mode(&self) -> TransitionMode {
        self.transition_mode
    }

    pub fn set_transition_mode(&mut self, mode: TransitionMode) {
        self.transition_mode = mode;
    }

    pub fn current_node(&self) -> Option<&Arc<Node>> {
        self.current_index.and_then(|i| self.trajectory.get(i))
    }

    pub fn previous_node(&self) -> Option<&Arc<Node>> {
        match self.current_index {
            Some(i) if i > 0 => self.trajectory.get(i - 1),
            _ => None,
        }
    }

    pub fn current_transform(&self) -> Option<&Transform> {
        self.current_index.and_then(|i| self.transforms.get(i))
    }

    pub fn previous_transform(&self) -> Option<&Transform> {
        match self.current_index {
            Some(i) if i > 0 => self.transforms.get(i - 1),
            _ => None,
        }
    }

    /// Basic coordinate of the displayed look-at point in the current image.
    pub fn get_center(&self) -> DVec2 {
        match self.current_transform() {
            Some(transform) => transform.project_basic(self.camera.lookat),
            None => DVec2::from_array(BASIC_CENTER),
        }
    }

    pub(crate) fn current_is_full_pano(&self) -> bool {
        self.current_node().map(|n| n.full_pano).unwrap_or(false)
    }

    // ---------------- Trajectory mutation ----------------

    pub fn append(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        ensure_non_empty(&nodes)?;
        if self.current_index.is_none() {
            return self.set(nodes);
        }
        ensure_cached(&nodes)?;
        self.append_to_trajectories(&nodes);
        self.trajectory.extend(nodes);
        Ok(())
    }

    pub fn prepend(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        ensure_non_empty(&nodes)?;
        ensure_cached(&nodes)?;

        let count = nodes.len();
        self.current_index = Some(match self.current_index {
            Some(i) => i + count,
            None => count - 1,
        });
        let mut trajectory = nodes;
        trajectory.append(&mut self.trajectory);
        self.trajectory = trajectory;

        if self.reset_reference() {
            self.rebuild_trajectories();
        } else {
            self.prepend_to_trajectories(count);
        }
        self.set_current_camera();
        Ok(())
    }

    /// Drops `n` entries from the front of the trajectory.
    pub fn remove(&mut self, n: usize) -> Result<(), NavigationError> {
        self.check_removal(n)?;
        if n == 0 {
            return Ok(());
        }

        self.trajectory.drain(..n);
        self.transforms.drain(..n);
        self.cameras.drain(..n);
        self.current_index = self.current_index.map(|i| i - n);
        Ok(())
    }

    /// Fails unless the first `n` entries can be dropped.
    pub(crate) fn check_removal(&self, n: usize) -> Result<(), NavigationError> {
        // The previous node is needed to render the transition into the current one.
        let removable = self.current_index.and_then(|i| i.checked_sub(1));
        if removable.map_or(true, |r| n > r) {
            return Err(NavigationError::InvalidRemoval {
                count: i64::try_from(n).unwrap_or(i64::MAX),
                reason: "current and previous nodes can not be removed",
            });
        }
        Ok(())
    }

    /// Drops every entry after the current one.
    pub fn cut(&mut self) {
        if let Some(i) = self.current_index {
            self.trajectory.truncate(i + 1);
            self.transforms.truncate(i + 1);
            self.cameras.truncate(i + 1);
        }
    }

    pub fn set(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        ensure_non_empty(&nodes)?;
        ensure_cached(&nodes)?;

        match self.current_node().cloned() {
            Some(current) => {
                let mut trajectory = Vec::with_capacity(nodes.len() + 1);
                trajectory.push(current);
                trajectory.extend(nodes);
                self.trajectory = trajectory;
                self.current_index = Some(1);
            }
            None => {
                self.trajectory = nodes;
                self.current_index = Some(0);
            }
        }
        log::debug!(
            "[trajectory] set {} entries, current {:?}",
            self.trajectory.len(),
            self.current_node().map(|n| n.id.as_str())
        );

        self.reset_reference();
        self.rebuild_trajectories();
        self.set_current_camera();
        Ok(())
    }

    /// Re-derives cameras after the current index moved.
    pub(crate) fn set_current(&mut self) {
        if self.reset_reference() {
            self.rebuild_trajectories();
        }
        self.set_current_camera();
    }

    /// Steps to the next trajectory entry, if there is one.
    pub(crate) fn advance(&mut self) -> bool {
        match self.current_index {
            Some(i) if i + 1 < self.trajectory.len() => {
                self.current_index = Some(i + 1);
                log::trace!("[trajectory] advanced to {}", self.trajectory[i + 1].id);
                self.set_current();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_current_camera(&mut self) {
        let Some(i) = self.current_index else {
            return;
        };
        self.current_camera = self.cameras[i].clone();
        self.previous_camera = if i > 0 {
            self.cameras[i - 1].clone()
        } else {
            self.current_camera.clone()
        };
    }

    /// Points the previous camera, and a panoramic current one, along the
    /// displayed view direction.
    pub(crate) fn align_to_view(&mut self) {
        if self.previous_node().is_none() {
            return;
        }
        let direction = self.camera.lookat - self.camera.position;
        self.previous_camera.lookat = self.previous_camera.position + direction;
        if self.current_node().map(|n| n.pano()).unwrap_or(false) {
            self.current_camera.lookat = self.current_camera.position + direction;
        }
    }

    /// Blends the displayed camera between the live pair.
    pub(crate) fn blend_camera(&mut self, alpha: f64) {
        let (previous, current) = (&self.previous_camera, &self.current_camera);
        self.camera.lerp_cameras(previous, current, alpha);
    }

    // ---------------- Transition classification ----------------

    /// Whether the cut between previous and current node snaps instead of
    /// interpolating.
    pub fn motionless_transition(&self) -> bool {
        let (Some(current), Some(previous)) = (self.current_node(), self.previous_node()) else {
            return false;
        };
        self.transition_mode == TransitionMode::Instantaneous
            || !(current.merged
                && previous.merged
                && self.within_original_distance(current, previous)
                && same_connected_component(current, previous))
    }

    fn within_original_distance(&self, current: &Node, previous: &Node) -> bool {
        distance_from_lat_lon(current.original_lat_lon, previous.original_lat_lon)
            < self.params.max_motion_distance
    }

    /// Re-anchors the reference on the current node when it drifted too far.
    ///
    /// Never resets during an interpolated transition: moving the frame under
    /// a moving camera would make it jump.
    fn reset_reference(&mut self) -> bool {
        let Some(node) = self.current_node() else {
            return false;
        };
        let threshold = self.params.reference_threshold;
        if (node.lat_lon.lat - self.reference.lat).abs() < threshold
            && (node.lat_lon.lon - self.reference.lon).abs() < threshold
        {
            return false;
        }
        if self.previous_node().is_some() && !self.motionless_transition() {
            return false;
        }

        let reference = node.lat_lon_alt();
        log::debug!(
            "[reference] reset to ({:.6}, {:.6}, {:.1}) at {}",
            reference.lat,
            reference.lon,
            reference.alt,
            node.id
        );
        self.reference = reference;
        true
    }

    fn rebuild_trajectories(&mut self) {
        self.transforms.clear();
        self.cameras.clear();
        let nodes = std::mem::take(&mut self.trajectory);
        self.append_to_trajectories(&nodes);
        self.trajectory = nodes;
    }

    fn append_to_trajectories(&mut self, nodes: &[Arc<Node>]) {
        for node in nodes {
            let transform = Transform::new(node, node_to_translation(node, self.reference));
            self.cameras.push(Camera::from_transform(&transform, self.params.lookat_depth));
            self.transforms.push(transform);
        }
    }

    /// Builds transforms for the first `count` trajectory entries.
    fn prepend_to_trajectories(&mut self, count: usize) {
        let mut transforms = Vec::with_capacity(count + self.transforms.len());
        let mut cameras = Vec::with_capacity(count + self.cameras.len());
        for node in &self.trajectory[..count] {
            let transform = Transform::new(node, node_to_translation(node, self.reference));
            cameras.push(Camera::from_transform(&transform, self.params.lookat_depth));
            transforms.push(transform);
        }
        transforms.append(&mut self.transforms);
        cameras.append(&mut self.cameras);
        self.transforms = transforms;
        self.cameras = cameras;
    }
}

fn same_connected_component(current: &Node, previous: &Node) -> bool {
    current.merge_cc.is_some() && current.merge_cc == previous.merge_cc
}

pub(crate) fn ensure_non_empty(nodes: &[Arc<Node>]) -> Result<(), NavigationError> {
    if nodes.is_empty() {
        return Err(NavigationError::InvalidTrajectoryOperation);
    }
    Ok(())
}

pub(crate) fn ensure_cached(nodes: &[Arc<Node>]) -> Result<(), NavigationError> {
    match nodes.iter().find(|n| !n.assets_cached) {
        Some(node) => Err(NavigationError::UncachedAsset {
            node_id: node.id.clone(),
        }),
        None => Ok(()),
    }
}
