use glam::DVec3;

use super::base::{StateCore, StateSnapshot};
use super::State;
use crate::constants::{EARTH_LIFT, EARTH_PULL_BACK, MAX_DOLLY_DISTANCE, MIN_DOLLY_DISTANCE};
use crate::error::NavigationError;
use crate::geo::rotate_about_up;
use crate::rotation::RotationDelta;

/// Overview mode orbiting the last viewed location from above.
#[derive(Clone, Debug)]
pub struct EarthState {
    core: StateCore,
}

impl EarthState {
    /// Pulls the camera back along the view direction and lifts it, looking
    /// down at where the previous camera stood, with a world-vertical up.
    pub fn new(snapshot: &StateSnapshot) -> Result<Self, NavigationError> {
        let mut core = StateCore::new(snapshot)?;
        let origin = snapshot.camera.position;
        let direction = snapshot.camera.viewing_direction();

        let camera = &mut core.camera;
        camera.lookat = origin;
        camera.position = DVec3::new(
            origin.x - EARTH_PULL_BACK * direction.x,
            origin.y - EARTH_PULL_BACK * direction.y,
            origin.z + EARTH_LIFT,
        );
        camera.up = DVec3::Z;
        Ok(Self { core })
    }
}

impl State for EarthState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn rotate(&mut self, delta: RotationDelta) {
        // TODO: decide with product whether drag-rotate in overview should map to orbit
        if !delta.is_zero() {
            log::warn!("[state] rotate ignored in earth mode, use orbit");
        }
    }

    /// Scales the distance to the look-at point by `2^-delta`.
    fn dolly(&mut self, delta: f64) {
        let camera = &mut self.core.camera;
        let offset = camera.position - camera.lookat;
        let distance =
            (offset.length() * 2f64.powf(-delta)).clamp(MIN_DOLLY_DISTANCE, MAX_DOLLY_DISTANCE);
        let direction = offset.try_normalize().unwrap_or(DVec3::Z);
        camera.position = camera.lookat + direction * distance;
    }

    fn orbit(&mut self, rotation: RotationDelta) {
        let camera = &mut self.core.camera;
        let offset = rotate_about_up(
            camera.position - camera.lookat,
            camera.up,
            rotation.phi,
            rotation.theta,
        );
        camera.position = camera.lookat + offset;
    }

    fn truck(&mut self, direction: DVec3) {
        let camera = &mut self.core.camera;
        camera.position += direction;
        camera.lookat += direction;
    }
}
