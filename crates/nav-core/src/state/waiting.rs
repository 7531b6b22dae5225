use std::sync::Arc;

use super::base::{ensure_cached, ensure_non_empty, StateCore, StateSnapshot};
use super::State;
use crate::error::NavigationError;
use crate::node::Node;
use crate::rotation::RotationDelta;

/// Frozen view: the camera and trajectory stay exactly as they were handed over.
#[derive(Clone, Debug)]
pub struct WaitingState {
    core: StateCore,
}

impl WaitingState {
    pub fn new(snapshot: &StateSnapshot) -> Result<Self, NavigationError> {
        let mut core = StateCore::new(snapshot)?;
        core.align_to_view();
        core.motionless = core.motionless_transition();
        Ok(Self { core })
    }
}

// Trajectory calls are checked like in the moving states but never applied.
fn validate(nodes: &[Arc<Node>]) -> Result<(), NavigationError> {
    ensure_non_empty(nodes)?;
    ensure_cached(nodes)
}

impl State for WaitingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn alpha(&self) -> f64 {
        if self.core.motionless {
            self.core.alpha.round()
        } else {
            self.core.alpha
        }
    }

    fn append(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        validate(&nodes)
    }

    fn prepend(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        validate(&nodes)
    }

    fn set(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        validate(&nodes)
    }

    fn remove(&mut self, n: usize) -> Result<(), NavigationError> {
        self.core.check_removal(n)
    }

    fn cut(&mut self) {}

    fn rotate(&mut self, _delta: RotationDelta) {}

    fn update(&mut self, _fps: f64) {}
}
