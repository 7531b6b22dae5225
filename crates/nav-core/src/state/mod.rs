//! Navigation modes and the transitions between them.
//!
//! Exactly one [`NavigationState`] is active at a time. Every variant shares
//! a [`StateCore`]; the interactive variants additionally compose an
//! [`InteractiveSmoothing`]. A transition builds the next variant from the
//! current one's [`StateSnapshot`], so in-flight smoothing is not carried over.

mod base;
mod earth;
mod interactive;
mod interactive_waiting;
mod traversing;
mod waiting;

pub use base::{StateCore, StateSnapshot, TransitionMode};
pub use earth::EarthState;
pub use interactive::{CenterPolicy, InteractiveSmoothing};
pub use interactive_waiting::InteractiveWaitingState;
pub use traversing::TraversingState;
pub use waiting::WaitingState;

use std::sync::Arc;

use glam::{DVec2, DVec3};

use crate::error::NavigationError;
use crate::geo::{Camera, Transform};
use crate::node::{LatLonAlt, Node};
use crate::rotation::RotationDelta;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    Traversing,
    Waiting,
    InteractiveWaiting,
    Earth,
}

/// Operations every navigation mode answers.
///
/// Trajectory mutation goes to the shared core by default; everything else
/// is a no-op unless the mode overrides it.
pub trait State {
    fn core(&self) -> &StateCore;
    fn core_mut(&mut self) -> &mut StateCore;

    /// Displayed transition progress.
    fn alpha(&self) -> f64 {
        self.core().alpha
    }

    fn desired_zoom(&self) -> f64 {
        self.core().zoom()
    }

    fn append(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.core_mut().append(nodes)
    }

    fn prepend(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.core_mut().prepend(nodes)
    }

    fn remove(&mut self, n: usize) -> Result<(), NavigationError> {
        self.core_mut().remove(n)
    }

    fn cut(&mut self) {
        self.core_mut().cut();
    }

    fn set(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.core_mut().set(nodes)
    }

    /// Drops everything before the previous node.
    fn clear_prior(&mut self) -> Result<(), NavigationError> {
        match self.core().current_index() {
            Some(i) if i > 0 => self.remove(i - 1),
            _ => Ok(()),
        }
    }

    /// Keeps only the previous and current node.
    fn clear(&mut self) -> Result<(), NavigationError> {
        self.cut();
        self.clear_prior()
    }

    fn move_by(&mut self, _delta: f64) {}
    fn move_to(&mut self, _position: f64) {}
    fn set_speed(&mut self, _speed: f64) {}
    fn update(&mut self, _fps: f64) {}

    fn rotate(&mut self, _delta: RotationDelta) {}
    fn rotate_unbounded(&mut self, _delta: RotationDelta) {}
    fn rotate_without_inertia(&mut self, _delta: RotationDelta) {}
    fn rotate_basic(&mut self, _basic: DVec2) {}
    fn rotate_basic_unbounded(&mut self, _basic: DVec2) {}
    fn rotate_basic_without_inertia(&mut self, _basic: DVec2) {}
    fn rotate_to_basic(&mut self, _basic: DVec2) {}
    fn zoom_in(&mut self, _delta: f64, _reference: DVec2) {}
    fn set_center(&mut self, _center: DVec2) {}
    fn set_zoom(&mut self, _zoom: f64) {}

    fn dolly(&mut self, _delta: f64) {}
    fn orbit(&mut self, _rotation: RotationDelta) {}
    fn truck(&mut self, _direction: DVec3) {}
}

/// The active navigation mode.
#[derive(Clone, Debug)]
pub enum NavigationState {
    Traversing(TraversingState),
    Waiting(WaitingState),
    InteractiveWaiting(InteractiveWaitingState),
    Earth(EarthState),
}

impl NavigationState {
    /// Traversal from a fresh start, the orchestrator's initial mode.
    pub fn new(snapshot: &StateSnapshot) -> Result<Self, NavigationError> {
        Ok(NavigationState::Traversing(TraversingState::new(snapshot)?))
    }

    pub fn kind(&self) -> StateKind {
        match self {
            NavigationState::Traversing(_) => StateKind::Traversing,
            NavigationState::Waiting(_) => StateKind::Waiting,
            NavigationState::InteractiveWaiting(_) => StateKind::InteractiveWaiting,
            NavigationState::Earth(_) => StateKind::Earth,
        }
    }

    pub fn state(&self) -> &dyn State {
        match self {
            NavigationState::Traversing(s) => s,
            NavigationState::Waiting(s) => s,
            NavigationState::InteractiveWaiting(s) => s,
            NavigationState::Earth(s) => s,
        }
    }

    pub fn state_mut(&mut self) -> &mut dyn State {
        match self {
            NavigationState::Traversing(s) => s,
            NavigationState::Waiting(s) => s,
            NavigationState::InteractiveWaiting(s) => s,
            NavigationState::Earth(s) => s,
        }
    }

    #[inline]
    pub fn core(&self) -> &StateCore {
        self.state().core()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.core().snapshot()
    }

    // ---------------- Transitions ----------------

    pub fn traverse(&self) -> Result<NavigationState, NavigationError> {
        match self.kind() {
            StateKind::Waiting | StateKind::InteractiveWaiting | StateKind::Earth => {
                self.transition_to(StateKind::Traversing)
            }
            kind => Err(not_implemented(kind, "traverse")),
        }
    }

    pub fn wait(&self) -> Result<NavigationState, NavigationError> {
        match self.kind() {
            StateKind::Traversing | StateKind::InteractiveWaiting | StateKind::Earth => {
                self.transition_to(StateKind::Waiting)
            }
            kind => Err(not_implemented(kind, "wait")),
        }
    }

    pub fn wait_interactively(&self) -> Result<NavigationState, NavigationError> {
        match self.kind() {
            StateKind::Traversing | StateKind::Waiting | StateKind::Earth => {
                self.transition_to(StateKind::InteractiveWaiting)
            }
            kind => Err(not_implemented(kind, "wait_interactively")),
        }
    }

    pub fn earth(&self) -> Result<NavigationState, NavigationError> {
        match self.kind() {
            StateKind::Traversing => self.transition_to(StateKind::Earth),
            kind => Err(not_implemented(kind, "earth")),
        }
    }

    fn transition_to(&self, kind: StateKind) -> Result<NavigationState, NavigationError> {
        log::debug!("[state] {:?} -> {:?}", self.kind(), kind);
        let snapshot = self.snapshot();
        Ok(match kind {
            StateKind::Traversing => NavigationState::Traversing(TraversingState::new(&snapshot)?),
            StateKind::Waiting => NavigationState::Waiting(WaitingState::new(&snapshot)?),
            StateKind::InteractiveWaiting => {
                NavigationState::InteractiveWaiting(InteractiveWaitingState::new(&snapshot)?)
            }
            StateKind::Earth => NavigationState::Earth(EarthState::new(&snapshot)?),
        })
    }

    // ---------------- Queries ----------------

    pub fn alpha(&self) -> f64 {
        self.state().alpha()
    }

    pub fn camera(&self) -> &Camera {
        self.core().camera()
    }

    pub fn zoom(&self) -> f64 {
        self.core().zoom()
    }

    /// Zoom the smoothing is heading towards.
    pub fn desired_zoom(&self) -> f64 {
        self.state().desired_zoom()
    }

    pub fn reference(&self) -> LatLonAlt {
        self.core().reference()
    }

    pub fn trajectory(&self) -> &[Arc<Node>] {
        self.core().trajectory()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.core().current_index()
    }

    pub fn current_node(&self) -> Option<&Arc<Node>> {
        self.core().current_node()
    }

    pub fn previous_node(&self) -> Option<&Arc<Node>> {
        self.core().previous_node()
    }

    pub fn current_transform(&self) -> Option<&Transform> {
        self.core().current_transform()
    }

    pub fn previous_transform(&self) -> Option<&Transform> {
        self.core().previous_transform()
    }

    pub fn motionless(&self) -> bool {
        self.core().motionless()
    }

    pub fn transition_mode(&self) -> TransitionMode {
        self.core().transition_mode()
    }

    pub fn get_center(&self) -> DVec2 {
        self.core().get_center()
    }

    // ---------------- Forwarded operations ----------------

    pub fn set_transition_mode(&mut self, mode: TransitionMode) {
        self.state_mut().core_mut().set_transition_mode(mode);
    }

    pub fn append(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.state_mut().append(nodes)
    }

    pub fn prepend(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.state_mut().prepend(nodes)
    }

    pub fn remove(&mut self, n: usize) -> Result<(), NavigationError> {
        self.state_mut().remove(n)
    }

    pub fn cut(&mut self) {
        self.state_mut().cut();
    }

    pub fn clear_prior(&mut self) -> Result<(), NavigationError> {
        self.state_mut().clear_prior()
    }

    pub fn clear(&mut self) -> Result<(), NavigationError> {
        self.state_mut().clear()
    }

    pub fn set(&mut self, nodes: Vec<Arc<Node>>) -> Result<(), NavigationError> {
        self.state_mut().set(nodes)
    }

    pub fn move_by(&mut self, delta: f64) {
        self.state_mut().move_by(delta);
    }

    pub fn move_to(&mut self, position: f64) {
        self.state_mut().move_to(position);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.state_mut().set_speed(speed);
    }

    pub fn update(&mut self, fps: f64) {
        self.state_mut().update(fps);
    }

    pub fn rotate(&mut self, delta: RotationDelta) {
        self.state_mut().rotate(delta);
    }

    pub fn rotate_unbounded(&mut self, delta: RotationDelta) {
        self.state_mut().rotate_unbounded(delta);
    }

    pub fn rotate_without_inertia(&mut self, delta: RotationDelta) {
        self.state_mut().rotate_without_inertia(delta);
    }

    pub fn rotate_basic(&mut self, basic: DVec2) {
        self.state_mut().rotate_basic(basic);
    }

    pub fn rotate_basic_unbounded(&mut self, basic: DVec2) {
        self.state_mut().rotate_basic_unbounded(basic);
    }

    pub fn rotate_basic_without_inertia(&mut self, basic: DVec2) {
        self.state_mut().rotate_basic_without_inertia(basic);
    }

    pub fn rotate_to_basic(&mut self, basic: DVec2) {
        self.state_mut().rotate_to_basic(basic);
    }

    pub fn zoom_in(&mut self, delta: f64, reference: DVec2) {
        self.state_mut().zoom_in(delta, reference);
    }

    pub fn set_center(&mut self, center: DVec2) {
        self.state_mut().set_center(center);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.state_mut().set_zoom(zoom);
    }

    pub fn dolly(&mut self, delta: f64) {
        self.state_mut().dolly(delta);
    }

    pub fn orbit(&mut self, rotation: RotationDelta) {
        self.state_mut().orbit(rotation);
    }

    pub fn truck(&mut self, direction: DVec3) {
        self.state_mut().truck(direction);
    }
}

fn not_implemented(state: StateKind, transition: &'static str) -> NavigationError {
    NavigationError::NotImplemented { state, transition }
}
