//! Camera navigation through a sequence of street-level images.
//!
//! A [`NavigationState`] owns the trajectory of [`Node`]s being viewed and
//! produces the [`Camera`] to render each frame. Callers feed it nodes,
//! input deltas and a frame rate; rendering and asset loading happen
//! elsewhere.

pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod node;
pub mod rotation;
pub mod smoothing;
pub mod state;

pub use config::{NavigationParams, SmoothingParams};
pub use error::NavigationError;
pub use geo::{Camera, Transform};
pub use node::{GPano, LatLon, LatLonAlt, Node};
pub use rotation::RotationDelta;
pub use smoothing::{BasicStep, MotionBuffer, PendingMotion};
pub use state::{
    CenterPolicy, EarthState, InteractiveSmoothing, InteractiveWaitingState, NavigationState,
    State, StateCore, StateKind, StateSnapshot, TransitionMode, TraversingState, WaitingState,
};
