use thiserror::Error;

use crate::state::StateKind;

/// Contract violations surfaced to the orchestrator.
///
/// None of these are retried internally: they signal that the caller broke a
/// precondition (empty node list, uncached assets, unsupported transition).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("trajectory can not be empty")]
    InvalidTrajectoryOperation,

    #[error("can not remove {count} trajectory entries: {reason}")]
    InvalidRemoval { count: i64, reason: &'static str },

    #[error("assets must be cached when node {node_id} is added to the trajectory")]
    UncachedAsset { node_id: String },

    #[error("{state:?} state does not support the {transition} transition")]
    NotImplemented {
        state: StateKind,
        transition: &'static str,
    },
}

impl NavigationError {
    pub fn negative_removal(count: i64) -> Self {
        NavigationError::InvalidRemoval {
            count,
            reason: "count must not be negative",
        }
    }
}
