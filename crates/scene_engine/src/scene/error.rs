//! Scene and scene-stack errors

use super::{InvalidTransitionError, SceneStatus, SnapshotError};
use crate::object::{CollectionError, RegistryError};

/// A stack operation needed a scene but the stack was empty
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot {operation}: the scene stack is empty")]
pub struct EmptyStackError {
    /// Operation that was attempted
    pub operation: &'static str,
}

/// Scene errors
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Illegal lifecycle move
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransitionError),

    /// Stack operation on an empty stack
    #[error(transparent)]
    EmptyStack(#[from] EmptyStackError),

    /// Unknown or duplicate scene name
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Generated objects could not be inserted
    #[error("Object generation failed: {0}")]
    Collection(#[from] CollectionError),

    /// Snapshot capture or replay failed
    #[error("Snapshot failed: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Operation needs live objects
    #[error("Scene `{scene}` has no live objects (status: {status})")]
    NotLive {
        /// Scene name
        scene: String,
        /// Status at the time of the request
        status: SceneStatus,
    },
}
