//! Object and collection errors

use super::ObjectId;
use crate::scene::SnapshotError;

/// Failure raised by an object callback
#[derive(thiserror::Error, Debug)]
pub enum ObjectError {
    /// Free-form failure
    #[error("{0}")]
    Message(String),

    /// The object found itself in a state it cannot act on
    #[error("Invalid object state: {0}")]
    InvalidState(String),

    /// Saving or loading object state failed
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl ObjectError {
    /// Free-form failure
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// An identity is already present in the collection
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Object `{id}` already exists in this collection")]
pub struct DuplicateObjectError {
    /// The rejected identity
    pub id: ObjectId,
}

/// Collection mutation errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Identity already present; the first instance is kept
    #[error(transparent)]
    Duplicate(#[from] DuplicateObjectError),

    /// The object exposes none of the capability traits
    #[error("Object `{0}` implements no capability")]
    NoCapabilities(ObjectId),
}
