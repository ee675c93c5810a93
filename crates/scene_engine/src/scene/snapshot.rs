//! Scene snapshots
//!
//! A snapshot is the list of per-object states a scene's objects chose to
//! save, keyed by identity. State is stored as RON text so any serde type can
//! take part and the whole snapshot can be written to disk.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::object::{ObjectCollection, ObjectId};

/// Snapshot errors
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// State could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// State could not be deserialized
    #[error("Decode error: {0}")]
    Decode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot belongs to a different scene
    #[error("Snapshot of `{found}` cannot be restored into `{expected}`")]
    SceneMismatch {
        /// Scene being restored
        expected: String,
        /// Scene the snapshot was taken from
        found: String,
    },
}

/// Serialized state of one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectState(String);

impl ObjectState {
    /// Serialize `value`
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, SnapshotError> {
        ron::to_string(value)
            .map(Self)
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Deserialize into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, SnapshotError> {
        ron::from_str(&self.0).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Raw RON text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One saved object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Identity the state belongs to
    pub id: ObjectId,
    /// Type name at capture time
    pub type_name: String,
    /// Saved state
    pub state: ObjectState,
}

/// What a restore did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Objects whose state was replaced
    pub restored: Vec<ObjectId>,
    /// Entries with no live object of that identity
    pub missing: Vec<ObjectId>,
    /// Entries whose live object has a different type
    pub mismatched: Vec<ObjectId>,
}

/// Saved object states of one scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Scene the snapshot was taken from
    pub scene: String,
    /// Saved objects in collection order
    pub entries: Vec<SnapshotEntry>,
}

impl SceneSnapshot {
    /// Capture every object that opts in
    pub fn capture(scene: &str, objects: &ObjectCollection) -> Result<Self, SnapshotError> {
        let mut entries = Vec::new();
        for (id, object) in objects.iter() {
            if let Some(state) = object.save_state()? {
                entries.push(SnapshotEntry {
                    id: id.clone(),
                    type_name: object.type_name().to_string(),
                    state,
                });
            }
        }
        log::debug!("Captured {} of {} objects in `{}`", entries.len(), objects.len(), scene);
        Ok(Self {
            scene: scene.to_string(),
            entries,
        })
    }

    /// Replay saved states onto live objects with matching identities
    ///
    /// Only `load_state` is called; the objects themselves, and therefore
    /// their capability sets, stay in place. Either every matching entry is
    /// restored or, on the first failure, the objects already touched get
    /// their previous state back and the error is returned.
    pub fn apply(&self, scene: &str, objects: &mut ObjectCollection) -> Result<RestoreReport, SnapshotError> {
        if self.scene != scene {
            return Err(SnapshotError::SceneMismatch {
                expected: scene.to_string(),
                found: self.scene.clone(),
            });
        }

        let mut report = RestoreReport::default();
        let mut undo: Vec<(ObjectId, ObjectState)> = Vec::new();
        for entry in &self.entries {
            let Some(object) = objects.get_mut(&entry.id) else {
                log::warn!("Snapshot entry `{}` has no live object in `{}`", entry.id, scene);
                report.missing.push(entry.id.clone());
                continue;
            };
            if object.type_name() != entry.type_name {
                log::warn!(
                    "Snapshot entry `{}` was a {}, live object is a {}",
                    entry.id,
                    entry.type_name,
                    object.type_name()
                );
                report.mismatched.push(entry.id.clone());
                continue;
            }
            let result = object.save_state().and_then(|previous| {
                if let Some(previous) = previous {
                    undo.push((entry.id.clone(), previous));
                }
                object.load_state(&entry.state)
            });
            if let Err(err) = result {
                log::error!("Restoring `{}` in `{}` failed, rolling back: {}", entry.id, scene, err);
                Self::roll_back(objects, undo);
                return Err(err);
            }
            report.restored.push(entry.id.clone());
        }
        Ok(report)
    }

    fn roll_back(objects: &mut ObjectCollection, undo: Vec<(ObjectId, ObjectState)>) {
        for (id, state) in undo.into_iter().rev() {
            let Some(object) = objects.get_mut(&id) else {
                continue;
            };
            if let Err(err) = object.load_state(&state) {
                log::error!("Could not roll back `{}`: {}", id, err);
            }
        }
    }

    /// Saved state for `id`
    pub fn get(&self, id: &ObjectId) -> Option<&ObjectState> {
        self.entries.iter().find(|entry| &entry.id == id).map(|entry| &entry.state)
    }

    /// Number of saved objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no object was saved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as pretty RON
    pub fn to_ron(&self) -> Result<String, SnapshotError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Parse from RON
    pub fn from_ron(text: &str) -> Result<Self, SnapshotError> {
        ron::from_str(text).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Write to `path` as RON
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Read a snapshot written by [`save_to_file`](Self::save_to_file)
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_ron(&std::fs::read_to_string(path)?)
    }
}
