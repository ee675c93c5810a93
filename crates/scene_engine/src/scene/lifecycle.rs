//! Scene lifecycle states and the legal moves between them
//!
//! ```text
//! Created --enter--> Entered --pause--> Paused
//!                    Entered <--resume-- Paused
//!                    Entered / Paused --exit--> Exited --enter--> Entered
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a scene is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneStatus {
    /// Constructed; no objects exist yet
    Created,
    /// Active: receives events, updates and render calls
    Entered,
    /// Suspended under another scene; objects kept alive
    Paused,
    /// Torn down; objects released
    Exited,
}

/// A lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    /// Materialize objects and become active
    Enter,
    /// Suspend
    Pause,
    /// Become active again
    Resume,
    /// Release everything
    Exit,
}

impl SceneStatus {
    /// Status after applying `action`, or `None` when the move is illegal
    pub fn after(self, action: LifecycleAction) -> Option<Self> {
        use LifecycleAction::{Enter, Exit, Pause, Resume};
        use SceneStatus::{Created, Entered, Exited, Paused};

        match (self, action) {
            (Created | Exited, Enter) => Some(Entered),
            (Entered, Pause) => Some(Paused),
            (Paused, Resume) => Some(Entered),
            (Entered | Paused, Exit) => Some(Exited),
            _ => None,
        }
    }

    /// Whether the scene currently owns live objects
    pub fn is_live(self) -> bool {
        matches!(self, SceneStatus::Entered | SceneStatus::Paused)
    }
}

impl fmt::Display for SceneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneStatus::Created => "created",
            SceneStatus::Entered => "entered",
            SceneStatus::Paused => "paused",
            SceneStatus::Exited => "exited",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleAction::Enter => "enter",
            LifecycleAction::Pause => "pause",
            LifecycleAction::Resume => "resume",
            LifecycleAction::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// A lifecycle operation was requested from a state that does not allow it
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot {action} scene `{scene}` while it is {from}")]
pub struct InvalidTransitionError {
    /// Scene name
    pub scene: String,
    /// Status at the time of the request
    pub from: SceneStatus,
    /// Requested operation
    pub action: LifecycleAction,
}

/// Whether paused scenes under the active one keep drawing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PausedRenderPolicy {
    /// Paused scenes draw beneath the active one (overlay menus)
    #[default]
    Render,
    /// Only the active scene draws
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use LifecycleAction::*;
        assert_eq!(SceneStatus::Created.after(Enter), Some(SceneStatus::Entered));
        assert_eq!(SceneStatus::Entered.after(Pause), Some(SceneStatus::Paused));
        assert_eq!(SceneStatus::Paused.after(Resume), Some(SceneStatus::Entered));
        assert_eq!(SceneStatus::Paused.after(Exit), Some(SceneStatus::Exited));
        assert_eq!(SceneStatus::Exited.after(Enter), Some(SceneStatus::Entered));
    }

    #[test]
    fn test_illegal_transitions() {
        use LifecycleAction::*;
        assert_eq!(SceneStatus::Entered.after(Enter), None);
        assert_eq!(SceneStatus::Paused.after(Enter), None);
        assert_eq!(SceneStatus::Created.after(Pause), None);
        assert_eq!(SceneStatus::Created.after(Exit), None);
        assert_eq!(SceneStatus::Entered.after(Resume), None);
        assert_eq!(SceneStatus::Exited.after(Exit), None);
    }

    #[test]
    fn test_error_message() {
        let err = InvalidTransitionError {
            scene: "menu".to_string(),
            from: SceneStatus::Entered,
            action: LifecycleAction::Enter,
        };
        assert_eq!(err.to_string(), "Cannot enter scene `menu` while it is entered");
    }
}
