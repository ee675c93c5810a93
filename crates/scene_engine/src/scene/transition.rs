//! Deferred scene-stack requests

use std::fmt;

use super::Scene;

/// Scene to transition to: a registered name or a constructed scene
pub enum SceneTarget {
    /// Look up in the scene registry
    Named(String),
    /// Use this scene as is
    Scene(Box<Scene>),
}

impl fmt::Debug for SceneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneTarget::Named(name) => f.debug_tuple("Named").field(name).finish(),
            SceneTarget::Scene(scene) => f.debug_tuple("Scene").field(&scene.name()).finish(),
        }
    }
}

impl From<&str> for SceneTarget {
    fn from(name: &str) -> Self {
        SceneTarget::Named(name.to_string())
    }
}

impl From<String> for SceneTarget {
    fn from(name: String) -> Self {
        SceneTarget::Named(name)
    }
}

impl From<Scene> for SceneTarget {
    fn from(scene: Scene) -> Self {
        SceneTarget::Scene(Box::new(scene))
    }
}

/// A scene-stack change to apply at the next frame boundary
#[derive(Debug)]
pub enum TransitionRequest {
    /// Replace the active scene
    SwitchTo(SceneTarget),
    /// Pause the active scene and enter another on top
    Push(SceneTarget),
    /// Exit the active scene and resume the one beneath
    Pop,
    /// Exit every scene and start over with one
    Reset(SceneTarget),
    /// Exit and re-enter the active scene
    ReloadActive,
}
