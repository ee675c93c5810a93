//! Scenes, their lifecycle, and the scene stack
//!
//! A [`Scene`] owns one [`ObjectCollection`](crate::object::ObjectCollection)
//! and walks the lifecycle in [`lifecycle`]. Objects are produced by the
//! scene's [`SceneBehavior::generate_objects`] each time it is entered. The
//! [`SceneManager`] stacks scenes and applies transitions, immediately or
//! from a queue drained at frame boundaries.

pub mod declared;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod node;
pub mod registry;
pub mod snapshot;
pub mod transition;

pub use declared::{DeclaredScene, ObjectDecl, SceneDecl};
pub use error::{EmptyStackError, SceneError};
pub use lifecycle::{InvalidTransitionError, LifecycleAction, PausedRenderPolicy, SceneStatus};
pub use manager::SceneManager;
pub use node::{ObjectStream, Scene, SceneBehavior};
pub use registry::{SceneFactory, SceneRegistry};
pub use snapshot::{ObjectState, RestoreReport, SceneSnapshot, SnapshotEntry, SnapshotError};
pub use transition::{SceneTarget, TransitionRequest};
