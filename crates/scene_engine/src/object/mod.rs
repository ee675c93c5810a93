//! Objects and their capabilities
//!
//! A [`GameObject`] is any `'static` type that exposes one or more of the
//! capability traits through the `as_*` accessors. Most types only need the
//! [`game_object!`](crate::game_object) macro:
//!
//! ```rust,ignore
//! struct Blinker { on: bool }
//!
//! impl Logical for Blinker {
//!     fn update(&mut self, _elapsed: f32, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
//!         self.on = !self.on;
//!         Ok(())
//!     }
//! }
//!
//! game_object!(Blinker: Logical);
//! ```
//!
//! Types that take part in scene snapshots implement [`GameObject`] by hand
//! and override `save_state`/`load_state`.

pub mod capability;
pub mod collection;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scene::{ObjectState, SnapshotError};

pub use capability::{Capabilities, Capability, Drawable, Eventful, Logical};
pub use collection::{FlushReport, ObjectCollection, ObjectKey, Spawn};
pub use context::{CommandBuffer, FrameEnv, LoopContext, ObjectCommand, ObjectContext};
pub use dispatch::{CapabilityDispatchError, FailurePolicy, PassReport};
pub use error::{CollectionError, DuplicateObjectError, ObjectError};
pub use registry::{ObjectRegistry, RegistryError};

/// Result of an object callback
pub type ObjectResult = Result<(), ObjectError>;

/// Identity of an object within its collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Identity from a name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Identity generated for the `n`th anonymous object of a collection
    pub fn anonymous(n: u64) -> Self {
        Self(format!("#{n}"))
    }

    /// Whether this identity was generated
    pub fn is_anonymous(&self) -> bool {
        self.0.starts_with('#')
    }

    /// The identity as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ObjectId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&ObjectId> for ObjectId {
    fn from(id: &ObjectId) -> Self {
        id.clone()
    }
}

/// An entity managed by a scene
///
/// Every accessor defaults to "not supported". The capability set is probed
/// once when the object is inserted, so the accessors must answer the same
/// way for the object's whole life.
pub trait GameObject: 'static {
    /// Drawable view, if supported
    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        None
    }

    /// Logical view, if supported
    fn as_logical(&mut self) -> Option<&mut dyn Logical> {
        None
    }

    /// Eventful view, if supported
    fn as_eventful(&mut self) -> Option<&mut dyn Eventful> {
        None
    }

    /// Serializable state for snapshots; `None` opts out
    fn save_state(&self) -> Result<Option<ObjectState>, SnapshotError> {
        Ok(None)
    }

    /// Replace internal state from a snapshot entry
    fn load_state(&mut self, state: &ObjectState) -> Result<(), SnapshotError> {
        let _ = state;
        Ok(())
    }

    /// Human-readable type name for logs
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Implement [`GameObject`] by listing the capability traits a type implements
#[macro_export]
macro_rules! game_object {
    (@accessor Drawable) => {
        fn as_drawable(&mut self) -> Option<&mut dyn $crate::object::Drawable> {
            Some(self)
        }
    };
    (@accessor Logical) => {
        fn as_logical(&mut self) -> Option<&mut dyn $crate::object::Logical> {
            Some(self)
        }
    };
    (@accessor Eventful) => {
        fn as_eventful(&mut self) -> Option<&mut dyn $crate::object::Eventful> {
            Some(self)
        }
    };
    ($ty:ty : $($cap:ident),+ $(,)?) => {
        impl $crate::object::GameObject for $ty {
            $( $crate::game_object!(@accessor $cap); )+
        }
    };
}
