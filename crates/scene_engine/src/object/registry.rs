//! Named object factories
//!
//! Lets scenes be described as data: a declaration names object kinds and the
//! registry turns each kind into a fresh instance.

use std::collections::BTreeMap;

use super::{GameObject, ObjectId, Spawn};

/// Registry lookup errors, shared by object and scene registries
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is taken
    #[error("{kind} `{name}` is already registered")]
    AlreadyRegistered {
        /// What was being registered ("object", "scene")
        kind: &'static str,
        /// The name
        name: String,
    },

    /// Nothing is registered under the name
    #[error("{kind} `{name}` is not registered")]
    NotRegistered {
        /// What was being looked up ("object", "scene")
        kind: &'static str,
        /// The name
        name: String,
    },
}

/// Boxed object constructor
pub type ObjectFactory = Box<dyn Fn() -> Box<dyn GameObject>>;

/// Object kinds by name
#[derive(Default)]
pub struct ObjectRegistry {
    factories: BTreeMap<String, ObjectFactory>,
}

impl std::fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`
    pub fn register<F, O>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> O + 'static,
        O: GameObject,
    {
        self.register_boxed(name, Box::new(move || Box::new(factory()) as Box<dyn GameObject>))
    }

    /// Register an already boxed constructor
    pub fn register_boxed(&mut self, name: impl Into<String>, factory: ObjectFactory) -> Result<(), RegistryError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered { kind: "object", name });
        }
        log::debug!("Registered object kind `{}`", name);
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Build a fresh instance of `name`
    pub fn create(&self, name: &str) -> Result<Box<dyn GameObject>, RegistryError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| RegistryError::NotRegistered {
                kind: "object",
                name: name.to_string(),
            })
    }

    /// Build a spawn request for `name`
    pub fn spawn(&self, name: &str, id: Option<ObjectId>) -> Result<Spawn, RegistryError> {
        self.create(name).map(|object| Spawn::boxed(id, object))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
