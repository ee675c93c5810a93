//! Named scene factories

use std::collections::BTreeMap;
use std::rc::Rc;

use super::{DeclaredScene, Scene, SceneBehavior, SceneDecl, SceneError};
use crate::object::{ObjectRegistry, RegistryError};

/// Boxed scene constructor
pub type SceneFactory = Box<dyn Fn() -> Scene>;

/// Scenes by name
///
/// Every lookup builds a new `Created` scene, so entering a named scene twice
/// never shares state between the two instances.
#[derive(Default)]
pub struct SceneRegistry {
    factories: BTreeMap<String, SceneFactory>,
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("scenes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behaviour constructor under `name`
    pub fn register<F, B>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> B + 'static,
        B: SceneBehavior,
    {
        let name = name.into();
        let scene_name = name.clone();
        self.register_boxed(name, Box::new(move || Scene::new(scene_name.clone(), factory())))
    }

    /// Register an already boxed scene constructor
    pub fn register_boxed(&mut self, name: impl Into<String>, factory: SceneFactory) -> Result<(), RegistryError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered { kind: "scene", name });
        }
        log::debug!("Registered scene `{}`", name);
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Register a data-driven scene; every object kind must already exist
    pub fn register_declared(&mut self, decl: SceneDecl, objects: Rc<ObjectRegistry>) -> Result<(), SceneError> {
        decl.validate(&objects)?;
        let name = decl.name.clone();
        self.register(name, move || DeclaredScene::new(decl.clone(), Rc::clone(&objects)))?;
        Ok(())
    }

    /// Build a fresh scene
    pub fn create(&self, name: &str) -> Result<Scene, RegistryError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| RegistryError::NotRegistered {
                kind: "scene",
                name: name.to_string(),
            })
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered scenes
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
