//! Scenes described as data
//!
//! A [`SceneDecl`] lists object kinds by name; the scene generates them from
//! an [`ObjectRegistry`] every time it is entered.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{ObjectStream, SceneBehavior};
use crate::object::{ObjectId, ObjectRegistry, RegistryError};

/// One object of a declared scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDecl {
    /// Registered object kind
    pub kind: String,
    /// Fixed identity; generated when absent
    #[serde(default)]
    pub id: Option<String>,
}

/// A scene described as a list of object kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDecl {
    /// Scene name
    pub name: String,
    /// Objects in generation order
    #[serde(default)]
    pub objects: Vec<ObjectDecl>,
}

impl SceneDecl {
    /// Check that every kind is registered
    pub fn validate(&self, registry: &ObjectRegistry) -> Result<(), RegistryError> {
        match self.objects.iter().find(|decl| !registry.contains(&decl.kind)) {
            Some(decl) => Err(RegistryError::NotRegistered {
                kind: "object",
                name: decl.kind.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Scene behaviour backed by a [`SceneDecl`]
pub struct DeclaredScene {
    decl: SceneDecl,
    registry: Rc<ObjectRegistry>,
}

impl DeclaredScene {
    /// Pair a declaration with the registry its kinds come from
    pub fn new(decl: SceneDecl, registry: Rc<ObjectRegistry>) -> Self {
        Self { decl, registry }
    }
}

impl SceneBehavior for DeclaredScene {
    fn generate_objects(&mut self) -> ObjectStream<'_> {
        let registry = &self.registry;
        Box::new(self.decl.objects.iter().filter_map(move |decl| {
            match registry.spawn(&decl.kind, decl.id.clone().map(ObjectId::from)) {
                Ok(spawn) => Some(spawn),
                Err(err) => {
                    log::error!("Skipping declared object: {}", err);
                    None
                }
            }
        }))
    }
}
