//! Entity registry
//!
//! Maps type tags to constructors so deserialization can instantiate the
//! right entity type for a subject without hardcoding any domain types.
//! A registry is built once during setup and then shared read-only by every
//! load.
//!
//! ## Usage
//!
//! ```
//! use propgraph_core::{Identifier, TypeTag};
//! use propgraph_engine::{Cardinality, EntityRegistry, EntitySchema, LiteralKind};
//!
//! let mut registry = EntityRegistry::new();
//! registry.register_schema(
//!     EntitySchema::new("http://example.org/Part")
//!         .scalar("http://example.org/name", LiteralKind::Text, Cardinality::OPTIONAL),
//! );
//!
//! let part = registry
//!     .create(
//!         &TypeTag::new("http://example.org/Part"),
//!         Identifier::new("http://example.org/p1").unwrap(),
//!     )
//!     .unwrap();
//! assert!(part.has_property("http://example.org/name"));
//! ```

use crate::entity::Entity;
use crate::schema::EntitySchema;
use indexmap::IndexMap;
use propgraph_core::{Error, Identifier, Result, TypeTag};
use std::fmt;
use tracing::debug;

/// Constructor building an empty entity of one type
pub type Constructor = Box<dyn Fn(Identifier) -> Result<Entity> + Send + Sync>;

/// Registry of entity constructors keyed by type tag
///
/// Registration order is kept, so [`EntityRegistry::type_tags`] is stable.
pub struct EntityRegistry {
    constructors: IndexMap<TypeTag, Constructor>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        EntityRegistry {
            constructors: IndexMap::new(),
        }
    }

    /// Register a constructor for a type tag
    ///
    /// Registering a tag again replaces the earlier constructor, which is
    /// returned.
    pub fn register<F>(&mut self, type_tag: impl Into<TypeTag>, constructor: F) -> Option<Constructor>
    where
        F: Fn(Identifier) -> Result<Entity> + Send + Sync + 'static,
    {
        let type_tag = type_tag.into();
        debug!(target: "propgraph::registry", type_tag = %type_tag, "Registered entity type");
        self.constructors.insert(type_tag, Box::new(constructor))
    }

    /// Register a schema; entities are built with [`EntitySchema::instantiate`]
    pub fn register_schema(&mut self, schema: EntitySchema) -> Option<Constructor> {
        let type_tag = schema.type_tag().clone();
        self.register(type_tag, move |identifier| schema.instantiate(identifier))
    }

    /// Build an empty entity of the given type
    ///
    /// # Errors
    ///
    /// - `Error::UnknownType` if no constructor is registered for the tag, or
    ///   the constructor built an entity of another type
    /// - whatever the constructor itself returns
    pub fn create(&self, type_tag: &TypeTag, identifier: Identifier) -> Result<Entity> {
        let constructor = self
            .constructors
            .get(type_tag)
            .ok_or_else(|| Error::UnknownType(type_tag.clone()))?;
        let entity = constructor(identifier)?;
        if entity.type_tag() != type_tag {
            return Err(Error::UnknownType(type_tag.clone()));
        }
        Ok(entity)
    }

    /// Check if a type tag is registered
    pub fn is_registered(&self, type_tag: &TypeTag) -> bool {
        self.constructors.contains_key(type_tag)
    }

    /// Unregister a type tag, returning its constructor
    pub fn unregister(&mut self, type_tag: &TypeTag) -> Option<Constructor> {
        self.constructors.shift_remove(type_tag)
    }

    /// Registered type tags in registration order
    pub fn type_tags(&self) -> impl Iterator<Item = &TypeTag> + '_ {
        self.constructors.keys()
    }

    /// Get the number of registered types
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("type_tags", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
