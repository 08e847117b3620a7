//! Mutable view of an entity inside a document graph
//!
//! Entities in a graph are only mutated through [`EntityMut`], which keeps
//! the identifier index in step with owned attach and detach, checks
//! reference targets that live in the graph against the allowed types, and
//! applies the configured lower-bound policy to removals.

use super::Location;
use crate::config::EngineConfig;
use crate::entity::Entity;
use indexmap::IndexMap;
use propgraph_core::{Error, Identifier, PredicateTag, Result, Statement, TypeTag, Value};
use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use tracing::debug;

/// Mutable handle on one entity of a [`DocumentGraph`](super::DocumentGraph)
///
/// Dereferences to [`Entity`] for reading.
pub struct EntityMut<'g> {
    entity: &'g mut Entity,
    index: &'g mut HashMap<Identifier, Location>,
    unrecognized: &'g IndexMap<Identifier, Vec<Statement>>,
    config: &'g EngineConfig,
    location: Location,
}

impl<'g> EntityMut<'g> {
    pub(crate) fn new(
        entity: &'g mut Entity,
        index: &'g mut HashMap<Identifier, Location>,
        unrecognized: &'g IndexMap<Identifier, Vec<Statement>>,
        config: &'g EngineConfig,
        location: Location,
    ) -> Self {
        EntityMut {
            entity,
            index,
            unrecognized,
            config,
            location,
        }
    }

    /// Read-only access to the entity
    pub fn entity(&self) -> &Entity {
        &*self.entity
    }

    // ========================================================================
    // Scalar values
    // ========================================================================

    /// Replace the value of a singular scalar property
    pub fn set_value(
        &mut self,
        predicate: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        self.entity.set_value(predicate, value)
    }

    /// Append a value to a scalar property
    pub fn add_value(&mut self, predicate: impl AsRef<str>, value: impl Into<Value>) -> Result<()> {
        self.entity.add_value(predicate, value)
    }

    /// Remove a value from a scalar property
    ///
    /// Under the eager policy, fails with `Error::Cardinality` instead of
    /// leaving a required property empty.
    pub fn remove_value(&mut self, predicate: impl AsRef<str>, value: &Value) -> Result<bool> {
        let scalar = self.entity.scalar(&predicate)?;
        if !scalar.values().contains(value) {
            return Ok(false);
        }
        self.check_removal(&predicate)?;
        self.entity.remove_value(predicate, value)
    }

    // ========================================================================
    // References
    // ========================================================================

    /// Replace the target of a singular referenced property
    ///
    /// A target that lives in this graph must have an allowed type; other
    /// targets are accepted as external references.
    pub fn set_reference(
        &mut self,
        predicate: impl AsRef<str>,
        target: Identifier,
    ) -> Result<Option<Identifier>> {
        self.check_target(&predicate, &target)?;
        self.entity.set_reference(predicate, target)
    }

    /// Append a target to a referenced property
    pub fn add_reference(&mut self, predicate: impl AsRef<str>, target: Identifier) -> Result<()> {
        self.check_target(&predicate, &target)?;
        self.entity.add_reference(predicate, target)
    }

    /// Remove a target from a referenced property
    pub fn remove_reference(
        &mut self,
        predicate: impl AsRef<str>,
        target: &Identifier,
    ) -> Result<bool> {
        let referenced = self.entity.referenced(&predicate)?;
        if !referenced.values().contains(target) {
            return Ok(false);
        }
        self.check_removal(&predicate)?;
        self.entity.remove_reference(predicate, target)
    }

    /// The entity a singular referenced property points at, if it is in
    /// this graph
    pub fn resolve_reference(&self, predicate: impl AsRef<str>) -> Result<Option<Identifier>> {
        Ok(self
            .entity
            .reference(predicate)?
            .filter(|target| self.index.contains_key(*target))
            .cloned())
    }

    fn check_target(&self, predicate: impl AsRef<str>, target: &Identifier) -> Result<()> {
        let referenced = self.entity.referenced(predicate)?;
        match self.index.get(target) {
            Some(location) => referenced.check_type(&location.type_tag),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Owned children
    // ========================================================================

    /// Attach a detached entity under an owned property and index its subtree
    ///
    /// # Errors
    ///
    /// - `Error::OwnershipViolation` if the child already has an owner
    /// - `Error::TypeMismatch` if its type is not allowed
    /// - `Error::DuplicateIdentifier` if any identifier in its subtree is
    ///   already used in the graph
    /// - `Error::Cardinality` if the property is full
    pub fn add_owned(&mut self, predicate: impl AsRef<str>, child: Entity) -> Result<()> {
        self.entity.owned_property(&predicate)?.check_attach(&child)?;
        let entries = self.check_unique(&child, &HashSet::new())?;
        let owner = self.entity.identifier().clone();
        self.entity
            .owned_property_mut(&predicate)?
            .attach(&owner, child)?;
        self.register(entries);
        Ok(())
    }

    /// Replace the child of a singular owned property
    ///
    /// The previous child is returned detached and its subtree unindexed.
    pub fn set_owned(
        &mut self,
        predicate: impl AsRef<str>,
        child: Entity,
    ) -> Result<Option<Entity>> {
        let property = self.entity.owned_property(&predicate)?;
        property.check_attach(&child)?;
        let replaced: HashSet<Identifier> = match property.get()? {
            Some(previous) => previous.tree_ids().cloned().collect(),
            None => HashSet::new(),
        };
        let entries = self.check_unique(&child, &replaced)?;
        let owner = self.entity.identifier().clone();
        let previous = self
            .entity
            .owned_property_mut(&predicate)?
            .replace(&owner, child)?;
        for id in &replaced {
            self.index.remove(id);
        }
        self.register(entries);
        Ok(previous)
    }

    /// Detach a child from an owned property and unindex its subtree
    ///
    /// Under the eager policy, fails with `Error::Cardinality` instead of
    /// leaving a required property empty.
    pub fn remove_owned(
        &mut self,
        predicate: impl AsRef<str>,
        identifier: &Identifier,
    ) -> Result<Option<Entity>> {
        if self.entity.owned_property(&predicate)?.child(identifier).is_none() {
            return Ok(None);
        }
        self.check_removal(&predicate)?;
        let removed = self.entity.remove_owned(predicate, identifier)?;
        if let Some(child) = &removed {
            for id in child.tree_ids() {
                self.index.remove(id);
            }
            debug!(
                target: "propgraph::document",
                owner = %self.entity.identifier(),
                identifier = %identifier,
                "Detached owned entity"
            );
        }
        Ok(removed)
    }

    fn check_unique(
        &self,
        child: &Entity,
        replaced: &HashSet<Identifier>,
    ) -> Result<Vec<(Identifier, TypeTag)>> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for entity in std::iter::once(child).chain(child.descendants()) {
            let id = entity.identifier();
            let taken = (self.index.contains_key(id) && !replaced.contains(id))
                || self.unrecognized.contains_key(id);
            if taken || !seen.insert(id) {
                return Err(Error::DuplicateIdentifier(id.clone()));
            }
            entries.push((id.clone(), entity.type_tag().clone()));
        }
        Ok(entries)
    }

    fn register(&mut self, entries: Vec<(Identifier, TypeTag)>) {
        for (id, type_tag) in entries {
            self.index.insert(
                id,
                Location {
                    type_tag,
                    root: self.location.root.clone(),
                    root_type: self.location.root_type.clone(),
                },
            );
        }
    }

    // ========================================================================
    // Annotations and identifiers
    // ========================================================================

    /// Record a statement under an undeclared predicate
    pub fn annotate(&mut self, predicate: impl Into<PredicateTag>, value: impl Into<Value>) -> Result<()> {
        self.entity.annotate(predicate, value)
    }

    /// Drop the annotations under a predicate, returning them
    pub fn remove_annotations(&mut self, predicate: impl AsRef<str>) -> Vec<Value> {
        self.entity.remove_annotations(predicate)
    }

    /// Identifier for a new child of this entity
    ///
    /// The version falls back to this entity's version, then to the
    /// configured default version.
    pub fn compose_child_identifier(
        &self,
        local_name: &str,
        version: Option<&str>,
    ) -> Result<Identifier> {
        let version = version
            .or_else(|| self.entity.version())
            .or(self.config.default_version.as_deref());
        Identifier::compose(self.entity.identifier(), local_name, version)
    }

    fn check_removal(&self, predicate: impl AsRef<str>) -> Result<()> {
        if !self.config.cardinality.is_eager() {
            return Ok(());
        }
        let property = self.entity.property(predicate)?;
        let cardinality = property.cardinality();
        let remaining = property.len().saturating_sub(1);
        if remaining < cardinality.lower() {
            return Err(cardinality.violation(property.predicate(), remaining));
        }
        Ok(())
    }
}

impl Deref for EntityMut<'_> {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &*self.entity
    }
}
