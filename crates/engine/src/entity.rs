//! Entities
//!
//! An entity is an identified, typed node carrying an ordered set of
//! properties. Entities form trees through owned properties: a child lives
//! inside its owner's property and carries an [`OwnerLink`] back-pointer
//! naming the parent and the predicate it sits under. The back-pointer is
//! informational; the owner holds the only copy of the child.
//!
//! Statements about an entity's subject whose predicate is not declared are
//! kept as annotations and written back on serialization.

use crate::document::load::LoadContext;
use crate::property::{OwnedProperty, Property, ReferencedProperty, ScalarProperty};
use crate::schema::PropertyDecl;
use indexmap::IndexMap;
use propgraph_core::vocab::{PERSISTENT_IDENTITY, VERSION};
use propgraph_core::{
    Error, Identifier, PredicateTag, Result, Statement, StatementStore, TypeTag, Value,
};
use tracing::{trace, warn};

/// Back-pointer from an owned entity to its owner
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerLink {
    /// Identifier of the owning entity
    pub parent: Identifier,
    /// Predicate of the owned property holding the entity
    pub predicate: PredicateTag,
}

/// An identified, typed node with declared properties
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    identifier: Identifier,
    type_tag: TypeTag,
    owner: Option<OwnerLink>,
    properties: IndexMap<PredicateTag, Property>,
    annotations: IndexMap<PredicateTag, Vec<Value>>,
}

impl Entity {
    /// Create an entity with no properties declared
    ///
    /// Domain code normally goes through
    /// [`EntitySchema::instantiate`](crate::schema::EntitySchema::instantiate)
    /// or the registry instead.
    pub fn new(identifier: Identifier, type_tag: TypeTag) -> Self {
        Entity {
            identifier,
            type_tag,
            owner: None,
            properties: IndexMap::new(),
            annotations: IndexMap::new(),
        }
    }

    /// Attach an empty property built from its declaration
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateProperty` if the predicate is already declared.
    pub fn declare_property(&mut self, decl: PropertyDecl) -> Result<()> {
        if self.properties.contains_key(&decl.predicate) {
            return Err(Error::DuplicateProperty {
                type_tag: self.type_tag.clone(),
                predicate: decl.predicate,
            });
        }
        let property = Property::from_decl(&decl);
        self.properties.insert(decl.predicate, property);
        Ok(())
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// Identifier of this entity
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Resource type of this entity
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    /// Owner back-pointer; `None` for detached and top-level entities
    pub fn owner(&self) -> Option<&OwnerLink> {
        self.owner.as_ref()
    }

    pub(crate) fn set_owner(&mut self, owner: Option<OwnerLink>) {
        self.owner = owner;
    }

    /// Last segment of the persistent identity
    pub fn display_id(&self) -> &str {
        self.identifier.display_id()
    }

    /// Identifier minus its version segment
    pub fn persistent_identity(&self) -> &str {
        self.identifier.persistent_identity()
    }

    /// Version segment of the identifier
    pub fn version(&self) -> Option<&str> {
        self.identifier.version()
    }

    /// Identifier for a new child: `persistent/local_name[/version]`
    ///
    /// With no explicit version the child inherits this entity's version.
    pub fn compose_child_identifier(
        &self,
        local_name: &str,
        version: Option<&str>,
    ) -> Result<Identifier> {
        Identifier::compose(
            &self.identifier,
            local_name,
            version.or_else(|| self.identifier.version()),
        )
    }

    // ========================================================================
    // Property access
    // ========================================================================

    /// Declared property for a predicate
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProperty` if nothing is declared under it.
    pub fn property(&self, predicate: impl AsRef<str>) -> Result<&Property> {
        let predicate = predicate.as_ref();
        self.properties
            .get(predicate)
            .ok_or_else(|| self.unknown_property(predicate))
    }

    /// Declared property for a predicate, mutably
    ///
    /// Owned properties are read-only through this handle; attach and detach
    /// children with [`Entity::add_owned`] and [`Entity::remove_owned`].
    pub fn property_mut(&mut self, predicate: impl AsRef<str>) -> Result<&mut Property> {
        let predicate = predicate.as_ref();
        self.properties
            .get_mut(predicate)
            .ok_or_else(|| Error::UnknownProperty {
                type_tag: self.type_tag.clone(),
                predicate: PredicateTag::new(predicate),
            })
    }

    /// Whether a property is declared under the predicate
    pub fn has_property(&self, predicate: impl AsRef<str>) -> bool {
        self.properties.contains_key(predicate.as_ref())
    }

    /// Declared properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties.values()
    }

    fn unknown_property(&self, predicate: &str) -> Error {
        Error::UnknownProperty {
            type_tag: self.type_tag.clone(),
            predicate: PredicateTag::new(predicate),
        }
    }

    /// The scalar property under a predicate
    pub fn scalar(&self, predicate: impl AsRef<str>) -> Result<&ScalarProperty> {
        let property = self.property(predicate)?;
        property
            .as_scalar()
            .ok_or_else(|| variant_mismatch(property, "scalar property"))
    }

    /// The scalar property under a predicate, mutably
    pub fn scalar_mut(&mut self, predicate: impl AsRef<str>) -> Result<&mut ScalarProperty> {
        let property = self.property_mut(predicate)?;
        match property {
            Property::Scalar(p) => Ok(p),
            other => Err(variant_mismatch(other, "scalar property")),
        }
    }

    /// The referenced property under a predicate
    pub fn referenced(&self, predicate: impl AsRef<str>) -> Result<&ReferencedProperty> {
        let property = self.property(predicate)?;
        property
            .as_referenced()
            .ok_or_else(|| variant_mismatch(property, "referenced property"))
    }

    /// The referenced property under a predicate, mutably
    pub fn referenced_mut(&mut self, predicate: impl AsRef<str>) -> Result<&mut ReferencedProperty> {
        let property = self.property_mut(predicate)?;
        match property {
            Property::Referenced(p) => Ok(p),
            other => Err(variant_mismatch(other, "referenced property")),
        }
    }

    /// The owned property under a predicate
    pub fn owned_property(&self, predicate: impl AsRef<str>) -> Result<&OwnedProperty> {
        let property = self.property(predicate)?;
        property
            .as_owned()
            .ok_or_else(|| variant_mismatch(property, "owned property"))
    }

    pub(crate) fn owned_property_mut(
        &mut self,
        predicate: impl AsRef<str>,
    ) -> Result<&mut OwnedProperty> {
        let property = self.property_mut(predicate)?;
        match property {
            Property::Owned(p) => Ok(p),
            other => Err(variant_mismatch(other, "owned property")),
        }
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
        self.scalar_mut(predicate)?.set(value)
    }

    /// Append a value to a scalar property
    pub fn add_value(&mut self, predicate: impl AsRef<str>, value: impl Into<Value>) -> Result<()> {
        self.scalar_mut(predicate)?.add(value)
    }

    /// The value of a singular scalar property
    pub fn value(&self, predicate: impl AsRef<str>) -> Result<Option<&Value>> {
        self.scalar(predicate)?.get()
    }

    /// All values of a scalar property
    pub fn values(&self, predicate: impl AsRef<str>) -> Result<&[Value]> {
        Ok(self.scalar(predicate)?.values())
    }

    /// Remove a value from a scalar property
    pub fn remove_value(&mut self, predicate: impl AsRef<str>, value: &Value) -> Result<bool> {
        Ok(self.scalar_mut(predicate)?.remove(value))
    }

    // ========================================================================
    // References
    // ========================================================================

    /// Replace the target of a singular referenced property
    ///
    /// A detached entity cannot check the target's type; the document graph
    /// does when the entity lives in one.
    pub fn set_reference(
        &mut self,
        predicate: impl AsRef<str>,
        target: Identifier,
    ) -> Result<Option<Identifier>> {
        self.referenced_mut(predicate)?.set(target)
    }

    /// Append a target to a referenced property
    pub fn add_reference(&mut self, predicate: impl AsRef<str>, target: Identifier) -> Result<()> {
        self.referenced_mut(predicate)?.add(target)
    }

    /// The target of a singular referenced property
    pub fn reference(&self, predicate: impl AsRef<str>) -> Result<Option<&Identifier>> {
        self.referenced(predicate)?.get()
    }

    /// All targets of a referenced property
    pub fn references(&self, predicate: impl AsRef<str>) -> Result<&[Identifier]> {
        Ok(self.referenced(predicate)?.values())
    }

    /// Remove a target from a referenced property
    pub fn remove_reference(
        &mut self,
        predicate: impl AsRef<str>,
        target: &Identifier,
    ) -> Result<bool> {
        Ok(self.referenced_mut(predicate)?.remove(target))
    }

    // ========================================================================
    // Owned children
    // ========================================================================

    /// Attach a detached entity under an owned property
    ///
    /// # Errors
    ///
    /// - `Error::OwnershipViolation` if the child already has an owner
    /// - `Error::TypeMismatch` if its type is not allowed
    /// - `Error::DuplicateIdentifier` if any identifier in its subtree is
    ///   already used in this entity's subtree
    /// - `Error::Cardinality` if the property is full
    ///
    /// On error the child is dropped and this entity is unchanged.
    pub fn add_owned(&mut self, predicate: impl AsRef<str>, child: Entity) -> Result<()> {
        self.owned_property(&predicate)?.check_attach(&child)?;
        self.check_unique(&child)?;
        let owner = self.identifier.clone();
        self.owned_property_mut(predicate)?.attach(&owner, child)
    }

    /// Replace the child of a singular owned property
    ///
    /// Returns the previous child, detached.
    pub fn set_owned(&mut self, predicate: impl AsRef<str>, child: Entity) -> Result<Option<Entity>> {
        let property = self.owned_property(&predicate)?;
        property.check_attach(&child)?;
        let previous = property.get()?.map(Entity::identifier);
        for id in child.tree_ids() {
            if Some(id) != previous && self.find(id).is_some() {
                return Err(Error::DuplicateIdentifier(id.clone()));
            }
        }
        let owner = self.identifier.clone();
        self.owned_property_mut(predicate)?.replace(&owner, child)
    }

    /// Detach a child from an owned property and hand it back
    ///
    /// Returns `Ok(None)` if no child with that identifier is held there.
    pub fn remove_owned(
        &mut self,
        predicate: impl AsRef<str>,
        identifier: &Identifier,
    ) -> Result<Option<Entity>> {
        Ok(self.owned_property_mut(predicate)?.detach(identifier))
    }

    /// Children held under an owned property
    pub fn owned(&self, predicate: impl AsRef<str>) -> Result<&[Entity]> {
        Ok(self.owned_property(predicate)?.children())
    }

    /// The child of a singular owned property
    pub fn owned_one(&self, predicate: impl AsRef<str>) -> Result<Option<&Entity>> {
        self.owned_property(predicate)?.get()
    }

    fn check_unique(&self, child: &Entity) -> Result<()> {
        for id in child.tree_ids() {
            if self.find(id).is_some() {
                return Err(Error::DuplicateIdentifier(id.clone()));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Record a statement under a predicate this entity does not declare
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateProperty` if the predicate is declared.
    pub fn annotate(&mut self, predicate: impl Into<PredicateTag>, value: impl Into<Value>) -> Result<()> {
        let predicate = predicate.into();
        if self.properties.contains_key(&predicate) {
            return Err(Error::DuplicateProperty {
                type_tag: self.type_tag.clone(),
                predicate,
            });
        }
        self.annotations
            .entry(predicate)
            .or_default()
            .push(value.into());
        Ok(())
    }

    /// Annotation values under one predicate
    pub fn annotation(&self, predicate: impl AsRef<str>) -> &[Value] {
        self.annotations
            .get(predicate.as_ref())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every annotation in first-seen order
    pub fn annotations(&self) -> impl Iterator<Item = (&PredicateTag, &[Value])> + '_ {
        self.annotations.iter().map(|(p, v)| (p, v.as_slice()))
    }

    /// Drop the annotations under a predicate, returning them
    pub fn remove_annotations(&mut self, predicate: impl AsRef<str>) -> Vec<Value> {
        self.annotations
            .shift_remove(predicate.as_ref())
            .unwrap_or_default()
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Direct children across every owned property, in declaration order
    pub fn children(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.properties
            .values()
            .filter_map(Property::as_owned)
            .flat_map(|p| p.children().iter())
    }

    /// Every owned entity below this one, pre-order
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Entity> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Identifiers of this entity and every descendant, pre-order
    pub fn tree_ids(&self) -> impl Iterator<Item = &Identifier> + '_ {
        std::iter::once(&self.identifier).chain(self.descendants().map(Entity::identifier))
    }

    /// This entity or a descendant with the given identifier
    pub fn find(&self, identifier: &Identifier) -> Option<&Entity> {
        if &self.identifier == identifier {
            return Some(self);
        }
        self.descendants().find(|e| &e.identifier == identifier)
    }

    /// This entity or a descendant with the given identifier, mutably
    pub fn find_mut(&mut self, identifier: &Identifier) -> Option<&mut Entity> {
        if &self.identifier == identifier {
            return Some(self);
        }
        for property in self.properties.values_mut() {
            if let Some(owned) = property.as_owned_mut() {
                for child in owned.children_mut() {
                    if let Some(found) = child.find_mut(identifier) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    // ========================================================================
    // Validation and serialization
    // ========================================================================

    /// Check every property's bounds, recursively through owned children
    pub fn validate(&self) -> Result<()> {
        for property in self.properties.values() {
            property.validate()?;
        }
        for child in self.children() {
            child.validate()?;
        }
        Ok(())
    }

    /// Write this entity and its subtree as statements
    ///
    /// The type statement comes first, followed for a versioned identifier
    /// by its persistent identity and version, then each property in
    /// declaration order, then annotations. Owned children are written before the
    /// statement linking them. The subtree is validated before anything is
    /// written, so a failed call leaves the store untouched.
    pub fn serialize_into(&self, store: &mut StatementStore) -> Result<()> {
        self.validate()?;
        self.emit(store)
    }

    pub(crate) fn emit(&self, store: &mut StatementStore) -> Result<()> {
        store.add(Statement::type_of(self.identifier.clone(), &self.type_tag));
        if let Some(version) = self.identifier.version() {
            let persistent = Identifier::new(self.identifier.persistent_identity())?;
            store.add(Statement::new(
                self.identifier.clone(),
                PredicateTag::new(PERSISTENT_IDENTITY),
                persistent,
            ));
            store.add(Statement::new(
                self.identifier.clone(),
                PredicateTag::new(VERSION),
                version,
            ));
        }
        for property in self.properties.values() {
            match property {
                Property::Owned(owned) => owned.emit_into(store, &self.identifier)?,
                other => other.serialize_into(store, &self.identifier)?,
            }
        }
        for (predicate, values) in &self.annotations {
            for value in values {
                store.add(Statement::new(
                    self.identifier.clone(),
                    predicate.clone(),
                    value.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Populate every declared property from statements about this entity
    ///
    /// Held values are cleared first. Owned children are instantiated through
    /// the context's registry and populated recursively. Statements under
    /// undeclared predicates, extra type statements and owned links whose
    /// target cannot be instantiated become annotations.
    pub fn deserialize_from(
        &mut self,
        store: &StatementStore,
        ctx: &mut LoadContext<'_>,
    ) -> Result<()> {
        self.annotations.clear();
        let subject = self.identifier.clone();
        for property in self.properties.values_mut() {
            match property {
                Property::Scalar(p) => p.deserialize_from(store, &subject)?,
                Property::Referenced(p) => {
                    p.deserialize_from(store, &subject, |target| ctx.type_of(target))?
                }
                Property::Owned(p) => {
                    let unresolved = p.deserialize_from(store, &subject, ctx)?;
                    if !unresolved.is_empty() {
                        warn!(
                            target: "propgraph::entity",
                            owner = %subject,
                            predicate = %p.predicate(),
                            count = unresolved.len(),
                            "Owned link not attached, kept as annotation"
                        );
                        let slot = self.annotations.entry(p.predicate().clone()).or_default();
                        slot.extend(unresolved.into_iter().map(Value::Resource));
                    }
                }
            }
        }

        let mut own_type_seen = false;
        let mut split = VersionSplit::of(&subject);
        for stmt in store.statements_for(&subject) {
            if self.properties.contains_key(&stmt.predicate) {
                continue;
            }
            if !own_type_seen && stmt.declared_type().as_ref() == Some(&self.type_tag) {
                own_type_seen = true;
                continue;
            }
            if split.consume(stmt) {
                continue;
            }
            self.annotations
                .entry(stmt.predicate.clone())
                .or_default()
                .push(stmt.value.clone());
        }

        trace!(
            target: "propgraph::entity",
            identifier = %subject,
            type_tag = %self.type_tag,
            annotations = self.annotations.len(),
            "Deserialized entity"
        );
        Ok(())
    }
}

/// Bookkeeping statements recording a versioned identifier's split
///
/// Each is consumed once; repeats fall through to annotations.
struct VersionSplit<'a> {
    persistent: Option<&'a str>,
    version: Option<&'a str>,
}

impl<'a> VersionSplit<'a> {
    fn of(identifier: &'a Identifier) -> Self {
        let version = identifier.version();
        VersionSplit {
            persistent: version.map(|_| identifier.persistent_identity()),
            version,
        }
    }

    fn consume(&mut self, stmt: &Statement) -> bool {
        if stmt.predicate.as_str() == PERSISTENT_IDENTITY {
            let matches = stmt.value.as_resource().map(Identifier::as_str) == self.persistent;
            return matches && self.persistent.take().is_some();
        }
        if stmt.predicate.as_str() == VERSION {
            let matches = stmt.value.as_literal().and_then(|lit| lit.as_str()) == self.version;
            return matches && self.version.take().is_some();
        }
        false
    }
}

fn variant_mismatch(property: &Property, expected: &str) -> Error {
    Error::type_mismatch(property.predicate(), expected, property.variant_name())
}

/// Pre-order iterator over the owned entities below an entity
pub struct Descendants<'a> {
    stack: Vec<&'a Entity>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<&'a Entity> {
        let next = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(next.children());
        self.stack[start..].reverse();
        Some(next)
    }
}
