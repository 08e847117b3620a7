//! Owned-object property
//!
//! Holds nested entities whose lifetime belongs to the declaring entity.
//! Ownership is exclusive: an entity carries a non-owning back-pointer to its
//! owner once attached, and attaching an entity that already has an owner
//! fails with `Error::OwnershipViolation`. Removing a child hands it back to
//! the caller with the back-pointer cleared; dropping it destroys the whole
//! subtree.

use super::referenced::allowed_list;
use crate::document::load::LoadContext;
use crate::entity::{Entity, OwnerLink};
use crate::schema::Cardinality;
use propgraph_core::{
    Error, Identifier, PredicateTag, Result, Statement, StatementStore, TypeTag, Value,
};
use std::sync::Arc;

/// Property holding entities owned by the declaring entity
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedProperty {
    predicate: PredicateTag,
    cardinality: Cardinality,
    allowed_types: Arc<[TypeTag]>,
    children: Vec<Entity>,
}

impl OwnedProperty {
    /// Create an empty owned property
    pub fn new(
        predicate: PredicateTag,
        cardinality: Cardinality,
        allowed_types: Arc<[TypeTag]>,
    ) -> Self {
        OwnedProperty {
            predicate,
            cardinality,
            allowed_types,
            children: Vec::new(),
        }
    }

    /// Predicate naming this property
    pub fn predicate(&self) -> &PredicateTag {
        &self.predicate
    }

    /// Declared bounds
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Types a child may have; empty allows any
    pub fn allowed_types(&self) -> &[TypeTag] {
        &self.allowed_types
    }

    /// Whether a child of this type may be attached
    pub fn allows(&self, type_tag: &TypeTag) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.contains(type_tag)
    }

    /// The single child of a singular property
    pub fn get(&self) -> Result<Option<&Entity>> {
        if !self.cardinality.is_singular() {
            return Err(self
                .cardinality
                .violation(&self.predicate, self.children.len()));
        }
        Ok(self.children.first())
    }

    /// All children in attachment order
    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    /// Direct child with this identifier
    pub fn child(&self, identifier: &Identifier) -> Option<&Entity> {
        self.children.iter().find(|c| c.identifier() == identifier)
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.children.iter_mut()
    }

    /// Identifiers of the children in attachment order
    pub fn ids(&self) -> impl Iterator<Item = &Identifier> + '_ {
        self.children.iter().map(Entity::identifier)
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether no child is attached
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Check the child count against the declared bounds
    pub fn validate(&self) -> Result<()> {
        self.cardinality.check(&self.predicate, self.children.len())
    }

    /// Check everything `attach` checks, without attaching
    pub(crate) fn check_attach(&self, child: &Entity) -> Result<()> {
        if let Some(link) = child.owner() {
            return Err(Error::OwnershipViolation {
                identifier: child.identifier().clone(),
                owner: link.parent.clone(),
            });
        }
        if !self.allows(child.type_tag()) {
            return Err(Error::type_mismatch(
                &self.predicate,
                allowed_list(&self.allowed_types),
                child.type_tag().as_str(),
            ));
        }
        Ok(())
    }

    pub(crate) fn attach(&mut self, owner: &Identifier, mut child: Entity) -> Result<()> {
        self.check_attach(&child)?;
        if !self.cardinality.has_room(self.children.len()) {
            return Err(self
                .cardinality
                .violation(&self.predicate, self.children.len() + 1));
        }
        child.set_owner(Some(OwnerLink {
            parent: owner.clone(),
            predicate: self.predicate.clone(),
        }));
        self.children.push(child);
        Ok(())
    }

    /// Replace the child of a singular property; returns the previous child detached
    pub(crate) fn replace(&mut self, owner: &Identifier, child: Entity) -> Result<Option<Entity>> {
        if !self.cardinality.is_singular() {
            return Err(self
                .cardinality
                .violation(&self.predicate, self.children.len()));
        }
        self.check_attach(&child)?;
        let previous = self.children.pop().map(detach);
        self.attach(owner, child)?;
        Ok(previous)
    }

    pub(crate) fn detach(&mut self, identifier: &Identifier) -> Option<Entity> {
        let idx = self
            .children
            .iter()
            .position(|c| c.identifier() == identifier)?;
        Some(detach(self.children.remove(idx)))
    }

    /// Serialize every child, then link the owner to it
    ///
    /// Every child subtree is validated before the first statement is written.
    pub fn serialize_into(&self, store: &mut StatementStore, subject: &Identifier) -> Result<()> {
        self.validate()?;
        for child in &self.children {
            child.validate()?;
        }
        self.emit_into(store, subject)
    }

    pub(crate) fn emit_into(&self, store: &mut StatementStore, subject: &Identifier) -> Result<()> {
        self.validate()?;
        for child in &self.children {
            child.emit(store)?;
            store.add(Statement::new(
                subject.clone(),
                self.predicate.clone(),
                child.identifier().clone(),
            ));
        }
        Ok(())
    }

    /// Instantiate, populate and attach every child linked from `subject`
    ///
    /// Returns the linked identifiers that could not be instantiated because
    /// their subject is absent from the store or has an unregistered type.
    pub fn deserialize_from(
        &mut self,
        store: &StatementStore,
        subject: &Identifier,
        ctx: &mut LoadContext<'_>,
    ) -> Result<Vec<Identifier>> {
        self.children.clear();
        let mut unresolved = Vec::new();
        let predicate = self.predicate.clone();
        for value in store.objects(subject, &predicate) {
            let child_id = match value {
                Value::Resource(id) => id,
                Value::Literal(lit) => {
                    return Err(Error::type_mismatch(&predicate, "Resource", lit.type_name()))
                }
            };
            let Some(mut child) = ctx.take_child(subject, child_id)? else {
                unresolved.push(child_id.clone());
                continue;
            };
            self.check_attach(&child)?;
            ctx.populate(&mut child, store)?;
            self.attach(subject, child)?;
        }
        Ok(unresolved)
    }
}

fn detach(mut child: Entity) -> Entity {
    child.set_owner(None);
    child
}
