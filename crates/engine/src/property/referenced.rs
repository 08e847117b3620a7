//! Referenced-object property
//!
//! Holds identifiers only, never entities. A reference is a weak relation:
//! it is resolved by looking the identifier up in the owning document graph,
//! and deleting the target leaves a dangling reference behind rather than
//! cascading. Identifiers outside the document are valid values.

use crate::schema::Cardinality;
use propgraph_core::{
    Error, Identifier, PredicateTag, Result, Statement, StatementStore, TypeTag, Value,
};
use std::sync::Arc;

/// Property holding identifiers of entities it does not own
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencedProperty {
    predicate: PredicateTag,
    cardinality: Cardinality,
    allowed_types: Arc<[TypeTag]>,
    values: Vec<Identifier>,
}

impl ReferencedProperty {
    /// Create an empty referenced property
    pub fn new(
        predicate: PredicateTag,
        cardinality: Cardinality,
        allowed_types: Arc<[TypeTag]>,
    ) -> Self {
        ReferencedProperty {
            predicate,
            cardinality,
            allowed_types,
            values: Vec::new(),
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

    /// Types a target may have; empty allows any
    pub fn allowed_types(&self) -> &[TypeTag] {
        &self.allowed_types
    }

    /// Whether a target of this type may be referenced
    pub fn allows(&self, type_tag: &TypeTag) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.contains(type_tag)
    }

    /// Fail with `Error::TypeMismatch` unless the type is allowed
    pub fn check_type(&self, type_tag: &TypeTag) -> Result<()> {
        if self.allows(type_tag) {
            Ok(())
        } else {
            Err(Error::type_mismatch(
                &self.predicate,
                allowed_list(&self.allowed_types),
                type_tag.as_str(),
            ))
        }
    }

    /// The single target of a singular property
    pub fn get(&self) -> Result<Option<&Identifier>> {
        if !self.cardinality.is_singular() {
            return Err(self.cardinality.violation(&self.predicate, self.values.len()));
        }
        Ok(self.values.first())
    }

    /// All targets in insertion order
    pub fn values(&self) -> &[Identifier] {
        &self.values
    }

    /// Number of held targets
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no target is held
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the target of a singular property, returning the previous one
    pub fn set(&mut self, target: Identifier) -> Result<Option<Identifier>> {
        if !self.cardinality.is_singular() {
            return Err(self.cardinality.violation(&self.predicate, self.values.len()));
        }
        let previous = self.values.pop();
        self.values.push(target);
        Ok(previous)
    }

    /// Append a target
    pub fn add(&mut self, target: Identifier) -> Result<()> {
        if !self.cardinality.has_room(self.values.len()) {
            return Err(self
                .cardinality
                .violation(&self.predicate, self.values.len() + 1));
        }
        self.values.push(target);
        Ok(())
    }

    /// Remove the first occurrence of `target`; returns whether one was found
    pub fn remove(&mut self, target: &Identifier) -> bool {
        match self.values.iter().position(|v| v == target) {
            Some(idx) => {
                self.values.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove the target at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<Identifier> {
        if index < self.values.len() {
            Some(self.values.remove(index))
        } else {
            None
        }
    }

    /// Remove every target
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Check the held count against the declared bounds
    pub fn validate(&self) -> Result<()> {
        self.cardinality.check(&self.predicate, self.values.len())
    }

    /// Emit one resource statement per target
    pub fn serialize_into(&self, store: &mut StatementStore, subject: &Identifier) -> Result<()> {
        self.validate()?;
        for target in &self.values {
            store.add(Statement::new(
                subject.clone(),
                self.predicate.clone(),
                target.clone(),
            ));
        }
        Ok(())
    }

    /// Read this predicate's statements about `subject`, replacing held targets
    ///
    /// `resolve_type` returns the type of a target that lives in the same
    /// document. Resolvable targets must have an allowed type; unresolvable
    /// ones are taken as external references.
    pub fn deserialize_from<F>(
        &mut self,
        store: &StatementStore,
        subject: &Identifier,
        resolve_type: F,
    ) -> Result<()>
    where
        F: Fn(&Identifier) -> Option<TypeTag>,
    {
        self.values.clear();
        let predicate = self.predicate.clone();
        for value in store.objects(subject, &predicate) {
            let target = match value {
                Value::Resource(id) => id,
                Value::Literal(lit) => {
                    return Err(Error::type_mismatch(&predicate, "Resource", lit.type_name()))
                }
            };
            if let Some(type_tag) = resolve_type(target) {
                self.check_type(&type_tag)?;
            }
            self.add(target.clone())?;
        }
        Ok(())
    }
}

pub(crate) fn allowed_list(allowed: &[TypeTag]) -> String {
    if allowed.is_empty() {
        return "any type".to_string();
    }
    allowed
        .iter()
        .map(TypeTag::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}
