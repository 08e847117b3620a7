//! Typed properties
//!
//! A property is one named field of an entity. It knows its predicate, its
//! cardinality and the rules for its values, and it can serialize itself to
//! and from statements about its entity. There are three variants:
//!
//! - [`ScalarProperty`]: literal values of one declared kind
//! - [`ReferencedProperty`]: identifiers of entities it does not own
//! - [`OwnedProperty`]: nested entities owned by the declaring entity

pub mod owned;
pub mod referenced;
pub mod scalar;

pub use owned::OwnedProperty;
pub use referenced::ReferencedProperty;
pub use scalar::ScalarProperty;

use crate::schema::{Cardinality, PropertyDecl, PropertyVariant};
use propgraph_core::{Identifier, PredicateTag, Result, StatementStore};

/// One field of an entity
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// Literal values
    Scalar(ScalarProperty),
    /// Non-owning references
    Referenced(ReferencedProperty),
    /// Owned nested entities
    Owned(OwnedProperty),
}

impl Property {
    /// Build an empty property from its declaration
    pub fn from_decl(decl: &PropertyDecl) -> Self {
        match decl.variant {
            PropertyVariant::Scalar(kind) => Property::Scalar(ScalarProperty::new(
                decl.predicate.clone(),
                kind,
                decl.cardinality,
            )),
            PropertyVariant::Referenced => Property::Referenced(ReferencedProperty::new(
                decl.predicate.clone(),
                decl.cardinality,
                decl.allowed_types.clone(),
            )),
            PropertyVariant::Owned => Property::Owned(OwnedProperty::new(
                decl.predicate.clone(),
                decl.cardinality,
                decl.allowed_types.clone(),
            )),
        }
    }

    /// Predicate naming this property
    pub fn predicate(&self) -> &PredicateTag {
        match self {
            Property::Scalar(p) => p.predicate(),
            Property::Referenced(p) => p.predicate(),
            Property::Owned(p) => p.predicate(),
        }
    }

    /// Declared bounds
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Property::Scalar(p) => p.cardinality(),
            Property::Referenced(p) => p.cardinality(),
            Property::Owned(p) => p.cardinality(),
        }
    }

    /// Name of the variant, used in error messages
    pub fn variant_name(&self) -> &'static str {
        match self {
            Property::Scalar(_) => "scalar property",
            Property::Referenced(_) => "referenced property",
            Property::Owned(_) => "owned property",
        }
    }

    /// Number of held values
    pub fn len(&self) -> usize {
        match self {
            Property::Scalar(p) => p.len(),
            Property::Referenced(p) => p.len(),
            Property::Owned(p) => p.len(),
        }
    }

    /// Whether no value is held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the held count against the declared bounds
    ///
    /// Owned children are not visited; see `Entity::validate`.
    pub fn validate(&self) -> Result<()> {
        match self {
            Property::Scalar(p) => p.validate(),
            Property::Referenced(p) => p.validate(),
            Property::Owned(p) => p.validate(),
        }
    }

    /// Emit this property's statements about `subject`
    pub fn serialize_into(&self, store: &mut StatementStore, subject: &Identifier) -> Result<()> {
        match self {
            Property::Scalar(p) => p.serialize_into(store, subject),
            Property::Referenced(p) => p.serialize_into(store, subject),
            Property::Owned(p) => p.serialize_into(store, subject),
        }
    }

    /// The scalar property, if this is one
    pub fn as_scalar(&self) -> Option<&ScalarProperty> {
        match self {
            Property::Scalar(p) => Some(p),
            _ => None,
        }
    }

    /// The scalar property, mutably
    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarProperty> {
        match self {
            Property::Scalar(p) => Some(p),
            _ => None,
        }
    }

    /// The referenced property, if this is one
    pub fn as_referenced(&self) -> Option<&ReferencedProperty> {
        match self {
            Property::Referenced(p) => Some(p),
            _ => None,
        }
    }

    /// The referenced property, mutably
    pub fn as_referenced_mut(&mut self) -> Option<&mut ReferencedProperty> {
        match self {
            Property::Referenced(p) => Some(p),
            _ => None,
        }
    }

    /// The owned property, if this is one
    pub fn as_owned(&self) -> Option<&OwnedProperty> {
        match self {
            Property::Owned(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn as_owned_mut(&mut self) -> Option<&mut OwnedProperty> {
        match self {
            Property::Owned(p) => Some(p),
            _ => None,
        }
    }
}
