//! Error types for propgraph
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every error is surfaced synchronously to the caller of the operation that
//! detected it. Nothing in the engine logs an error and carries on, with one
//! exception: an unrecognized subject during deserialization degrades to the
//! passthrough bucket instead of failing.

use crate::identifier::{Identifier, IdentifierError};
use crate::tag::{PredicateTag, TypeTag};
use std::io;
use thiserror::Error;

/// Result type alias for propgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the property/ownership engine
#[derive(Debug, Error)]
pub enum Error {
    /// A candidate identifier was empty, too long or contained a disallowed character
    #[error("invalid identifier '{candidate}': {reason}")]
    InvalidIdentifier {
        /// The rejected input
        candidate: String,
        /// Why it was rejected
        reason: IdentifierError,
    },

    /// Two distinct entities would share an identifier in one graph
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(Identifier),

    /// A property would hold, or holds, a number of values outside its bounds
    #[error("cardinality violation on {predicate}: {count} value(s), allowed {lower}..{}", upper_display(.upper))]
    Cardinality {
        /// Predicate of the offending property
        predicate: PredicateTag,
        /// Number of values the property held or would hold
        count: usize,
        /// Lower bound (0 or 1)
        lower: usize,
        /// Upper bound, `None` when unbounded
        upper: Option<usize>,
    },

    /// A value or entity does not have the type the property allows
    #[error("type mismatch on {predicate}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Predicate of the property being written or read
        predicate: PredicateTag,
        /// What the property accepts
        expected: String,
        /// What was supplied
        found: String,
    },

    /// An entity that already has an owner was attached somewhere else
    #[error("entity {identifier} is already owned by {owner}")]
    OwnershipViolation {
        /// The entity being attached
        identifier: Identifier,
        /// Its current owner
        owner: Identifier,
    },

    /// The predicate is not declared on the entity
    #[error("unknown property {predicate} on type {type_tag}")]
    UnknownProperty {
        /// Type of the entity that was asked
        type_tag: TypeTag,
        /// The undeclared predicate
        predicate: PredicateTag,
    },

    /// No constructor is registered for the type tag
    #[error("unknown type: {0}")]
    UnknownType(TypeTag),

    /// The same predicate was declared twice on one entity
    #[error("property {predicate} declared twice on type {type_tag}")]
    DuplicateProperty {
        /// Type of the entity being declared
        type_tag: TypeTag,
        /// The repeated predicate
        predicate: PredicateTag,
    },

    /// Owned nesting exceeded the configured depth during deserialization
    #[error("owned nesting deeper than {limit} at {identifier}")]
    NestingTooDeep {
        /// Entity at which the limit was hit
        identifier: Identifier,
        /// Configured limit
        limit: usize,
    },

    /// Configuration could not be parsed or holds an invalid value
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn upper_display(upper: &Option<usize>) -> String {
    match upper {
        Some(n) => n.to_string(),
        None => "*".to_string(),
    }
}

impl Error {
    /// Build an `InvalidIdentifier` error from the rejected input
    pub fn invalid_identifier(candidate: impl Into<String>, reason: IdentifierError) -> Self {
        Error::InvalidIdentifier {
            candidate: candidate.into(),
            reason,
        }
    }

    /// Build a `TypeMismatch` error
    pub fn type_mismatch(
        predicate: &PredicateTag,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            predicate: predicate.clone(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Short, stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidIdentifier { .. } => "InvalidIdentifier",
            Error::DuplicateIdentifier(_) => "DuplicateIdentifier",
            Error::Cardinality { .. } => "Cardinality",
            Error::TypeMismatch { .. } => "TypeMismatch",
            Error::OwnershipViolation { .. } => "OwnershipViolation",
            Error::UnknownProperty { .. } => "UnknownProperty",
            Error::UnknownType(_) => "UnknownType",
            Error::DuplicateProperty { .. } => "DuplicateProperty",
            Error::NestingTooDeep { .. } => "NestingTooDeep",
            Error::Config(_) => "Config",
            Error::Io(_) => "Io",
        }
    }
}
