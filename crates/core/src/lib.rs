//! Core types for propgraph
//!
//! This crate defines the foundational types the property/ownership engine
//! is built on:
//! - Identifier: validated resource identifier with persistent/version parts
//! - TypeTag, PredicateTag: opaque, hashable schema atoms
//! - Literal, Value: statement objects
//! - Statement: a single subject-predicate-value fact
//! - StatementStore: ordered multiset of statements grouped by subject
//! - TripleRecord: flat record shape at the format boundary
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod identifier;
pub mod literal;
pub mod statement;
pub mod store;
pub mod stream;
pub mod tag;
pub mod vocab;

pub use error::{Error, Result};
pub use identifier::{Identifier, IdentifierError, MAX_IDENTIFIER_LENGTH};
pub use literal::Literal;
pub use statement::{Statement, Value};
pub use store::{StatementStore, StatementsFor};
pub use stream::{TripleRecord, ValueKind};
pub use tag::{PredicateTag, TypeTag};
