//! Property/ownership engine for propgraph
//!
//! This crate builds on `propgraph-core`:
//! - Schema: property declarations and entity schemas
//! - Property: scalar, referenced and owned variants with cardinality
//! - Entity: identified, typed node owning its properties and children
//! - Registry: type tag to constructor dispatch for deserialization
//! - Document: the graph of top-level entities, identifier index and
//!   passthrough bucket, with two-pass deserialization
//! - Config: engine configuration via `propgraph.toml`
//!
//! The engine is single-threaded and mutates in place. A graph is not
//! synchronized internally; wrap it in a lock to share it across threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod entity;
pub mod property;
pub mod registry;
pub mod schema;

pub use config::{CardinalityPolicy, EngineConfig, CONFIG_FILE_NAME};
pub use document::{DocumentGraph, EntityMut, LoadContext, UnresolvedReference};
pub use entity::{Descendants, Entity, OwnerLink};
pub use property::{OwnedProperty, Property, ReferencedProperty, ScalarProperty};
pub use registry::{Constructor, EntityRegistry};
pub use schema::{Cardinality, EntitySchema, LiteralKind, PropertyDecl, PropertyVariant};
