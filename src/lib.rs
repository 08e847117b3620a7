//! propgraph - property/ownership engine for triple-serialized documents
//!
//! propgraph represents a structured document as a graph of identified,
//! typed entities whose fields are cardinality-bounded properties:
//! scalar literals, references to other entities by identifier, and owned
//! sub-entities. The graph serializes to and from a flat stream of
//! subject-predicate-value statements without losing data it does not
//! recognize.
//!
//! # Quick Start
//!
//! ```
//! use propgraph::{
//!     Cardinality, DocumentGraph, EntityRegistry, EntitySchema, Identifier, LiteralKind,
//! };
//!
//! let foo = EntitySchema::new("http://example.org/Foo")
//!     .scalar("http://example.org/name", LiteralKind::Text, Cardinality::REQUIRED)
//!     .owned("http://example.org/parts", Cardinality::ANY, ["http://example.org/Part"]);
//! let part = EntitySchema::new("http://example.org/Part");
//!
//! let mut registry = EntityRegistry::new();
//! registry.register_schema(foo.clone());
//! registry.register_schema(part.clone());
//!
//! let mut a = foo.instantiate(Identifier::new("http://example.org/a")?)?;
//! a.set_value("http://example.org/name", "widget")?;
//! let child_id = a.compose_child_identifier("b", None)?;
//! a.add_owned("http://example.org/parts", part.instantiate(child_id)?)?;
//!
//! let mut graph = DocumentGraph::new();
//! graph.add_top_level(a)?;
//!
//! let store = graph.serialize()?;
//! let loaded = DocumentGraph::deserialize(&store, &registry)?;
//! assert_eq!(loaded, graph);
//! # Ok::<(), propgraph::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`propgraph_core`]: identifiers, tags, literals, statements, the
//!   statement store and the error type
//! - [`propgraph_engine`]: properties, entities, schemas, the registry,
//!   the document graph and configuration

pub use propgraph_core::*;
pub use propgraph_engine::*;
