//! Well-known vocabulary terms
//!
//! The engine itself only needs `rdf:type` and the XSD datatypes it maps
//! literals to. Domain predicates and type tags come from the schema.

/// Predicate of the statement carrying an entity's resource type
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// XML Schema namespace
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
/// `xsd:string`, equivalent to a plain literal
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:integer`
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
/// `xsd:double`
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
/// `xsd:boolean`
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
/// `xsd:dateTime`
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// Namespace of the engine's own bookkeeping predicates
pub const PROPGRAPH_NS: &str = "http://propgraph.org/ns#";
/// Predicate linking a versioned entity to its persistent identity
pub const PERSISTENT_IDENTITY: &str = "http://propgraph.org/ns#persistentIdentity";
/// Predicate carrying the version segment of a versioned entity
pub const VERSION: &str = "http://propgraph.org/ns#version";
