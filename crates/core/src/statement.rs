//! Statements: the flat subject-predicate-value facts of the exchange format

use crate::identifier::Identifier;
use crate::literal::Literal;
use crate::tag::{PredicateTag, TypeTag};
use crate::vocab::RDF_TYPE;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object of a statement: a literal or a resource identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Literal value
    Literal(Literal),
    /// Reference to a resource, inside or outside the document
    Resource(Identifier),
}

impl Value {
    /// Get the resource identifier, if this is a resource
    pub fn as_resource(&self) -> Option<&Identifier> {
        match self {
            Value::Resource(id) => Some(id),
            Value::Literal(_) => None,
        }
    }

    /// Get the literal, if this is a literal
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(lit) => Some(lit),
            Value::Resource(_) => None,
        }
    }

    /// Whether this is a resource reference
    pub fn is_resource(&self) -> bool {
        matches!(self, Value::Resource(_))
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Resource(_) => "Resource",
            Value::Literal(lit) => lit.type_name(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(lit) => write!(f, "{}", lit),
            Value::Resource(id) => write!(f, "<{}>", id),
        }
    }
}

impl From<Identifier> for Value {
    fn from(value: Identifier) -> Self {
        Value::Resource(value)
    }
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        Value::Literal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Literal(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Literal(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Literal(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Literal(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Literal(value.into())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Literal(value.into())
    }
}

/// A single subject-predicate-value fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Entity the fact is about
    pub subject: Identifier,
    /// Property the fact belongs to
    pub predicate: PredicateTag,
    /// Object of the fact
    pub value: Value,
}

impl Statement {
    /// Create a statement
    pub fn new(subject: Identifier, predicate: PredicateTag, value: impl Into<Value>) -> Self {
        Statement {
            subject,
            predicate,
            value: value.into(),
        }
    }

    /// Create the `rdf:type` statement declaring a subject's resource type
    ///
    /// Type tags are expected to be valid identifiers; a tag that is not
    /// falls back to a literal object so the statement is still representable.
    pub fn type_of(subject: Identifier, type_tag: &TypeTag) -> Self {
        let value = match Identifier::new(type_tag.as_str()) {
            Ok(id) => Value::Resource(id),
            Err(_) => Value::Literal(Literal::String(type_tag.as_str().to_string())),
        };
        Statement {
            subject,
            predicate: PredicateTag::new(RDF_TYPE),
            value,
        }
    }

    /// Whether this is an `rdf:type` statement
    pub fn is_type_statement(&self) -> bool {
        self.predicate.as_str() == RDF_TYPE
    }

    /// The resource type declared by this statement, if it is a type statement
    pub fn declared_type(&self) -> Option<TypeTag> {
        if !self.is_type_statement() {
            return None;
        }
        match &self.value {
            Value::Resource(id) => Some(TypeTag::new(id.as_str())),
            Value::Literal(Literal::String(s)) => Some(TypeTag::new(s)),
            Value::Literal(_) => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> {} .", self.subject, self.predicate, self.value)
    }
}
