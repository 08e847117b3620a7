//! Schema declarations
//!
//! Domain code describes each entity type as a list of property
//! declarations. The engine turns a declaration into an attached
//! [`Property`](crate::property::Property) when an entity is constructed.
//!
//! ```
//! use propgraph_engine::{Cardinality, EntitySchema, LiteralKind};
//!
//! let schema = EntitySchema::new("http://example.org/Foo")
//!     .scalar("http://example.org/name", LiteralKind::Text, Cardinality::REQUIRED)
//!     .owned("http://example.org/parts", Cardinality::ANY, ["http://example.org/Part"])
//!     .referenced("http://example.org/uses", Cardinality::OPTIONAL, Vec::<&str>::new());
//! assert_eq!(schema.properties().len(), 3);
//! ```

use crate::entity::Entity;
use propgraph_core::{Error, Identifier, Literal, PredicateTag, Result, TypeTag, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Cardinality
// ============================================================================

/// Bounds on the number of values a property holds
///
/// The lower bound is 0 or 1, the upper bound 1 or unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CardinalityRepr")]
pub struct Cardinality {
    lower: usize,
    upper: Option<usize>,
}

#[derive(Deserialize)]
struct CardinalityRepr {
    lower: usize,
    upper: Option<usize>,
}

impl TryFrom<CardinalityRepr> for Cardinality {
    type Error = Error;

    fn try_from(repr: CardinalityRepr) -> Result<Self> {
        match (repr.lower, repr.upper) {
            (0 | 1, Some(1) | None) => Ok(Cardinality {
                lower: repr.lower,
                upper: repr.upper,
            }),
            (lower, upper) => Err(Error::Config(format!(
                "invalid cardinality {}..{}: expected lower 0 or 1 and upper 1 or unbounded",
                lower,
                upper.map_or_else(|| "*".to_string(), |u| u.to_string())
            ))),
        }
    }
}

impl Cardinality {
    /// `0..1`
    pub const OPTIONAL: Cardinality = Cardinality {
        lower: 0,
        upper: Some(1),
    };
    /// `1..1`
    pub const REQUIRED: Cardinality = Cardinality {
        lower: 1,
        upper: Some(1),
    };
    /// `0..*`
    pub const ANY: Cardinality = Cardinality {
        lower: 0,
        upper: None,
    };
    /// `1..*`
    pub const AT_LEAST_ONE: Cardinality = Cardinality {
        lower: 1,
        upper: None,
    };

    /// Parse textual bounds such as `("0", "1")` or `("1", "*")`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for anything other than a lower bound of `0`/`1`
    /// and an upper bound of `1`/`*`.
    pub fn parse(lower: &str, upper: &str) -> Result<Self> {
        let lower = match lower {
            "0" => 0,
            "1" => 1,
            other => {
                return Err(Error::Config(format!(
                    "invalid lower bound '{}': expected \"0\" or \"1\"",
                    other
                )))
            }
        };
        let upper = match upper {
            "1" => Some(1),
            "*" => None,
            other => {
                return Err(Error::Config(format!(
                    "invalid upper bound '{}': expected \"1\" or \"*\"",
                    other
                )))
            }
        };
        Ok(Cardinality { lower, upper })
    }

    /// Lower bound
    pub fn lower(&self) -> usize {
        self.lower
    }

    /// Upper bound, `None` when unbounded
    pub fn upper(&self) -> Option<usize> {
        self.upper
    }

    /// Whether the property holds at most one value
    pub fn is_singular(&self) -> bool {
        self.upper == Some(1)
    }

    /// Whether at least one value is required
    pub fn is_required(&self) -> bool {
        self.lower > 0
    }

    /// Whether `count` values satisfy the bounds
    pub fn admits(&self, count: usize) -> bool {
        count >= self.lower && self.upper.map_or(true, |upper| count <= upper)
    }

    /// Whether `count` values leave room for one more
    pub fn has_room(&self, count: usize) -> bool {
        self.upper.map_or(true, |upper| count < upper)
    }

    /// Fail with `Error::Cardinality` unless `count` satisfies the bounds
    pub fn check(&self, predicate: &PredicateTag, count: usize) -> Result<()> {
        if self.admits(count) {
            Ok(())
        } else {
            Err(self.violation(predicate, count))
        }
    }

    pub(crate) fn violation(&self, predicate: &PredicateTag, count: usize) -> Error {
        Error::Cardinality {
            predicate: predicate.clone(),
            count,
            lower: self.lower,
            upper: self.upper,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{}..{}", self.lower, upper),
            None => write!(f, "{}..*", self.lower),
        }
    }
}

// ============================================================================
// Scalar kinds
// ============================================================================

/// Value kind held by a scalar literal property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    /// Plain string
    Text,
    /// URI that is not an entity reference; emitted as a resource-kind statement
    Uri,
    /// 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Boolean
    Boolean,
    /// Timestamp with offset
    DateTime,
}

impl LiteralKind {
    /// Name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            LiteralKind::Text => "Text",
            LiteralKind::Uri => "Uri",
            LiteralKind::Integer => "Integer",
            LiteralKind::Float => "Float",
            LiteralKind::Boolean => "Boolean",
            LiteralKind::DateTime => "DateTime",
        }
    }

    /// Whether a value has exactly this kind
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (LiteralKind::Text, Value::Literal(Literal::String(_)))
                | (LiteralKind::Uri, Value::Resource(_))
                | (LiteralKind::Integer, Value::Literal(Literal::Integer(_)))
                | (LiteralKind::Float, Value::Literal(Literal::Double(_)))
                | (LiteralKind::Boolean, Value::Literal(Literal::Boolean(_)))
                | (LiteralKind::DateTime, Value::Literal(Literal::DateTime(_)))
        )
    }

    /// Convert a value read from a statement into this kind
    ///
    /// Plain strings are parsed; integers widen to floats. Returns `None` when
    /// the value cannot be read as this kind.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        if self.accepts(value) {
            return Some(value.clone());
        }
        let text = match value {
            Value::Literal(Literal::String(s)) => Some(s.as_str()),
            Value::Literal(Literal::Typed { lexical, .. }) => Some(lexical.as_str()),
            _ => None,
        };
        match (self, value, text) {
            (LiteralKind::Float, Value::Literal(Literal::Integer(n)), _) => {
                Some(Value::from(*n as f64))
            }
            (LiteralKind::Uri, _, Some(text)) => Identifier::new(text).ok().map(Value::Resource),
            (LiteralKind::Integer, _, Some(text)) => text.trim().parse::<i64>().ok().map(Value::from),
            (LiteralKind::Float, _, Some(text)) => text.trim().parse::<f64>().ok().map(Value::from),
            (LiteralKind::Boolean, _, Some("true")) => Some(Value::from(true)),
            (LiteralKind::Boolean, _, Some("false")) => Some(Value::from(false)),
            (LiteralKind::DateTime, _, Some(text)) => {
                match Literal::from_lexical(text, Some(propgraph_core::vocab::XSD_DATE_TIME)) {
                    lit @ Literal::DateTime(_) => Some(Value::Literal(lit)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Property declarations
// ============================================================================

/// Which property variant a declaration produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyVariant {
    /// Scalar literal values of one kind
    Scalar(LiteralKind),
    /// Identifiers of entities elsewhere, without ownership
    Referenced,
    /// Nested entities owned by the declaring entity
    Owned,
}

impl PropertyVariant {
    /// Name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            PropertyVariant::Scalar(_) => "scalar",
            PropertyVariant::Referenced => "referenced",
            PropertyVariant::Owned => "owned",
        }
    }
}

/// One field of an entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Predicate naming the field
    pub predicate: PredicateTag,
    /// Variant and, for scalars, the literal kind
    pub variant: PropertyVariant,
    /// Value-count bounds
    pub cardinality: Cardinality,
    /// Types a referenced or owned value may have; empty allows any type
    pub allowed_types: Arc<[TypeTag]>,
}

impl PropertyDecl {
    /// Declare a scalar literal property
    pub fn scalar(
        predicate: impl Into<PredicateTag>,
        kind: LiteralKind,
        cardinality: Cardinality,
    ) -> Self {
        PropertyDecl {
            predicate: predicate.into(),
            variant: PropertyVariant::Scalar(kind),
            cardinality,
            allowed_types: Arc::from(Vec::new()),
        }
    }

    /// Declare a referenced-object property
    pub fn referenced<I, T>(
        predicate: impl Into<PredicateTag>,
        cardinality: Cardinality,
        allowed_types: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        PropertyDecl {
            predicate: predicate.into(),
            variant: PropertyVariant::Referenced,
            cardinality,
            allowed_types: allowed_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Declare an owned-object property
    pub fn owned<I, T>(
        predicate: impl Into<PredicateTag>,
        cardinality: Cardinality,
        allowed_types: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        PropertyDecl {
            predicate: predicate.into(),
            variant: PropertyVariant::Owned,
            cardinality,
            allowed_types: allowed_types.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Entity schemas
// ============================================================================

/// Declaration of one entity type: its tag and its properties in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    type_tag: TypeTag,
    properties: Vec<PropertyDecl>,
}

impl EntitySchema {
    /// Start a schema for a type tag
    pub fn new(type_tag: impl Into<TypeTag>) -> Self {
        EntitySchema {
            type_tag: type_tag.into(),
            properties: Vec::new(),
        }
    }

    /// Append a declaration
    pub fn with(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }

    /// Append a scalar literal property
    pub fn scalar(
        self,
        predicate: impl Into<PredicateTag>,
        kind: LiteralKind,
        cardinality: Cardinality,
    ) -> Self {
        self.with(PropertyDecl::scalar(predicate, kind, cardinality))
    }

    /// Append a referenced-object property
    pub fn referenced<I, T>(
        self,
        predicate: impl Into<PredicateTag>,
        cardinality: Cardinality,
        allowed_types: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        self.with(PropertyDecl::referenced(predicate, cardinality, allowed_types))
    }

    /// Append an owned-object property
    pub fn owned<I, T>(
        self,
        predicate: impl Into<PredicateTag>,
        cardinality: Cardinality,
        allowed_types: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        self.with(PropertyDecl::owned(predicate, cardinality, allowed_types))
    }

    /// Type tag of the entities this schema builds
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    /// Declarations in declaration order
    pub fn properties(&self) -> &[PropertyDecl] {
        &self.properties
    }

    /// Build an entity with every declared property attached and empty
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateProperty` if a predicate is declared twice.
    pub fn instantiate(&self, identifier: Identifier) -> Result<Entity> {
        let mut entity = Entity::new(identifier, self.type_tag.clone());
        for decl in &self.properties {
            entity.declare_property(decl.clone())?;
        }
        Ok(entity)
    }
}
