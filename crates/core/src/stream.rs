//! Triple stream records
//!
//! The boundary with concrete document format parsers and writers is an
//! ordered sequence of flat records:
//!
//! ```text
//! (subject, predicate, value, value_kind[, datatype])
//! ```
//!
//! Records derive serde so an adapter can stream them as JSON lines or any
//! other serde format. Converting records into a [`StatementStore`] validates
//! identifiers; converting back is infallible.
//!
//! ## Example
//!
//! ```
//! use propgraph_core::{StatementStore, TripleRecord, ValueKind};
//!
//! let records = vec![TripleRecord {
//!     subject: "http://example.org/a".into(),
//!     predicate: "http://example.org/name".into(),
//!     value: "widget".into(),
//!     value_kind: ValueKind::Literal,
//!     datatype: None,
//! }];
//! let store = StatementStore::from_records(records.clone()).unwrap();
//! assert_eq!(store.to_records(), records);
//! ```

use crate::error::Result;
use crate::identifier::Identifier;
use crate::literal::Literal;
use crate::statement::{Statement, Value};
use crate::store::StatementStore;
use crate::tag::PredicateTag;
use serde::{Deserialize, Serialize};

/// Kind of a record's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Value is a literal lexical form
    Literal,
    /// Value is a resource identifier
    Resource,
}

/// One flat statement at the format boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleRecord {
    /// Subject identifier
    pub subject: String,
    /// Predicate tag
    pub predicate: String,
    /// Lexical form or identifier
    pub value: String,
    /// How to read `value`
    pub value_kind: ValueKind,
    /// Datatype IRI of a literal; absent for plain strings and resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl TripleRecord {
    /// Convert to a statement, validating identifiers
    pub fn to_statement(&self) -> Result<Statement> {
        let subject = Identifier::new(self.subject.as_str())?;
        let value = match self.value_kind {
            ValueKind::Resource => Value::Resource(Identifier::new(self.value.as_str())?),
            ValueKind::Literal => {
                Value::Literal(Literal::from_lexical(&self.value, self.datatype.as_deref()))
            }
        };
        Ok(Statement {
            subject,
            predicate: PredicateTag::new(&self.predicate),
            value,
        })
    }
}

impl From<&Statement> for TripleRecord {
    fn from(stmt: &Statement) -> Self {
        let (value, value_kind, datatype) = match &stmt.value {
            Value::Resource(id) => (id.as_str().to_string(), ValueKind::Resource, None),
            Value::Literal(lit) => (
                lit.lexical(),
                ValueKind::Literal,
                lit.datatype().map(str::to_string),
            ),
        };
        TripleRecord {
            subject: stmt.subject.as_str().to_string(),
            predicate: stmt.predicate.as_str().to_string(),
            value,
            value_kind,
            datatype,
        }
    }
}

impl StatementStore {
    /// Build a store from a record stream, keeping record order
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIdentifier` on the first record whose subject or
    /// resource value is not a valid identifier.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = TripleRecord>,
    {
        let mut store = StatementStore::new();
        for record in records {
            store.add(record.to_statement()?);
        }
        Ok(store)
    }

    /// Emit the store as a record stream in insertion order
    pub fn to_records(&self) -> Vec<TripleRecord> {
        self.iter().map(TripleRecord::from).collect()
    }
}
