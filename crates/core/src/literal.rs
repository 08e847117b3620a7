//! Literal values
//!
//! A [`Literal`] is the object of a literal-kind statement. Each variant maps
//! to one XSD datatype; literals with a datatype the engine does not know are
//! kept verbatim in [`Literal::Typed`] so nothing is lost on a round trip.
//!
//! ## Equality
//!
//! Different variants are never equal: `Integer(1) != Double(1.0)`.
//! Doubles follow IEEE-754 (`NaN != NaN`).

use crate::vocab::{XSD_BOOLEAN, XSD_DATE_TIME, XSD_DOUBLE, XSD_INTEGER, XSD_STRING};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object of a literal statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Plain string (`xsd:string` or no datatype)
    String(String),
    /// `xsd:integer`
    Integer(i64),
    /// `xsd:double`
    Double(f64),
    /// `xsd:boolean`
    Boolean(bool),
    /// `xsd:dateTime`
    DateTime(DateTime<FixedOffset>),
    /// Any other datatype, or a known datatype whose lexical form did not parse
    Typed {
        /// Lexical form as read
        lexical: String,
        /// Datatype IRI as read
        datatype: String,
    },
}

impl Literal {
    /// Build a literal from its lexical form and optional datatype IRI
    ///
    /// Never fails: a lexical form that does not parse under its datatype is
    /// kept as [`Literal::Typed`].
    pub fn from_lexical(lexical: &str, datatype: Option<&str>) -> Literal {
        let parsed = match datatype {
            None | Some(XSD_STRING) => Some(Literal::String(lexical.to_string())),
            Some(XSD_INTEGER) => lexical.parse().ok().map(Literal::Integer),
            Some(XSD_DOUBLE) => lexical.parse().ok().map(Literal::Double),
            Some(XSD_BOOLEAN) => parse_bool(lexical).map(Literal::Boolean),
            Some(XSD_DATE_TIME) => DateTime::parse_from_rfc3339(lexical)
                .ok()
                .map(Literal::DateTime),
            Some(_) => None,
        };
        parsed.unwrap_or_else(|| Literal::Typed {
            lexical: lexical.to_string(),
            datatype: datatype.unwrap_or(XSD_STRING).to_string(),
        })
    }

    /// Lexical form of the literal
    pub fn lexical(&self) -> String {
        match self {
            Literal::String(s) => s.clone(),
            Literal::Integer(n) => n.to_string(),
            Literal::Double(n) => n.to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::DateTime(dt) => dt.to_rfc3339(),
            Literal::Typed { lexical, .. } => lexical.clone(),
        }
    }

    /// Datatype IRI, `None` for plain strings
    pub fn datatype(&self) -> Option<&str> {
        match self {
            Literal::String(_) => None,
            Literal::Integer(_) => Some(XSD_INTEGER),
            Literal::Double(_) => Some(XSD_DOUBLE),
            Literal::Boolean(_) => Some(XSD_BOOLEAN),
            Literal::DateTime(_) => Some(XSD_DATE_TIME),
            Literal::Typed { datatype, .. } => Some(datatype),
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "String",
            Literal::Integer(_) => "Integer",
            Literal::Double(_) => "Double",
            Literal::Boolean(_) => "Boolean",
            Literal::DateTime(_) => "DateTime",
            Literal::Typed { .. } => "Typed",
        }
    }

    /// Get the string content, if this is a plain string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Literal::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the double, if this is a double
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Literal::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the timestamp, if this is a date-time
    pub fn as_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Literal::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

fn parse_bool(lexical: &str) -> Option<bool> {
    match lexical {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.datatype() {
            None => write!(f, "{:?}", self.lexical()),
            Some(datatype) => write!(f, "{:?}^^<{}>", self.lexical(), datatype),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<DateTime<FixedOffset>> for Literal {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Literal::DateTime(value)
    }
}
