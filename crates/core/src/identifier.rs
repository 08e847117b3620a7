//! Resource identifiers
//!
//! Every entity in a document graph is addressed by an [`Identifier`], a
//! globally comparable URI string split into two parts:
//!
//! - **persistent identity**: the stable part shared by every version of an entity
//! - **version**: an optional trailing segment
//!
//! ## Composition
//!
//! Nested entities compose their identifier from the parent's persistent
//! identity, a local display id and an optional version:
//!
//! ```
//! use propgraph_core::Identifier;
//!
//! let parent = Identifier::with_version("http://example.org/widget", "1").unwrap();
//! let child = Identifier::compose(&parent, "gear", Some("1")).unwrap();
//! assert_eq!(child.as_str(), "http://example.org/widget/gear/1");
//! assert_eq!(child.persistent_identity(), "http://example.org/widget/gear");
//! assert_eq!(child.version(), Some("1"));
//! ```
//!
//! ## Validation
//!
//! Identifiers must:
//! - Be 1-8192 bytes
//! - Contain no whitespace, control characters or any of `<>"{}|^` and backtick
//!
//! Display ids used in composition are stricter: `[A-Za-z0-9_]`, not starting
//! with a digit.
//!
//! Equality, ordering and hashing use the full string only. Two identifiers
//! with the same text are the same identifier however they were built.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Maximum length of an identifier in bytes
pub const MAX_IDENTIFIER_LENGTH: usize = 8192;

/// Prefix of blank node labels
pub const BLANK_NODE_PREFIX: &str = "_:";

/// Canonical resource identifier
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    uri: String,
    /// Byte offset of the version segment, if the identifier was built with one
    version_start: Option<usize>,
}

/// Why a candidate identifier was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Candidate is empty
    Empty,
    /// Candidate exceeds maximum length
    TooLong {
        /// Actual length in bytes
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Candidate contains a disallowed character
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position of the invalid character
        position: usize,
    },
    /// Display id starts with a character it may not start with
    InvalidStart {
        /// The invalid starting character
        char: char,
    },
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierError::Empty => write!(f, "identifier cannot be empty"),
            IdentifierError::TooLong { length, max } => {
                write!(f, "identifier too long: {} bytes (max {})", length, max)
            }
            IdentifierError::InvalidChar { char, position } => {
                write!(f, "invalid character {:?} at position {}", char, position)
            }
            IdentifierError::InvalidStart { char } => {
                write!(f, "display id cannot start with {:?}", char)
            }
        }
    }
}

impl std::error::Error for IdentifierError {}

impl Identifier {
    /// Create an identifier from a full URI string, without a version split
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIdentifier` if the candidate is empty, too long
    /// or contains a disallowed character.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if let Err(reason) = Self::validate(&uri) {
            return Err(Error::invalid_identifier(uri, reason));
        }
        Ok(Identifier {
            uri,
            version_start: None,
        })
    }

    /// Create an identifier from a persistent identity and a version segment
    pub fn with_version(persistent: &str, version: &str) -> Result<Self> {
        if let Err(reason) = Self::validate(persistent) {
            return Err(Error::invalid_identifier(persistent, reason));
        }
        if let Err(reason) = Self::validate_version(version) {
            return Err(Error::invalid_identifier(version, reason));
        }
        let uri = format!("{}/{}", persistent, version);
        if uri.len() > MAX_IDENTIFIER_LENGTH {
            return Err(Error::invalid_identifier(
                uri.clone(),
                IdentifierError::TooLong {
                    length: uri.len(),
                    max: MAX_IDENTIFIER_LENGTH,
                },
            ));
        }
        Ok(Identifier {
            version_start: Some(persistent.len() + 1),
            uri,
        })
    }

    /// Compose a child identifier: `parent_persistent/local_name[/version]`
    ///
    /// The parent's persistent identity is used, so versions never stack when
    /// nesting several levels deep.
    pub fn compose(parent: &Identifier, local_name: &str, version: Option<&str>) -> Result<Self> {
        if let Err(reason) = Self::validate_display_id(local_name) {
            return Err(Error::invalid_identifier(local_name, reason));
        }
        let persistent = format!("{}/{}", parent.persistent_identity(), local_name);
        match version {
            Some(version) => Self::with_version(&persistent, version),
            None => Self::new(persistent),
        }
    }

    /// Re-split this identifier so that `version` is its version segment
    ///
    /// Returns `None` unless the text ends in `/version` and `version` is a
    /// valid version segment. The text is unchanged, so the result compares
    /// equal to `self`.
    pub fn split_version(&self, version: &str) -> Option<Identifier> {
        let persistent = self.uri.strip_suffix(version)?.strip_suffix('/')?;
        if persistent.is_empty() || Self::validate_version(version).is_err() {
            return None;
        }
        Some(Identifier {
            version_start: Some(persistent.len() + 1),
            uri: self.uri.clone(),
        })
    }

    /// Validate a candidate identifier
    pub fn validate(candidate: &str) -> std::result::Result<(), IdentifierError> {
        if candidate.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if candidate.len() > MAX_IDENTIFIER_LENGTH {
            return Err(IdentifierError::TooLong {
                length: candidate.len(),
                max: MAX_IDENTIFIER_LENGTH,
            });
        }
        for (pos, ch) in candidate.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(IdentifierError::InvalidChar {
                    char: ch,
                    position: pos,
                });
            }
        }
        Ok(())
    }

    /// Check a candidate without building an identifier
    pub fn is_valid(candidate: &str) -> bool {
        Self::validate(candidate).is_ok()
    }

    /// Validate a local display id used in [`Identifier::compose`]
    pub fn validate_display_id(local_name: &str) -> std::result::Result<(), IdentifierError> {
        let first = match local_name.chars().next() {
            Some(c) => c,
            None => return Err(IdentifierError::Empty),
        };
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(IdentifierError::InvalidStart { char: first });
        }
        for (pos, ch) in local_name.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() && ch != '_' {
                return Err(IdentifierError::InvalidChar {
                    char: ch,
                    position: pos,
                });
            }
        }
        Ok(())
    }

    fn validate_version(version: &str) -> std::result::Result<(), IdentifierError> {
        if version.is_empty() {
            return Err(IdentifierError::Empty);
        }
        for (pos, ch) in version.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() && !matches!(ch, '.' | '-' | '_') {
                return Err(IdentifierError::InvalidChar {
                    char: ch,
                    position: pos,
                });
            }
        }
        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        !c.is_whitespace()
            && !c.is_control()
            && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    }

    /// Get the identifier as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.uri
    }

    /// The persistent identity: the full identifier minus its version segment
    pub fn persistent_identity(&self) -> &str {
        match self.version_start {
            Some(start) => &self.uri[..start - 1],
            None => &self.uri,
        }
    }

    /// The version segment, if this identifier carries one
    pub fn version(&self) -> Option<&str> {
        self.version_start.map(|start| &self.uri[start..])
    }

    /// Last segment of the persistent identity
    ///
    /// Splits on `/`, `#` and `:`. A persistent identity ending in a
    /// separator yields an empty display id.
    pub fn display_id(&self) -> &str {
        let persistent = self.persistent_identity();
        match persistent.rfind(['/', '#', ':']) {
            Some(idx) => &persistent[idx + 1..],
            None => persistent,
        }
    }

    /// Whether this is a blank node label (`_:b0`)
    pub fn is_blank(&self) -> bool {
        self.uri.starts_with(BLANK_NODE_PREFIX)
    }

    /// Simple prefix match on the full string
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.uri.starts_with(prefix)
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uri.cmp(&other.uri)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.uri)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl std::borrow::Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.uri
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Identifier::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Identifier::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Identifier::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.uri
    }
}

// ============================================================================
// Tests
// ============================================================================
