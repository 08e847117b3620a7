//! Engine configuration via `propgraph.toml`
//!
//! Every field has a default, so an empty file (or no file) yields the
//! default configuration. The configuration is passed explicitly into
//! [`DocumentGraph::with_config`](crate::document::DocumentGraph::with_config)
//! and [`DocumentGraph::deserialize_with_config`](crate::document::DocumentGraph::deserialize_with_config).

use propgraph_core::{Error, Identifier, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Config file name conventionally used next to a document.
pub const CONFIG_FILE_NAME: &str = "propgraph.toml";

/// Default recursion limit for owned nesting during deserialization.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// When lower cardinality bounds are enforced
///
/// Upper bounds are always enforced on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalityPolicy {
    /// Removals below the lower bound are allowed; `validate()` and
    /// serialization reject them.
    #[default]
    Lazy,
    /// Removals through a document graph that would go below the lower bound
    /// are rejected before mutating.
    Eager,
}

impl CardinalityPolicy {
    /// Whether lower bounds are checked on removal
    pub fn is_eager(&self) -> bool {
        matches!(self, CardinalityPolicy::Eager)
    }
}

/// Engine configuration loaded from `propgraph.toml`.
///
/// # Example
///
/// ```toml
/// # "lazy" (default) or "eager"
/// cardinality = "eager"
/// homespace = "http://example.org/"
/// default_version = "1"
/// max_nesting_depth = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lower-bound enforcement policy.
    #[serde(default)]
    pub cardinality: CardinalityPolicy,
    /// Identifier prefix of this document. Unresolved references under it
    /// are dangling; everything else unresolved is external.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homespace: Option<String>,
    /// Version given to identifiers minted through a document graph when the
    /// caller supplies none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
    /// Recursion guard for owned nesting during deserialization.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cardinality: CardinalityPolicy::default(),
            homespace: None,
            default_version: None,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# propgraph engine configuration
#
# Lower-bound cardinality policy: "lazy" (default) or "eager"
#   "lazy"  = removals may leave a required property empty; validate()
#             and serialization reject it
#   "eager" = removals through a document graph that would leave a
#             required property empty are rejected immediately
# Upper bounds are always enforced on every add.
cardinality = "lazy"

# Identifier prefix of this document. Unresolved references under it are
# reported as dangling; other unresolved references are external.
# homespace = "http://example.org/"

# Version given to minted identifiers when none is supplied.
# default_version = "1"

# Maximum owned nesting depth accepted during deserialization.
max_nesting_depth = 128
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text cannot be parsed or holds an
    /// invalid value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it cannot be parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        info!(
            target: "propgraph::config",
            path = %path.display(),
            cardinality = ?config.cardinality,
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize configuration: {}", e)))
    }

    /// Check field values.
    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(Error::Config(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if let Some(homespace) = &self.homespace {
            if let Err(reason) = Identifier::validate(homespace) {
                return Err(Error::Config(format!(
                    "invalid homespace '{}': {}",
                    homespace, reason
                )));
            }
        }
        if let Some(version) = &self.default_version {
            let valid = !version.is_empty()
                && version
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
            if !valid {
                return Err(Error::Config(format!(
                    "invalid default_version '{}': expected [A-Za-z0-9._-]+",
                    version
                )));
            }
        }
        Ok(())
    }

    /// Whether an identifier lies under the configured homespace.
    pub fn in_homespace(&self, identifier: &Identifier) -> bool {
        self.homespace
            .as_deref()
            .map_or(false, |prefix| identifier.starts_with(prefix))
    }
}
