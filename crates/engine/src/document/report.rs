//! Reference reports

use propgraph_core::{Identifier, PredicateTag};
use std::fmt;

/// A referenced-object value whose target is not in the document graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnresolvedReference {
    /// Entity holding the reference
    pub subject: Identifier,
    /// Predicate of the referenced property
    pub predicate: PredicateTag,
    /// The missing target
    pub target: Identifier,
    /// Whether the target lies under the configured homespace, i.e. it
    /// should have resolved in this document
    pub internal: bool,
}

impl UnresolvedReference {
    /// A dangling reference points inside the document but resolves to nothing
    pub fn is_dangling(&self) -> bool {
        self.internal
    }
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.internal { "dangling" } else { "external" };
        write!(
            f,
            "{} reference {} -[{}]-> {}",
            kind, self.subject, self.predicate, self.target
        )
    }
}
