//! Statement store
//!
//! An ordered multiset of [`Statement`]s grouped by subject. The store is a
//! dumb fact base: it performs no validation and knows nothing about
//! entities, properties or cardinality.
//!
//! ## Ordering
//!
//! - [`StatementStore::iter`] yields statements in global insertion order
//! - [`StatementStore::statements_for`] yields one subject's statements in insertion order
//! - [`StatementStore::all_subjects`] yields subjects in order of first appearance
//!
//! Stable ordering is what makes re-serialization deterministic.
//!
//! ## Removal
//!
//! `remove_all` leaves tombstones in the backing vector so indices held by
//! other subjects stay valid. Call [`StatementStore::compact`] to reclaim them.

use crate::identifier::Identifier;
use crate::statement::{Statement, Value};
use crate::tag::{PredicateTag, TypeTag};
use indexmap::IndexMap;

/// Ordered multiset of statements grouped by subject
#[derive(Debug, Clone, Default)]
pub struct StatementStore {
    /// Statements in insertion order; `None` marks a removed statement
    entries: Vec<Option<Statement>>,
    /// Subject -> indices into `entries`, subjects in first-seen order
    by_subject: IndexMap<Identifier, Vec<usize>>,
    /// Number of live statements
    live: usize,
}

impl StatementStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` statements
    pub fn with_capacity(capacity: usize) -> Self {
        StatementStore {
            entries: Vec::with_capacity(capacity),
            by_subject: IndexMap::new(),
            live: 0,
        }
    }

    /// Append a statement
    pub fn add(&mut self, statement: Statement) {
        let idx = self.entries.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(idx);
        self.entries.push(Some(statement));
        self.live += 1;
    }

    /// Remove every statement with this subject and predicate
    ///
    /// Returns the number of statements removed.
    pub fn remove_all(&mut self, subject: &Identifier, predicate: &PredicateTag) -> usize {
        let Some(indices) = self.by_subject.get_mut(subject) else {
            return 0;
        };
        let entries = &mut self.entries;
        let before = indices.len();
        indices.retain(|&idx| {
            let matches = entries[idx]
                .as_ref()
                .is_some_and(|stmt| &stmt.predicate == predicate);
            if matches {
                entries[idx] = None;
            }
            !matches
        });
        let removed = before - indices.len();
        if indices.is_empty() {
            self.by_subject.shift_remove(subject);
        }
        self.live -= removed;
        removed
    }

    /// Remove and return every statement about a subject, in insertion order
    pub fn take_subject(&mut self, subject: &Identifier) -> Vec<Statement> {
        let Some(indices) = self.by_subject.shift_remove(subject) else {
            return Vec::new();
        };
        let taken: Vec<Statement> = indices
            .into_iter()
            .filter_map(|idx| self.entries[idx].take())
            .collect();
        self.live -= taken.len();
        taken
    }

    /// Statements about one subject, in insertion order
    ///
    /// The returned iterator is lazy and `Clone`, so it can be restarted.
    pub fn statements_for(&self, subject: &Identifier) -> StatementsFor<'_> {
        let indices: &[usize] = match self.by_subject.get(subject) {
            Some(indices) => indices,
            None => &[],
        };
        StatementsFor {
            entries: &self.entries,
            indices: indices.iter(),
        }
    }

    /// Objects of the statements matching a subject and predicate
    pub fn objects<'a>(
        &'a self,
        subject: &Identifier,
        predicate: &'a PredicateTag,
    ) -> impl Iterator<Item = &'a Value> + Clone + 'a {
        self.statements_for(subject)
            .filter(move |stmt| &stmt.predicate == predicate)
            .map(|stmt| &stmt.value)
    }

    /// Every subject with at least one statement, in order of first appearance
    pub fn all_subjects(&self) -> impl Iterator<Item = &Identifier> + '_ {
        self.by_subject.keys()
    }

    /// Whether any statement is about this subject
    pub fn contains_subject(&self, subject: &Identifier) -> bool {
        self.by_subject.contains_key(subject)
    }

    /// Resource type declared by the subject's first `rdf:type` statement
    pub fn type_of(&self, subject: &Identifier) -> Option<TypeTag> {
        self.statements_for(subject)
            .find_map(Statement::declared_type)
    }

    /// Every statement, in global insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Statement> + '_ {
        self.entries.iter().filter_map(Option::as_ref)
    }

    /// Number of live statements
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the store holds no statements
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of distinct subjects
    pub fn subject_count(&self) -> usize {
        self.by_subject.len()
    }

    /// Drop tombstones left by removals, keeping order
    pub fn compact(&mut self) {
        if self.entries.len() == self.live {
            return;
        }
        let entries = std::mem::take(&mut self.entries);
        self.by_subject.clear();
        self.live = 0;
        for stmt in entries.into_iter().flatten() {
            self.add(stmt);
        }
    }
}

impl PartialEq for StatementStore {
    /// Two stores are equal when they hold the same statements in the same order
    fn eq(&self, other: &Self) -> bool {
        self.live == other.live && self.iter().eq(other.iter())
    }
}

impl Extend<Statement> for StatementStore {
    fn extend<T: IntoIterator<Item = Statement>>(&mut self, iter: T) {
        for stmt in iter {
            self.add(stmt);
        }
    }
}

impl FromIterator<Statement> for StatementStore {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        let mut store = StatementStore::new();
        store.extend(iter);
        store
    }
}

/// Lazy, restartable iterator over one subject's statements
#[derive(Debug, Clone)]
pub struct StatementsFor<'a> {
    entries: &'a [Option<Statement>],
    indices: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for StatementsFor<'a> {
    type Item = &'a Statement;

    fn next(&mut self) -> Option<Self::Item> {
        for &idx in self.indices.by_ref() {
            if let Some(stmt) = self.entries[idx].as_ref() {
                return Some(stmt);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.indices.len()))
    }
}
