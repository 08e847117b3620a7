//! Document graph
//!
//! The top-level container for one document. Top-level entities are kept in
//! buckets keyed by type tag, each bucket in insertion order; an identifier
//! index covers every entity reachable through owned nesting, so lookups and
//! the uniqueness check never walk the trees. Statements about subjects the
//! registry does not recognize are kept verbatim in a passthrough bucket and
//! written back on serialization.
//!
//! ```
//! use propgraph_core::Identifier;
//! use propgraph_engine::{Cardinality, DocumentGraph, EntityRegistry, EntitySchema, LiteralKind};
//!
//! let foo = EntitySchema::new("http://example.org/Foo")
//!     .scalar("http://example.org/name", LiteralKind::Text, Cardinality::REQUIRED);
//! let mut registry = EntityRegistry::new();
//! registry.register_schema(foo.clone());
//!
//! let mut entity = foo.instantiate(Identifier::new("http://example.org/a").unwrap()).unwrap();
//! entity.set_value("http://example.org/name", "widget").unwrap();
//!
//! let mut graph = DocumentGraph::new();
//! graph.add_top_level(entity).unwrap();
//!
//! let store = graph.serialize().unwrap();
//! let loaded = DocumentGraph::deserialize(&store, &registry).unwrap();
//! assert_eq!(loaded, graph);
//! ```

pub mod handle;
pub mod load;
pub mod report;

pub use handle::EntityMut;
pub use load::LoadContext;
pub use report::UnresolvedReference;

use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::property::Property;
use crate::registry::EntityRegistry;
use indexmap::IndexMap;
use propgraph_core::{Error, Identifier, Result, Statement, StatementStore, TypeTag};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Where an indexed entity lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Location {
    pub(crate) type_tag: TypeTag,
    pub(crate) root: Identifier,
    pub(crate) root_type: TypeTag,
}

/// One in-memory document: top-level entities, their owned trees and the
/// passthrough bucket
#[derive(Debug, Clone, Default)]
pub struct DocumentGraph {
    config: EngineConfig,
    roots: IndexMap<TypeTag, IndexMap<Identifier, Entity>>,
    index: HashMap<Identifier, Location>,
    unrecognized: IndexMap<Identifier, Vec<Statement>>,
}

impl DocumentGraph {
    /// Create an empty graph with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the configuration fails
    /// [`EngineConfig::validate`].
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(DocumentGraph {
            config,
            ..Self::default()
        })
    }

    /// Configuration this graph was created with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Top-level entities
    // ========================================================================

    /// Add a detached entity and its owned subtree as a top-level entity
    ///
    /// # Errors
    ///
    /// - `Error::OwnershipViolation` if the entity has an owner
    /// - `Error::DuplicateIdentifier` if any identifier in its subtree is
    ///   already used in this graph, or used twice within the subtree
    ///
    /// On error the graph is unchanged.
    pub fn add_top_level(&mut self, entity: Entity) -> Result<()> {
        if let Some(link) = entity.owner() {
            return Err(Error::OwnershipViolation {
                identifier: entity.identifier().clone(),
                owner: link.parent.clone(),
            });
        }
        let mut seen = HashSet::new();
        for id in entity.tree_ids() {
            if self.index.contains_key(id) || self.unrecognized.contains_key(id) || !seen.insert(id)
            {
                return Err(Error::DuplicateIdentifier(id.clone()));
            }
        }

        let root = entity.identifier().clone();
        let root_type = entity.type_tag().clone();
        self.index.insert(
            root.clone(),
            Location {
                type_tag: root_type.clone(),
                root: root.clone(),
                root_type: root_type.clone(),
            },
        );
        for child in entity.descendants() {
            self.index.insert(
                child.identifier().clone(),
                Location {
                    type_tag: child.type_tag().clone(),
                    root: root.clone(),
                    root_type: root_type.clone(),
                },
            );
        }
        debug!(
            target: "propgraph::document",
            identifier = %root,
            type_tag = %root_type,
            subtree = seen.len(),
            "Added top-level entity"
        );
        self.roots
            .entry(root_type)
            .or_default()
            .insert(root, entity);
        Ok(())
    }

    /// Remove a top-level entity, unregistering its whole subtree
    ///
    /// Returns `None` if the identifier does not name a top-level entity.
    pub fn remove_top_level(&mut self, identifier: &Identifier) -> Option<Entity> {
        let location = self.index.get(identifier)?;
        if &location.root != identifier {
            return None;
        }
        let root_type = location.root_type.clone();
        let bucket = self.roots.get_mut(&root_type)?;
        let entity = bucket.shift_remove(identifier)?;
        if bucket.is_empty() {
            self.roots.shift_remove(&root_type);
        }
        for id in entity.tree_ids() {
            self.index.remove(id);
        }
        debug!(
            target: "propgraph::document",
            identifier = %identifier,
            "Removed top-level entity"
        );
        Some(entity)
    }

    /// Top-level entities of one type, in insertion order
    pub fn top_level(&self, type_tag: &TypeTag) -> impl Iterator<Item = &Entity> + '_ {
        self.roots
            .get(type_tag)
            .into_iter()
            .flat_map(|bucket| bucket.values())
    }

    /// Types with at least one top-level entity, in first-added order
    pub fn top_level_types(&self) -> impl Iterator<Item = &TypeTag> + '_ {
        self.roots.keys()
    }

    /// Every top-level entity, grouped by type
    pub fn top_level_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.roots.values().flat_map(|bucket| bucket.values())
    }

    /// Every entity in the graph, each top-level entity followed by its
    /// subtree in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.top_level_entities()
            .flat_map(|root| std::iter::once(root).chain(root.descendants()))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Entity with this identifier anywhere in the graph
    pub fn find(&self, identifier: &Identifier) -> Option<&Entity> {
        let location = self.index.get(identifier)?;
        self.roots
            .get(&location.root_type)?
            .get(&location.root)?
            .find(identifier)
    }

    /// Mutable view of an entity anywhere in the graph
    pub fn entity_mut(&mut self, identifier: &Identifier) -> Option<EntityMut<'_>> {
        let location = self.index.get(identifier)?.clone();
        let entity = self
            .roots
            .get_mut(&location.root_type)?
            .get_mut(&location.root)?
            .find_mut(identifier)?;
        Some(EntityMut::new(
            entity,
            &mut self.index,
            &self.unrecognized,
            &self.config,
            location,
        ))
    }

    /// Whether an entity with this identifier is in the graph
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.index.contains_key(identifier)
    }

    /// Type of the entity with this identifier
    pub fn type_of(&self, identifier: &Identifier) -> Option<&TypeTag> {
        self.index.get(identifier).map(|location| &location.type_tag)
    }

    /// Number of entities, nested ones included
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the graph holds no entity
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Drop every entity and the passthrough bucket
    pub fn clear(&mut self) {
        self.roots.clear();
        self.index.clear();
        self.unrecognized.clear();
    }

    /// Mint an identifier under the homespace: `homespace/local_name[/version]`
    ///
    /// With no explicit version the configured default version is used.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no homespace is configured and
    /// `Error::InvalidIdentifier` if `local_name` is not a valid display id.
    pub fn mint_identifier(&self, local_name: &str, version: Option<&str>) -> Result<Identifier> {
        let homespace = self
            .config
            .homespace
            .as_deref()
            .ok_or_else(|| Error::Config("no homespace configured".to_string()))?;
        if let Err(reason) = Identifier::validate_display_id(local_name) {
            return Err(Error::invalid_identifier(local_name, reason));
        }
        let persistent = if homespace.ends_with(['/', '#']) {
            format!("{}{}", homespace, local_name)
        } else {
            format!("{}/{}", homespace, local_name)
        };
        match version.or(self.config.default_version.as_deref()) {
            Some(version) => Identifier::with_version(&persistent, version),
            None => Identifier::new(persistent),
        }
    }

    // ========================================================================
    // Validation and references
    // ========================================================================

    /// Check the cardinality of every property of every entity
    pub fn validate(&self) -> Result<()> {
        for root in self.top_level_entities() {
            root.validate()?;
        }
        Ok(())
    }

    /// Referenced-object values whose target is not in this graph
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        let mut report = Vec::new();
        for entity in self.iter() {
            for property in entity.properties().filter_map(Property::as_referenced) {
                for target in property.values() {
                    if !self.contains(target) {
                        report.push(UnresolvedReference {
                            subject: entity.identifier().clone(),
                            predicate: property.predicate().clone(),
                            target: target.clone(),
                            internal: self.config.in_homespace(target),
                        });
                    }
                }
            }
        }
        report
    }

    /// Unresolved references that point under the homespace
    pub fn dangling_references(&self) -> Vec<UnresolvedReference> {
        self.unresolved_references()
            .into_iter()
            .filter(UnresolvedReference::is_dangling)
            .collect()
    }

    // ========================================================================
    // Passthrough bucket
    // ========================================================================

    /// Subjects kept verbatim because no registered type matched
    pub fn unrecognized_subjects(&self) -> impl Iterator<Item = &Identifier> + '_ {
        self.unrecognized.keys()
    }

    /// Raw statements of an unrecognized subject
    pub fn unrecognized_statements(&self, subject: &Identifier) -> &[Statement] {
        self.unrecognized
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drop an unrecognized subject, returning its statements
    pub fn remove_unrecognized(&mut self, subject: &Identifier) -> Vec<Statement> {
        self.unrecognized.shift_remove(subject).unwrap_or_default()
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Write the whole graph as statements
    ///
    /// Top-level entities are written bucket by bucket in the order their
    /// types first appeared, each bucket in insertion order, followed by the
    /// passthrough statements. Every entity is validated first.
    pub fn serialize(&self) -> Result<StatementStore> {
        self.validate()?;
        let mut store = StatementStore::new();
        for root in self.top_level_entities() {
            root.emit(&mut store)?;
        }
        for statements in self.unrecognized.values() {
            store.extend(statements.iter().cloned());
        }
        debug!(
            target: "propgraph::document",
            entities = self.len(),
            passthrough = self.unrecognized.len(),
            statements = store.len(),
            "Serialized document graph"
        );
        Ok(store)
    }

    /// Build a graph from statements with the default configuration
    pub fn deserialize(store: &StatementStore, registry: &EntityRegistry) -> Result<Self> {
        Self::deserialize_with_config(store, registry, EngineConfig::default())
    }

    /// Build a graph from statements
    ///
    /// Subjects whose type is not registered do not fail the load; their
    /// statements go to the passthrough bucket.
    ///
    /// # Errors
    ///
    /// An invalid configuration is `Error::Config`. Any error raised while
    /// populating an entity aborts the load. Owned cycles and subjects owned
    /// twice are `Error::OwnershipViolation`.
    pub fn deserialize_with_config(
        store: &StatementStore,
        registry: &EntityRegistry,
        config: EngineConfig,
    ) -> Result<Self> {
        let mut graph = DocumentGraph::with_config(config)?;
        let mut ctx = LoadContext::new(registry, graph.config.max_nesting_depth);
        ctx.prepare(store)?;

        for id in ctx.unclaimed() {
            let Some(mut entity) = ctx.take_root(&id) else {
                continue;
            };
            ctx.populate(&mut entity, store)?;
            graph.add_top_level(entity)?;
        }
        if let Some((identifier, owner)) = ctx.leftover() {
            return Err(Error::OwnershipViolation { identifier, owner });
        }

        for subject in store.all_subjects() {
            if ctx.is_recognized(subject) {
                continue;
            }
            let statements: Vec<Statement> = store.statements_for(subject).cloned().collect();
            warn!(
                target: "propgraph::document",
                subject = %subject,
                statements = statements.len(),
                "Unrecognized subject kept in passthrough"
            );
            graph.unrecognized.insert(subject.clone(), statements);
        }

        debug!(
            target: "propgraph::document",
            statements = store.len(),
            entities = graph.len(),
            top_level = graph.top_level_entities().count(),
            passthrough = graph.unrecognized.len(),
            "Deserialized document graph"
        );
        Ok(graph)
    }
}

impl PartialEq for DocumentGraph {
    /// Structural equality: same top-level buckets in the same order, same
    /// entity trees, same passthrough content. Configuration is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(other.roots.iter())
                .all(|((ta, a), (tb, b))| ta == tb && a.len() == b.len() && a.iter().eq(b.iter()))
            && self.unrecognized.len() == other.unrecognized.len()
            && self.unrecognized.iter().eq(other.unrecognized.iter())
    }
}
