//! Two-pass deserialization state
//!
//! Pass 1 walks every subject of the store and instantiates a bare entity
//! for each one whose type tag is registered, so identifiers resolve before
//! any property is populated. Owned links between instantiated subjects are
//! then collected as claims: a subject claimed by two owners, or by one owner
//! under two predicates, is an ownership violation. A repeated link statement
//! is one claim; its extra copies are kept as annotations. Unclaimed instantiated subjects become the top-level entities;
//! pass 2 populates them, taking each owned child out of the pool as its
//! owner reaches it.

use crate::entity::Entity;
use crate::property::Property;
use crate::registry::EntityRegistry;
use indexmap::IndexMap;
use propgraph_core::vocab::{PERSISTENT_IDENTITY, VERSION};
use propgraph_core::{
    Error, Identifier, PredicateTag, Result, Statement, StatementStore, TypeTag, Value,
};
use std::collections::HashMap;

/// Deserialization state shared by every entity of one load
pub struct LoadContext<'r> {
    registry: &'r EntityRegistry,
    pool: IndexMap<Identifier, Entity>,
    types: HashMap<Identifier, TypeTag>,
    claims: HashMap<Identifier, (Identifier, PredicateTag)>,
    depth: usize,
    max_depth: usize,
}

impl<'r> LoadContext<'r> {
    /// Create an empty context
    pub fn new(registry: &'r EntityRegistry, max_depth: usize) -> Self {
        LoadContext {
            registry,
            pool: IndexMap::new(),
            types: HashMap::new(),
            claims: HashMap::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Registry used to instantiate subjects
    pub fn registry(&self) -> &EntityRegistry {
        self.registry
    }

    /// Instantiate every recognized subject and collect owned claims
    ///
    /// A subject's type is the first of its type statements that names a
    /// registered type.
    ///
    /// # Errors
    ///
    /// - `Error::OwnershipViolation` if one subject is owned twice
    /// - any error a constructor returns
    pub fn prepare(&mut self, store: &StatementStore) -> Result<()> {
        for subject in store.all_subjects() {
            let type_tag = store
                .statements_for(subject)
                .filter_map(Statement::declared_type)
                .find(|tag| self.registry.is_registered(tag));
            if let Some(type_tag) = type_tag {
                let identifier = versioned_subject(store, subject);
                let entity = self.registry.create(&type_tag, identifier.clone())?;
                self.types.insert(identifier.clone(), type_tag);
                self.pool.insert(identifier, entity);
            }
        }

        for (owner, entity) in &self.pool {
            for property in entity.properties().filter_map(Property::as_owned) {
                for value in store.objects(owner, property.predicate()) {
                    let Value::Resource(child) = value else {
                        continue;
                    };
                    if !self.pool.contains_key(child) {
                        continue;
                    }
                    let claim = (owner.clone(), property.predicate().clone());
                    match self.claims.get(child) {
                        // A repeated link statement is the same claim.
                        Some(previous) if *previous == claim => {}
                        Some((previous, _)) => {
                            return Err(Error::OwnershipViolation {
                                identifier: child.clone(),
                                owner: previous.clone(),
                            })
                        }
                        None => {
                            self.claims.insert(child.clone(), claim);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Instantiated subjects nothing owns, in store order
    pub(crate) fn unclaimed(&self) -> Vec<Identifier> {
        self.pool
            .keys()
            .filter(|id| !self.claims.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Type of an instantiated subject
    pub fn type_of(&self, identifier: &Identifier) -> Option<TypeTag> {
        self.types.get(identifier).cloned()
    }

    /// Whether the subject was instantiated in pass 1
    pub fn is_recognized(&self, identifier: &Identifier) -> bool {
        self.types.contains_key(identifier)
    }

    pub(crate) fn take_root(&mut self, identifier: &Identifier) -> Option<Entity> {
        self.pool.shift_remove(identifier)
    }

    /// Take the pooled entity `child` for `owner`
    ///
    /// `Ok(None)` means the child cannot be instantiated here.
    pub(crate) fn take_child(
        &mut self,
        owner: &Identifier,
        child: &Identifier,
    ) -> Result<Option<Entity>> {
        match self.claims.get(child) {
            Some((claimant, _)) if claimant != owner => Err(Error::OwnershipViolation {
                identifier: child.clone(),
                owner: claimant.clone(),
            }),
            _ => Ok(self.pool.shift_remove(child)),
        }
    }

    /// Populate one entity, one nesting level deeper
    pub(crate) fn populate(&mut self, entity: &mut Entity, store: &StatementStore) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                identifier: entity.identifier().clone(),
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = entity.deserialize_from(store, self);
        self.depth -= 1;
        result
    }

    /// First pooled entity no owner reached, with its claimant
    ///
    /// After pass 2 only owned cycles are left in the pool.
    pub(crate) fn leftover(&self) -> Option<(Identifier, Identifier)> {
        self.pool.keys().next().map(|id| {
            let owner = self
                .claims
                .get(id)
                .map(|(owner, _)| owner.clone())
                .unwrap_or_else(|| id.clone());
            (id.clone(), owner)
        })
    }
}

/// Rebuild the version split a serialized entity recorded about itself
///
/// Falls back to the flat subject when the recorded version does not end
/// the identifier or the persistent identity disagrees with the split.
fn versioned_subject(store: &StatementStore, subject: &Identifier) -> Identifier {
    let version_tag = PredicateTag::new(VERSION);
    let version = store
        .objects(subject, &version_tag)
        .find_map(|value| value.as_literal().and_then(|lit| lit.as_str()));
    let Some(split) = version.and_then(|v| subject.split_version(v)) else {
        return subject.clone();
    };
    let persistent_tag = PredicateTag::new(PERSISTENT_IDENTITY);
    let recorded = store
        .objects(subject, &persistent_tag)
        .find_map(Value::as_resource);
    match recorded {
        Some(persistent) if persistent.as_str() != split.persistent_identity() => subject.clone(),
        _ => split,
    }
}
