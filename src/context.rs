//! Session-scoped context: the provider handle, both memoization caches and
//! the configuration. One `GraphContext` is shared by all searches of a
//! session; only the caches inside it are mutable, and each is individually
//! lock-guarded.

use std::sync::Arc;

use crate::cache::{NeighborCache, RelationshipCache};
use crate::config::Config;
use crate::model::{PersonId, PersonRelationships};
use crate::provider::RelationshipProvider;

pub struct GraphContext {
    provider: Arc<dyn RelationshipProvider>,
    relationship_cache: RelationshipCache,
    neighbor_cache: NeighborCache,
    config: Config,
}

impl GraphContext {
    pub fn new(provider: Arc<dyn RelationshipProvider>) -> Self {
        Self::with_config(provider, Config::default())
    }

    pub fn with_config(provider: Arc<dyn RelationshipProvider>, config: Config) -> Self {
        let relationship_cache = RelationshipCache::new(config.cache.relationship_capacity);
        let neighbor_cache = NeighborCache::new(config.cache.neighbor_capacity);
        Self {
            provider,
            relationship_cache,
            neighbor_cache,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Relationship record for a person, memoized in the relationship cache.
    ///
    /// Unknown people are not cached: the negative answer is cheap to
    /// recompute and almost always precedes an error return anyway.
    pub fn relationships(&self, person: &str) -> Option<PersonRelationships> {
        if let Some(hit) = self.relationship_cache.get(person) {
            return Some(hit);
        }
        let fetched = self.provider.relationships(person)?;
        self.relationship_cache
            .put(PersonId::from(person), fetched.clone());
        Some(fetched)
    }

    pub fn birth_year(&self, person: &str) -> Option<i32> {
        self.provider.birth_year(person)
    }

    pub fn display_name(&self, person: &str) -> Option<String> {
        self.provider.display_name(person)
    }

    pub(crate) fn neighbor_cache(&self) -> &NeighborCache {
        &self.neighbor_cache
    }

    /// Drop all memoized neighbor and relationship data.
    ///
    /// Must be called by any layer that mutates the underlying records;
    /// until then, searches may observe stale data.
    pub fn clear_caches(&self) {
        self.neighbor_cache.clear();
        self.relationship_cache.clear();
    }
}
