use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::model::{PersonId, PersonRelationships};

/// Thread-safe LRU cache for per-person relationship records
///
/// Avoids re-fetching relationship sets from the provider for people touched
/// by earlier searches. Uses LRU eviction to keep memory bounded to the
/// working set of active searches.
pub struct RelationshipCache {
    cache: Mutex<LruCache<PersonId, PersonRelationships>>,
}

impl RelationshipCache {
    /// Create a new relationship cache with the specified capacity
    ///
    /// A capacity of 0 is bumped to 1 (LRU cache requires non-zero capacity).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1))
            .expect("Cache capacity must be at least 1");

        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Get a cached relationship record for a person
    pub fn get(&self, person: &str) -> Option<PersonRelationships> {
        self.cache.lock().unwrap().get(person).cloned()
    }

    /// Store a relationship record in the cache
    pub fn put(&self, person: PersonId, relationships: PersonRelationships) {
        self.cache.lock().unwrap().put(person, relationships);
    }

    /// Get the current number of cached entries
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().unwrap().is_empty()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        self.cache.lock().unwrap().clear();
    }
}
