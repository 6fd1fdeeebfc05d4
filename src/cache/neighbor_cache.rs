use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::model::{Edge, PersonId, RelationshipKind};

/// Key for one memoized neighbor expansion.
///
/// The kind list is sorted (it comes from `RelationshipFilter::sorted_kinds`)
/// so equal filters always produce equal keys regardless of how the caller
/// assembled them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NeighborCacheKey {
    pub person: PersonId,
    pub kinds: Vec<RelationshipKind>,
    pub exclude_spouse_children: bool,
}

/// Thread-safe LRU cache for computed neighbor lists
///
/// Neighbor expansion touches the same people many times within one
/// bidirectional search (and across searches in a session), so the resolved
/// edge lists are memoized per (person, filter, exclusion flag).
pub struct NeighborCache {
    cache: Mutex<LruCache<NeighborCacheKey, Vec<Edge>>>,
}

impl NeighborCache {
    /// Create a new neighbor cache with the specified capacity
    ///
    /// A capacity of 0 is bumped to 1 (LRU cache requires non-zero capacity).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1))
            .expect("Cache capacity must be at least 1");

        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Get the cached edge list for a key
    pub fn get(&self, key: &NeighborCacheKey) -> Option<Vec<Edge>> {
        self.cache.lock().unwrap().get(key).cloned()
    }

    /// Store an edge list in the cache
    pub fn put(&self, key: NeighborCacheKey, edges: Vec<Edge>) {
        self.cache.lock().unwrap().put(key, edges);
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
