pub mod neighbor_cache;
pub mod relationship_cache;

pub use neighbor_cache::{NeighborCache, NeighborCacheKey};
pub use relationship_cache::RelationshipCache;
