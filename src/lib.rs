pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod provider;
pub mod search;

pub use config::Config;
pub use context::GraphContext;
pub use error::{KinpathError, Result};
pub use model::{
    Edge, Gender, PersonId, PersonRelationships, RelationLabel, RelationshipFilter,
    RelationshipKind,
};
pub use provider::{MemoryProvider, PersonRecord, RelationshipProvider};
pub use search::{
    find_all_paths, find_ancestor_paths, find_shortest_path, is_reachable, PathMatch,
    Reachability, SearchRequest, SearchResult,
};
