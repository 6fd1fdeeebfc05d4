//! Relationship-path search over the implicit family graph.
//!
//! The graph is never materialized: edges are resolved lazily per person
//! (`neighbors`), a bounded bidirectional Dijkstra finds shortest paths
//! (`bidirectional`), a bounded BFS probe fast-fails disconnected pairs
//! (`connectivity`), DFS enumerators collect all qualifying paths
//! (`paths`), and resolved paths are labeled and described (`describe`).

pub mod bidirectional;
pub mod connectivity;
pub mod describe;
pub mod neighbors;
pub mod paths;
pub mod priority;

pub use bidirectional::{find_shortest_path, SearchRequest, SearchResult, DEFAULT_MAX_DISTANCE};
pub use connectivity::{is_reachable, Reachability};
pub use describe::{describe_path, detailed_path, relationship_chain};
pub use neighbors::neighbors;
pub use paths::{
    find_all_paths, find_ancestor_paths, PathMatch, DEFAULT_ALL_PATHS_DEPTH, DEFAULT_MAX_PATHS,
};
