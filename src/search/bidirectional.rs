//! Bidirectional Dijkstra search between two people.
//!
//! Two frontiers expand toward each other, one rooted at each endpoint,
//! alternating by visited count so neither side runs ahead. A node visited
//! by both sides is a meeting point; under the ascending queue order the
//! first meeting point that satisfies the minimum-distance requirement is
//! optimal. Neighbor expansion is lazy and memoized, so the graph is never
//! materialized.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::context::GraphContext;
use crate::error::{KinpathError, Result};
use crate::model::{PersonId, RelationLabel, RelationshipFilter, RelationshipKind};
use crate::search::connectivity::{is_reachable, Reachability};
use crate::search::describe::{describe_path, detailed_path, relationship_chain};
use crate::search::neighbors::neighbors;
use crate::search::priority::FrontierEntry;

/// Applied when a request carries a zero max_distance.
pub const DEFAULT_MAX_DISTANCE: u32 = 30;

/// Combined-frontier overage tolerated past max_distance before the search
/// gives up, for legitimately long but valid paths.
const MAX_DISTANCE_TOLERANCE: f64 = 1.2;

/// Parameters of one shortest-path query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub start: PersonId,
    pub end: PersonId,
    pub filter: RelationshipFilter,
    /// Maximum relationship distance to search. 0 is normalized to
    /// [`DEFAULT_MAX_DISTANCE`]; values above the configured ceiling are
    /// clamped to it.
    pub max_distance: u32,
    /// Minimum distance a path must have to be accepted. When it cannot be
    /// met, the unconstrained shortest path is silently substituted unless
    /// `strict_min_distance` is set.
    pub min_distance: u32,
    pub strict_min_distance: bool,
    /// Drop spouse and child edges of the two endpoints themselves, e.g. to
    /// find a cousin-style connection between spouses.
    pub exclude_initial_spouse_children: bool,
}

impl SearchRequest {
    pub fn new(
        start: impl Into<PersonId>,
        end: impl Into<PersonId>,
        filter: RelationshipFilter,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            filter,
            max_distance: DEFAULT_MAX_DISTANCE,
            min_distance: 0,
            strict_min_distance: false,
            exclude_initial_spouse_children: false,
        }
    }
}

/// Outcome of one shortest-path query.
///
/// A search that finds nothing is not an error: `path` is `None` and
/// `distance` is -1. For every successful result
/// `relationship_chain.len() == path.len() - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub path: Option<Vec<PersonId>>,
    pub distance: i64,
    pub relationship_chain: Vec<RelationLabel>,
    pub description: String,
    /// Step-by-step rendering, one string per hop.
    pub detailed_path: Vec<String>,
}

impl SearchResult {
    fn no_path(request: &SearchRequest) -> Self {
        let kinds = request
            .filter
            .sorted_kinds()
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let description = if request.min_distance > 0 {
            format!(
                "No relationship path found with minimum distance {} using allowed relationship types: {}",
                request.min_distance, kinds
            )
        } else {
            format!(
                "No relationship path found with allowed relationship types: {}",
                kinds
            )
        };
        Self {
            path: None,
            distance: -1,
            relationship_chain: Vec::new(),
            description,
            detailed_path: Vec::new(),
        }
    }
}

/// One direction of the search: its own distance map, predecessor map,
/// visited set and priority queue.
struct Side {
    root: PersonId,
    /// Birth year of the opposite endpoint, anchoring the heuristic.
    anchor_birth_year: Option<i32>,
    distances: HashMap<PersonId, u32>,
    previous: HashMap<PersonId, (PersonId, RelationshipKind)>,
    visited: HashSet<PersonId>,
    queue: BinaryHeap<Reverse<FrontierEntry>>,
}

impl Side {
    fn new(ctx: &GraphContext, root: PersonId, anchor_birth_year: Option<i32>) -> Self {
        let mut distances = HashMap::new();
        distances.insert(root.clone(), 0);
        let mut queue = BinaryHeap::new();
        queue.push(Reverse(FrontierEntry::new(
            0,
            root.clone(),
            vec![root.clone()],
            ctx.birth_year(&root),
            anchor_birth_year,
        )));
        Self {
            root,
            anchor_birth_year,
            distances,
            previous: HashMap::new(),
            visited: HashSet::new(),
            queue,
        }
    }

    /// Distance of the cheapest pending entry, `None` on an empty queue.
    fn min_pending(&self) -> Option<u32> {
        self.queue.peek().map(|Reverse(e)| e.distance)
    }
}

/// Pop and settle one node on `side`, expanding its neighbors.
///
/// Returns the accepted meeting point when this step completed the search.
/// Meeting points below `min_distance` are recorded in `shortest` as the
/// fallback and the node is still expanded, since a longer qualifying path
/// may pass beyond it.
#[allow(clippy::too_many_arguments)]
fn step(
    ctx: &GraphContext,
    filter: &RelationshipFilter,
    side: &mut Side,
    other: &Side,
    exclude_initial: bool,
    effective_max: u32,
    min_distance: u32,
    best: &mut Option<(u32, PersonId)>,
    shortest: &mut Option<(u32, PersonId)>,
) -> bool {
    let entry = match side.queue.pop() {
        Some(Reverse(entry)) => entry,
        None => return false,
    };

    // Already settled through a cheaper entry
    if side.visited.contains(&entry.person) {
        return false;
    }
    // Stale entry: a shorter distance was relaxed in after this was queued
    if entry.distance > *side.distances.get(&entry.person).unwrap_or(&u32::MAX) {
        return false;
    }

    side.visited.insert(entry.person.clone());

    if other.visited.contains(&entry.person) {
        let total = side.distances[&entry.person] + other.distances[&entry.person];

        // Track the overall shortest meeting as fallback, regardless of
        // the minimum-distance requirement
        if shortest.as_ref().map_or(true, |(d, _)| total < *d) {
            *shortest = Some((total, entry.person.clone()));
        }

        if total >= min_distance && best.as_ref().map_or(true, |(d, _)| total < *d) {
            log::debug!(
                "bidirectional: meeting point {} at distance {}",
                entry.person,
                total
            );
            *best = Some((total, entry.person));
            return true;
        }
    }

    // Each side only needs to cover half the distance budget
    if entry.distance >= effective_max / 2 {
        return false;
    }
    if let Some((best_distance, _)) = best {
        if entry.distance >= *best_distance {
            return false;
        }
    }

    // The spouse/children exclusion applies to the endpoints themselves,
    // never to intermediate nodes
    let exclude = exclude_initial && entry.person == side.root;
    for edge in neighbors(ctx, &entry.person, filter, exclude) {
        if side.visited.contains(&edge.neighbor) {
            continue;
        }
        let distance = entry.distance + edge.weight;
        if distance < *side.distances.get(&edge.neighbor).unwrap_or(&u32::MAX) {
            side.distances.insert(edge.neighbor.clone(), distance);
            side.previous
                .insert(edge.neighbor.clone(), (entry.person.clone(), edge.kind));
            let mut path = entry.path.clone();
            path.push(edge.neighbor.clone());
            side.queue.push(Reverse(FrontierEntry::new(
                distance,
                edge.neighbor.clone(),
                path,
                ctx.birth_year(&edge.neighbor),
                side.anchor_birth_year,
            )));
        }
    }

    false
}

/// Stitch the two predecessor chains together at the meeting node.
fn reconstruct(forward: &Side, backward: &Side, meeting: &PersonId, swapped: bool) -> Vec<PersonId> {
    // Forward side: meeting back to the forward root, then reversed
    let mut path = Vec::new();
    let mut current = meeting.clone();
    loop {
        path.push(current.clone());
        match forward.previous.get(&current) {
            Some((prev, _)) => current = prev.clone(),
            None => break,
        }
    }
    path.reverse();

    // Backward side: successors of the meeting node out to the backward
    // root (the meeting node itself is already in place)
    let mut current = meeting.clone();
    while let Some((next, _)) = backward.previous.get(&current) {
        path.push(next.clone());
        current = next.clone();
    }

    if swapped {
        path.reverse();
    }
    path
}

/// Core engine. Returns the path and its distance, or `None` when no
/// qualifying path exists within the budgets.
fn bidirectional_search(
    ctx: &GraphContext,
    start: &str,
    end: &str,
    filter: &RelationshipFilter,
    effective_max: u32,
    exclude_initial: bool,
    min_distance: u32,
    strict_min_distance: bool,
) -> Option<(Vec<PersonId>, u32)> {
    let start_neighbors = neighbors(ctx, start, filter, exclude_initial);
    let end_neighbors = neighbors(ctx, end, filter, exclude_initial);

    // Explore from the rarer side first; remember to un-reverse the path
    let (start, end, swapped) = if end_neighbors.len() < start_neighbors.len() {
        (end, start, true)
    } else {
        (start, end, false)
    };

    let mut forward = Side::new(ctx, start.to_string(), ctx.birth_year(end));
    let mut backward = Side::new(ctx, end.to_string(), ctx.birth_year(start));

    let time_limit = Duration::from_secs(ctx.config().search.time_limit_secs);
    let search_start = Instant::now();

    let mut best: Option<(u32, PersonId)> = None;
    let mut shortest: Option<(u32, PersonId)> = None;

    while !forward.queue.is_empty() || !backward.queue.is_empty() {
        let min_forward = forward.min_pending();
        let min_backward = backward.min_pending();

        // Combined pending distance beyond the budget (with tolerance)
        if let (Some(f), Some(b)) = (min_forward, min_backward) {
            if f64::from(f + b) > f64::from(effective_max) * MAX_DISTANCE_TOLERANCE {
                break;
            }
        }
        // One side exhausted all reachable nodes without ever meeting the
        // other: the endpoints are in different components
        if (min_forward.is_none() || min_backward.is_none()) && best.is_none() {
            break;
        }
        // No cheaper meeting point can still exist
        if let Some((best_distance, _)) = &best {
            let combined = min_forward
                .map_or(u64::MAX, u64::from)
                .saturating_add(min_backward.map_or(u64::MAX, u64::from));
            if combined >= u64::from(*best_distance) {
                break;
            }
        }
        if search_start.elapsed() > time_limit {
            log::warn!(
                "bidirectional: time limit {:?} exceeded, treating as disconnected",
                time_limit
            );
            break;
        }

        // Keep exploration balanced: step the side with fewer settled nodes
        let finished = if !forward.queue.is_empty()
            && (backward.queue.is_empty() || forward.visited.len() <= backward.visited.len())
        {
            step(
                ctx,
                filter,
                &mut forward,
                &backward,
                exclude_initial,
                effective_max,
                min_distance,
                &mut best,
                &mut shortest,
            )
        } else {
            step(
                ctx,
                filter,
                &mut backward,
                &forward,
                exclude_initial,
                effective_max,
                min_distance,
                &mut best,
                &mut shortest,
            )
        };
        if finished {
            break;
        }
    }

    let (total, meeting) = match best {
        Some((total, meeting)) => (total, meeting),
        None => {
            // No meeting satisfied min_distance; fall back to the plain
            // shortest connection unless the caller demanded strictness
            if min_distance > 0 {
                match (&shortest, strict_min_distance) {
                    (Some(_), true) | (None, _) => return None,
                    (Some((d, node)), false) => {
                        log::debug!(
                            "bidirectional: min_distance {} unmet, using shortest path at distance {}",
                            min_distance,
                            d
                        );
                        (*d, node.clone())
                    }
                }
            } else {
                return None;
            }
        }
    };

    let path = reconstruct(&forward, &backward, &meeting, swapped);

    // A shortest path can never revisit a node; a duplicate here means the
    // meeting-point bookkeeping is corrupted, so return nothing rather
    // than a broken path
    let unique: HashSet<&PersonId> = path.iter().collect();
    if unique.len() != path.len() {
        log::error!(
            "bidirectional: reconstructed path contains {} duplicate nodes, discarding",
            path.len() - unique.len()
        );
        return None;
    }

    Some((path, total))
}

/// Find the shortest relationship path between two people.
///
/// Both endpoints must resolve through the provider. Identity queries
/// return a zero-length result without searching. A connectivity probe
/// fast-fails pairs in provably different components before the weighted
/// search runs; all other negative outcomes (disconnection discovered
/// during the search, unsatisfiable bounds under strict mode, exhausted
/// budgets) come back as a no-path result, not an error.
pub fn find_shortest_path(ctx: &GraphContext, request: &SearchRequest) -> Result<SearchResult> {
    let started = Instant::now();

    if ctx.relationships(&request.start).is_none() {
        return Err(KinpathError::PersonNotFound(request.start.clone()));
    }
    if ctx.relationships(&request.end).is_none() {
        return Err(KinpathError::PersonNotFound(request.end.clone()));
    }

    if request.start == request.end {
        return Ok(SearchResult {
            path: Some(vec![request.start.clone()]),
            distance: 0,
            relationship_chain: Vec::new(),
            description: "Same person".to_string(),
            detailed_path: Vec::new(),
        });
    }

    let max_distance = if request.max_distance < 1 {
        DEFAULT_MAX_DISTANCE
    } else {
        request.max_distance
    };
    let effective_max = max_distance.min(ctx.config().search.max_distance_ceiling);

    if is_reachable(
        ctx,
        &request.start,
        &request.end,
        &request.filter,
        ctx.config().search.precheck_node_budget,
    ) == Reachability::Disconnected
    {
        log::debug!(
            "shortest path: {} and {} are in different components",
            request.start,
            request.end
        );
        return Ok(SearchResult::no_path(request));
    }

    let outcome = bidirectional_search(
        ctx,
        &request.start,
        &request.end,
        &request.filter,
        effective_max,
        request.exclude_initial_spouse_children,
        request.min_distance,
        request.strict_min_distance,
    );

    match outcome {
        None => Ok(SearchResult::no_path(request)),
        Some((path, distance)) => {
            let chain = relationship_chain(ctx, &path, &request.filter);
            let description = describe_path(ctx, &path, &chain);
            let detailed = detailed_path(ctx, &path, &chain);
            log::debug!(
                "shortest path search took {:?}, distance {}",
                started.elapsed(),
                distance
            );
            Ok(SearchResult {
                path: Some(path),
                distance: i64::from(distance),
                relationship_chain: chain,
                description,
                detailed_path: detailed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Gender;
    use crate::provider::{MemoryProvider, PersonRecord};
    use std::sync::Arc;

    fn person(id: &str, name: &str, gender: Option<Gender>) -> PersonRecord {
        let mut record = PersonRecord::new(id);
        record.name = Some(name.to_string());
        record.gender = gender;
        record
    }

    /// Father F, mother M (married), children C1 (male) and C2 (female).
    fn nuclear_family() -> MemoryProvider {
        let mut provider = MemoryProvider::new();
        provider.insert(person("F", "Frank", Some(Gender::Male)));
        provider.insert(person("M", "Maria", Some(Gender::Female)));
        provider.insert(person("C1", "Carl", Some(Gender::Male)));
        provider.insert(person("C2", "Clara", Some(Gender::Female)));
        provider.link_spouses("F", "M");
        for child in ["C1", "C2"] {
            provider.link_parent_child("F", child);
            provider.link_parent_child("M", child);
        }
        provider
    }

    fn ctx(provider: MemoryProvider) -> GraphContext {
        let _ = env_logger::builder().is_test(true).try_init();
        GraphContext::new(Arc::new(provider))
    }

    #[test]
    fn test_identity_query() {
        let ctx = ctx(nuclear_family());
        let request = SearchRequest::new("F", "F", RelationshipFilter::all());
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 0);
        assert_eq!(result.path, Some(vec!["F".to_string()]));
        assert!(result.relationship_chain.is_empty());
        assert_eq!(result.description, "Same person");
    }

    #[test]
    fn test_unknown_person_is_an_error() {
        let ctx = ctx(nuclear_family());
        let request = SearchRequest::new("F", "@I404@", RelationshipFilter::all());
        let err = find_shortest_path(&ctx, &request).unwrap_err();
        assert!(matches!(err, KinpathError::PersonNotFound(_)));
    }

    #[test]
    fn test_father_to_child_distance_one() {
        let ctx = ctx(nuclear_family());
        let request = SearchRequest::new("F", "C1", RelationshipFilter::blood());
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 1);
        assert_eq!(result.path, Some(vec!["F".to_string(), "C1".to_string()]));
        assert_eq!(result.relationship_chain, vec![RelationLabel::FatherOf]);
        assert_eq!(result.description, "Frank is the father of Carl");
    }

    #[test]
    fn test_siblings_direct_with_sibling_kind() {
        let ctx = ctx(nuclear_family());
        let filter = RelationshipFilter::parse("sibling").unwrap();
        let request = SearchRequest::new("C1", "C2", filter);
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 1);
        assert_eq!(result.relationship_chain, vec![RelationLabel::BrotherOf]);
    }

    #[test]
    fn test_siblings_via_parent_without_sibling_kind() {
        let ctx = ctx(nuclear_family());
        let request = SearchRequest::new("C1", "C2", RelationshipFilter::blood());
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 2);
        let path = result.path.unwrap();
        assert_eq!(path.len(), 3);
        assert!(path[1] == "F" || path[1] == "M");
    }

    #[test]
    fn test_filter_monotonicity() {
        let ctx = ctx(nuclear_family());

        let narrow = SearchRequest::new("C1", "C2", RelationshipFilter::blood());
        let narrow_distance = find_shortest_path(&ctx, &narrow).unwrap().distance;

        let mut wide_filter = RelationshipFilter::blood();
        wide_filter.insert(RelationshipKind::Sibling);
        let wide = SearchRequest::new("C1", "C2", wide_filter);
        let wide_distance = find_shortest_path(&ctx, &wide).unwrap().distance;

        assert!(wide_distance <= narrow_distance);
        assert_eq!(narrow_distance, 2);
        assert_eq!(wide_distance, 1);
    }

    #[test]
    fn test_empty_filter_finds_nothing() {
        let ctx = ctx(nuclear_family());
        let request = SearchRequest::new("F", "C1", RelationshipFilter::new());
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, -1);
        assert!(result.path.is_none());
        assert!(result.relationship_chain.is_empty());
    }

    #[test]
    fn test_disjoint_trees_find_nothing() {
        let mut provider = nuclear_family();
        provider.link_parent_child("X", "Y");
        let ctx = ctx(provider);
        let filter = RelationshipFilter::parse("parent,spouse,child").unwrap();
        let request = SearchRequest::new("F", "Y", filter);
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, -1);
        assert!(result.path.is_none());
        assert!(result.description.contains("No relationship path found"));
    }

    #[test]
    fn test_no_duplicate_nodes_in_found_paths() {
        // Dense little graph with several equal-length routes
        let mut provider = MemoryProvider::new();
        for gp in ["G1", "G2"] {
            provider.link_parent_child(gp, "P1");
            provider.link_parent_child(gp, "P2");
        }
        provider.link_parent_child("P1", "K1");
        provider.link_parent_child("P2", "K2");
        provider.link_spouses("P1", "P2");
        let ctx = ctx(provider);
        let request = SearchRequest::new("K1", "K2", RelationshipFilter::all());
        let result = find_shortest_path(&ctx, &request).unwrap();
        let path = result.path.unwrap();
        let unique: std::collections::HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }

    #[test]
    fn test_max_distance_bounds_the_search() {
        let mut provider = MemoryProvider::new();
        for pair in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "G")] {
            provider.link_parent_child(pair.0, pair.1);
        }
        let ctx = ctx(provider);

        let mut request = SearchRequest::new("A", "G", RelationshipFilter::blood());
        request.max_distance = 2;
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, -1);

        request.max_distance = 30;
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 5);
    }

    #[test]
    fn test_zero_max_distance_normalized_to_default() {
        let ctx = ctx(nuclear_family());
        let mut request = SearchRequest::new("F", "C1", RelationshipFilter::blood());
        request.max_distance = 0;
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 1);
    }

    /// A and B are married but also connected through A's sibling S, who is
    /// married to B's sibling T (distance 3: A - S - T - B).
    fn spouses_with_sibling_route() -> MemoryProvider {
        let mut provider = MemoryProvider::new();
        provider.link_spouses("A", "B");
        provider.link_parent_child("PA", "A");
        provider.link_parent_child("PA", "S");
        provider.link_parent_child("PB", "B");
        provider.link_parent_child("PB", "T");
        provider.link_spouses("S", "T");
        provider
    }

    #[test]
    fn test_min_distance_with_exclusion_skips_spousal_edge() {
        let ctx = ctx(spouses_with_sibling_route());
        let mut request = SearchRequest::new("A", "B", RelationshipFilter::all());
        request.exclude_initial_spouse_children = true;
        request.min_distance = 2;
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 3);
        assert_eq!(
            result.path,
            Some(vec![
                "A".to_string(),
                "S".to_string(),
                "T".to_string(),
                "B".to_string()
            ])
        );
    }

    #[test]
    fn test_min_distance_fallback_when_unmet() {
        // Only the direct spousal edge exists; min_distance cannot be met
        let mut provider = MemoryProvider::new();
        provider.link_spouses("A", "B");
        let ctx = ctx(provider);
        let mut request = SearchRequest::new("A", "B", RelationshipFilter::all());
        request.min_distance = 2;
        let result = find_shortest_path(&ctx, &request).unwrap();
        // Silent fallback to the unconstrained shortest path
        assert_eq!(result.distance, 1);
    }

    #[test]
    fn test_strict_min_distance_reports_no_path() {
        let mut provider = MemoryProvider::new();
        provider.link_spouses("A", "B");
        let ctx = ctx(provider);
        let mut request = SearchRequest::new("A", "B", RelationshipFilter::all());
        request.min_distance = 2;
        request.strict_min_distance = true;
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, -1);
        assert!(result.path.is_none());
        assert!(result.description.contains("minimum distance 2"));
    }

    #[test]
    fn test_detailed_path_matches_hops() {
        let ctx = ctx(nuclear_family());
        let filter = RelationshipFilter::parse("default").unwrap();
        let request = SearchRequest::new("C1", "M", filter);
        let result = find_shortest_path(&ctx, &request).unwrap();
        assert_eq!(result.distance, 1);
        assert_eq!(result.detailed_path, vec!["Carl -> son of -> Maria"]);
    }

    #[test]
    fn test_search_result_serializes() {
        let ctx = ctx(nuclear_family());
        let request = SearchRequest::new("F", "C1", RelationshipFilter::blood());
        let result = find_shortest_path(&ctx, &request).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["distance"], 1);
        assert_eq!(json["relationship_chain"][0], "father_of");
    }
}
