//! Lazy neighbor resolution over the implicit relationship graph.
//!
//! There is no materialized adjacency structure anywhere in the crate:
//! edges are computed on demand from a person's relationship record and
//! memoized in the session's neighbor cache.

use std::collections::BTreeSet;

use crate::cache::NeighborCacheKey;
use crate::context::GraphContext;
use crate::model::{Edge, Gender, RelationshipFilter, RelationshipKind};

/// Resolve the traversable edges of `person` under `filter`.
///
/// Parent edges are gender-conditioned: a parent is included for the
/// `parent` kind unconditionally, for `mother` only when the parent is
/// recorded female, and for `father` only when recorded male, with the edge
/// labeled by the kind that admitted it. `exclude_spouse_children` drops the
/// spouse and child edges entirely; the search engine sets it only when
/// expanding the original endpoints. Siblings are derived as the union of
/// each parent's children minus the person, sorted for determinism.
///
/// An id the provider cannot resolve yields an empty edge list (callers
/// validate endpoint existence before searching). Results, including empty
/// ones, are memoized under the full (person, kinds, flag) key.
pub fn neighbors(
    ctx: &GraphContext,
    person: &str,
    filter: &RelationshipFilter,
    exclude_spouse_children: bool,
) -> Vec<Edge> {
    let key = NeighborCacheKey {
        person: person.to_string(),
        kinds: filter.sorted_kinds(),
        exclude_spouse_children,
    };

    if let Some(hit) = ctx.neighbor_cache().get(&key) {
        return hit;
    }

    let relationships = match ctx.relationships(person) {
        Some(r) => r,
        None => {
            ctx.neighbor_cache().put(key, Vec::new());
            return Vec::new();
        }
    };

    let mut edges = Vec::new();

    if filter.wants_parents() {
        for parent_id in &relationships.parents {
            let parent_gender = ctx.relationships(parent_id).and_then(|r| r.gender);
            let kind = if filter.contains(RelationshipKind::Parent) {
                Some(RelationshipKind::Parent)
            } else if filter.contains(RelationshipKind::Mother)
                && parent_gender == Some(Gender::Female)
            {
                Some(RelationshipKind::Mother)
            } else if filter.contains(RelationshipKind::Father)
                && parent_gender == Some(Gender::Male)
            {
                Some(RelationshipKind::Father)
            } else {
                None
            };
            if let Some(kind) = kind {
                edges.push(Edge::new(parent_id.clone(), kind));
            }
        }
    }

    if filter.contains(RelationshipKind::Child) && !exclude_spouse_children {
        for child_id in &relationships.children {
            edges.push(Edge::new(child_id.clone(), RelationshipKind::Child));
        }
    }

    if filter.contains(RelationshipKind::Spouse) && !exclude_spouse_children {
        for spouse_id in &relationships.spouses {
            edges.push(Edge::new(spouse_id.clone(), RelationshipKind::Spouse));
        }
    }

    if filter.contains(RelationshipKind::Sibling) {
        let mut siblings = BTreeSet::new();
        for parent_id in &relationships.parents {
            if let Some(parent_relationships) = ctx.relationships(parent_id) {
                for child_id in &parent_relationships.children {
                    if child_id != person {
                        siblings.insert(child_id.clone());
                    }
                }
            }
        }
        for sibling_id in siblings {
            edges.push(Edge::new(sibling_id, RelationshipKind::Sibling));
        }
    }

    ctx.neighbor_cache().put(key, edges.clone());
    edges
}
