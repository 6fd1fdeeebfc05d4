//! Exhaustive path enumeration: all simple paths between two people, and
//! all parent-only paths up to a fixed ancestor.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::context::GraphContext;
use crate::error::{KinpathError, Result};
use crate::model::{PersonId, RelationLabel, RelationshipFilter, RelationshipKind};
use crate::search::describe::{describe_path, relationship_chain};
use crate::search::neighbors::neighbors;

/// Applied when `max_distance` is zero in [`find_all_paths`].
pub const DEFAULT_ALL_PATHS_DEPTH: u32 = 15;
/// Applied when `max_paths` is zero.
pub const DEFAULT_MAX_PATHS: usize = 10;

/// One enumerated path between two people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMatch {
    pub path: Vec<PersonId>,
    pub distance: u32,
    pub relationship_chain: Vec<RelationLabel>,
    pub description: String,
}

/// Enumerate simple paths from `start` to `end`, shortest first.
///
/// Depth-first search that never revisits a node already on the current
/// path, bounded by `max_distance` hops and `max_paths` collected paths.
/// Results are sorted by distance and filtered for redundancy: a path is
/// dropped when a kept shorter-or-equal path's node set is a subset of its
/// node set (a detour re-discovering an already-reported relation). The
/// filter is deliberately conservative and catches only strict node-set
/// supersets.
pub fn find_all_paths(
    ctx: &GraphContext,
    start: &str,
    end: &str,
    filter: &RelationshipFilter,
    max_distance: u32,
    max_paths: usize,
) -> Result<Vec<PathMatch>> {
    if ctx.relationships(start).is_none() {
        return Err(KinpathError::PersonNotFound(start.to_string()));
    }
    if ctx.relationships(end).is_none() {
        return Err(KinpathError::PersonNotFound(end.to_string()));
    }

    if start == end {
        return Ok(vec![PathMatch {
            path: vec![start.to_string()],
            distance: 0,
            relationship_chain: Vec::new(),
            description: "Same person".to_string(),
        }]);
    }

    let max_depth = if max_distance < 1 {
        DEFAULT_ALL_PATHS_DEPTH as usize
    } else {
        max_distance as usize
    };
    let max_paths = if max_paths < 1 {
        DEFAULT_MAX_PATHS
    } else {
        max_paths
    };

    let mut found: Vec<Vec<PersonId>> = Vec::new();
    let mut stack: Vec<(PersonId, Vec<PersonId>)> =
        vec![(start.to_string(), vec![start.to_string()])];

    while let Some((current, path)) = stack.pop() {
        if current == end {
            found.push(path);
            if found.len() >= max_paths {
                break;
            }
            continue;
        }

        // path includes the start node, so its length caps at depth + 1
        if path.len() > max_depth {
            continue;
        }

        for edge in neighbors(ctx, &current, filter, false) {
            if !path.contains(&edge.neighbor) {
                let mut next_path = path.clone();
                next_path.push(edge.neighbor.clone());
                stack.push((edge.neighbor, next_path));
            }
        }
    }

    log::debug!(
        "all paths: {} raw paths from {} to {} within depth {}",
        found.len(),
        start,
        end,
        max_depth
    );

    found.sort_by_key(|p| p.len());
    let mut kept = filter_redundant_paths(found);
    kept.truncate(max_paths);

    Ok(kept
        .into_iter()
        .map(|path| {
            let chain = relationship_chain(ctx, &path, filter);
            let description = describe_path(ctx, &path, &chain);
            PathMatch {
                distance: (path.len() - 1) as u32,
                relationship_chain: chain,
                description,
                path,
            }
        })
        .collect())
}

/// Drop paths that merely add a detour to a shorter kept path.
///
/// `paths` must be sorted shortest first. A path is redundant when some
/// kept earlier path's node set is a subset of its node set; both paths
/// share their endpoints by construction.
fn filter_redundant_paths(paths: Vec<Vec<PersonId>>) -> Vec<Vec<PersonId>> {
    let mut kept: Vec<Vec<PersonId>> = Vec::new();
    let mut kept_sets: Vec<HashSet<PersonId>> = Vec::new();

    for path in paths {
        let node_set: HashSet<PersonId> = path.iter().cloned().collect();
        let redundant = kept_sets.iter().any(|s| s.is_subset(&node_set));
        if !redundant {
            kept.push(path);
            kept_sets.push(node_set);
        }
    }
    kept
}

/// Enumerate every simple parent-only path from `start` up to `ancestor`.
///
/// Follows parent edges exclusively, so each returned path is a line of
/// descent read child-to-ancestor. Multiple paths exist when the ancestor
/// is reached through more than one line (e.g. cousin marriages). Capped at
/// `max_paths` (0 is normalized to [`DEFAULT_MAX_PATHS`]).
pub fn find_ancestor_paths(
    ctx: &GraphContext,
    start: &str,
    ancestor: &str,
    max_paths: usize,
) -> Result<Vec<Vec<PersonId>>> {
    if ctx.relationships(start).is_none() {
        return Err(KinpathError::PersonNotFound(start.to_string()));
    }
    if ctx.relationships(ancestor).is_none() {
        return Err(KinpathError::PersonNotFound(ancestor.to_string()));
    }

    if start == ancestor {
        return Ok(vec![vec![start.to_string()]]);
    }

    let max_paths = if max_paths < 1 {
        DEFAULT_MAX_PATHS
    } else {
        max_paths
    };
    let parent_filter = RelationshipFilter::from_kinds([RelationshipKind::Parent]);

    let mut found: Vec<Vec<PersonId>> = Vec::new();
    let mut path = vec![start.to_string()];
    let mut visited: HashSet<PersonId> = HashSet::new();
    visited.insert(start.to_string());

    ancestor_dfs(
        ctx,
        start,
        ancestor,
        &parent_filter,
        max_paths,
        &mut path,
        &mut visited,
        &mut found,
    );

    Ok(found)
}

#[allow(clippy::too_many_arguments)]
fn ancestor_dfs(
    ctx: &GraphContext,
    current: &str,
    ancestor: &str,
    parent_filter: &RelationshipFilter,
    max_paths: usize,
    path: &mut Vec<PersonId>,
    visited: &mut HashSet<PersonId>,
    found: &mut Vec<Vec<PersonId>>,
) {
    if found.len() >= max_paths {
        return;
    }

    if current == ancestor {
        found.push(path.clone());
        return;
    }

    for edge in neighbors(ctx, current, parent_filter, false) {
        if !visited.contains(&edge.neighbor) {
            visited.insert(edge.neighbor.clone());
            path.push(edge.neighbor.clone());
            ancestor_dfs(
                ctx,
                &edge.neighbor,
                ancestor,
                parent_filter,
                max_paths,
                path,
                visited,
                found,
            );
            path.pop();
            visited.remove(&edge.neighbor);
        }
    }
}
