//! Bounded BFS reachability probe.
//!
//! Runs before the weighted bidirectional search to cheaply reject pairs in
//! different components. Also public: callers who need to distinguish
//! "genuinely disconnected" from "too expensive to prove connected" consult
//! the tri-state result directly (budget exhaustion in the main search is
//! reported as an ordinary no-path result).

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::context::GraphContext;
use crate::model::RelationshipFilter;
use crate::search::neighbors::neighbors;

/// Outcome of a bounded reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    Connected,
    Disconnected,
    /// Node budget exhausted before the frontier emptied; nothing proven.
    Unknown,
}

/// Unweighted BFS from `start` toward `end`, visiting at most `node_budget`
/// nodes. Distance bounds and endpoint exclusion flags do not apply here.
pub fn is_reachable(
    ctx: &GraphContext,
    start: &str,
    end: &str,
    filter: &RelationshipFilter,
    node_budget: usize,
) -> Reachability {
    if start == end {
        return Reachability::Connected;
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    visited.insert(start.to_string());
    queue.push_back(start.to_string());
    let mut nodes_visited = 0usize;

    while let Some(current) = queue.pop_front() {
        if nodes_visited >= node_budget {
            queue.push_front(current);
            break;
        }
        nodes_visited += 1;

        if current == end {
            log::debug!(
                "connectivity probe: reached {} after visiting {} nodes",
                end,
                nodes_visited
            );
            return Reachability::Connected;
        }

        for edge in neighbors(ctx, &current, filter, false) {
            if !visited.contains(&edge.neighbor) {
                visited.insert(edge.neighbor.clone());
                queue.push_back(edge.neighbor);
            }
        }
    }

    // Budget exhaustion means the component may extend past what we saw,
    // even if the target already sits in the unexpanded frontier.
    if nodes_visited >= node_budget {
        log::debug!(
            "connectivity probe: budget of {} nodes exhausted, inconclusive",
            node_budget
        );
        return Reachability::Unknown;
    }

    if visited.contains(end) {
        Reachability::Connected
    } else {
        Reachability::Disconnected
    }
}
