//! Path enumeration and separation rules.
//!
//! Paths are simple node sequences over the undirected skeleton; edge
//! directions are recovered from the graph when a rule needs them. The
//! graphs here are small declared models, so explicit enumeration is the
//! clearest correct approach.

use std::collections::HashSet;

use super::model::{CausalGraph, NodeId};

/// Enumerate every simple path between `from` and `to` over the undirected
/// skeleton. Iterative DFS with an explicit stack, no recursion.
pub fn all_paths(graph: &CausalGraph, from: NodeId, to: NodeId) -> Vec<Vec<NodeId>> {
    let mut paths = Vec::new();
    if from == to || from >= graph.node_count() || to >= graph.node_count() {
        return paths;
    }

    // Each frame holds a node and the count of neighbors already tried.
    let mut stack: Vec<(NodeId, usize)> = vec![(from, 0)];
    let mut on_path: HashSet<NodeId> = HashSet::new();
    on_path.insert(from);

    while let Some(frame) = stack.last_mut() {
        let (node, cursor) = *frame;
        let neighbors = graph.neighbors(node);

        if cursor >= neighbors.len() {
            stack.pop();
            on_path.remove(&node);
            continue;
        }
        frame.1 += 1;

        let next = neighbors[cursor];
        if next == to {
            let mut path: Vec<NodeId> = stack.iter().map(|&(n, _)| n).collect();
            path.push(to);
            paths.push(path);
            continue;
        }
        if !on_path.contains(&next) {
            on_path.insert(next);
            stack.push((next, 0));
        }
    }

    paths
}

/// Whether a path is blocked by the conditioning set `given`.
///
/// A non-collider on the path blocks when it is in the set; a collider
/// blocks unless it, or one of its descendants, is in the set.
pub fn path_blocked(graph: &CausalGraph, path: &[NodeId], given: &HashSet<NodeId>) -> bool {
    path.windows(3).any(|w| {
        let (prev, mid, next) = (w[0], w[1], w[2]);
        let collider = graph.has_edge(prev, mid) && graph.has_edge(next, mid);
        if collider {
            let opened = given.contains(&mid)
                || graph.descendants(mid).iter().any(|d| given.contains(d));
            !opened
        } else {
            given.contains(&mid)
        }
    })
}

/// d-separation: `x` and `y` are separated given `given` when every path
/// between them is blocked.
pub fn d_separated(graph: &CausalGraph, x: NodeId, y: NodeId, given: &HashSet<NodeId>) -> bool {
    all_paths(graph, x, y)
        .iter()
        .all(|path| path_blocked(graph, path, given))
}

/// Paths from `treatment` to `outcome` that begin with an arrow into the
/// treatment. These are the confounding routes a backdoor set must block.
pub fn backdoor_paths(graph: &CausalGraph, treatment: NodeId, outcome: NodeId) -> Vec<Vec<NodeId>> {
    all_paths(graph, treatment, outcome)
        .into_iter()
        .filter(|path| path.len() >= 2 && graph.has_edge(path[1], treatment))
        .collect()
}

/// Paths from `from` to `to` following edge directions only.
pub fn directed_paths(graph: &CausalGraph, from: NodeId, to: NodeId) -> Vec<Vec<NodeId>> {
    all_paths(graph, from, to)
        .into_iter()
        .filter(|path| path.windows(2).all(|w| graph.has_edge(w[0], w[1])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn ids(graph: &CausalGraph, names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| graph.node_id(n).unwrap()).collect()
    }

    #[test]
    fn test_chain_blocking() {
        // a -> m -> b: the mediator blocks when conditioned on.
        let g = GraphBuilder::new()
            .node("a")
            .node("m")
            .node("b")
            .edge("a", "m")
            .edge("m", "b")
            .build()
            .unwrap();
        let v = ids(&g, &["a", "m", "b"]);
        let paths = all_paths(&g, v[0], v[2]);
        assert_eq!(paths, vec![vec![v[0], v[1], v[2]]]);

        assert!(!d_separated(&g, v[0], v[2], &HashSet::new()));
        assert!(d_separated(&g, v[0], v[2], &HashSet::from([v[1]])));
    }

    #[test]
    fn test_fork_blocking() {
        // a <- m -> b: the common cause blocks when conditioned on.
        let g = GraphBuilder::new()
            .node("a")
            .node("m")
            .node("b")
            .edge("m", "a")
            .edge("m", "b")
            .build()
            .unwrap();
        let v = ids(&g, &["a", "m", "b"]);
        assert!(!d_separated(&g, v[0], v[2], &HashSet::new()));
        assert!(d_separated(&g, v[0], v[2], &HashSet::from([v[1]])));
    }

    #[test]
    fn test_collider_blocking() {
        // a -> m <- b: blocked by default, opened by conditioning on m.
        let g = GraphBuilder::new()
            .node("a")
            .node("m")
            .node("b")
            .edge("a", "m")
            .edge("b", "m")
            .build()
            .unwrap();
        let v = ids(&g, &["a", "m", "b"]);
        assert!(d_separated(&g, v[0], v[2], &HashSet::new()));
        assert!(!d_separated(&g, v[0], v[2], &HashSet::from([v[1]])));
    }

    #[test]
    fn test_collider_opened_through_descendant() {
        // a -> m <- b, m -> d: conditioning on the collider's descendant
        // opens the path too.
        let g = GraphBuilder::new()
            .node("a")
            .node("m")
            .node("b")
            .node("d")
            .edge("a", "m")
            .edge("b", "m")
            .edge("m", "d")
            .build()
            .unwrap();
        let v = ids(&g, &["a", "m", "b", "d"]);
        assert!(!d_separated(&g, v[0], v[2], &HashSet::from([v[3]])));
    }

    #[test]
    fn test_backdoor_paths_start_with_arrow_into_treatment() {
        // t <- c -> y plus t -> y: only the confounding route is a
        // backdoor path.
        let g = GraphBuilder::new()
            .node("t")
            .node("y")
            .node("c")
            .edge("c", "t")
            .edge("c", "y")
            .edge("t", "y")
            .build()
            .unwrap();
        let v = ids(&g, &["t", "y", "c"]);
        let backdoor = backdoor_paths(&g, v[0], v[1]);
        assert_eq!(backdoor, vec![vec![v[0], v[2], v[1]]]);
    }

    #[test]
    fn test_directed_paths_follow_edges_only() {
        let g = GraphBuilder::new()
            .node("t")
            .node("m")
            .node("y")
            .edge("t", "m")
            .edge("m", "y")
            .edge("y", "t")
            .build()
            .unwrap();
        let v = ids(&g, &["t", "m", "y"]);
        let forward = directed_paths(&g, v[0], v[2]);
        assert!(forward.contains(&vec![v[0], v[1], v[2]]));
        assert!(forward.iter().all(|p| p != &vec![v[0], v[2]]));
    }
}
