//! Directed-graph value type for causal models.

use std::collections::HashSet;

use crate::error::GraphError;

/// Node handle: index into the graph's node table.
pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    observed: bool,
}

/// An immutable directed graph over named variables.
///
/// Latent nodes participate in path analysis but are excluded from
/// adjustment-set candidates and instrument candidates.
#[derive(Debug, Clone)]
pub struct CausalGraph {
    nodes: Vec<Node>,
    parents: Vec<Vec<NodeId>>,
    children: Vec<Vec<NodeId>>,
    neighbors: Vec<Vec<NodeId>>,
}

impl CausalGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve a variable name to its node handle.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id].name
    }

    pub fn is_observed(&self, id: NodeId) -> bool {
        self.nodes[id].observed
    }

    /// All node names, in declaration order, joined for error messages.
    pub fn known_variables(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn observed_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).filter(|&i| self.nodes[i].observed).collect()
    }

    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        &self.parents[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id]
    }

    /// Undirected adjacency, used by path enumeration.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.neighbors[id]
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.children[from].contains(&to)
    }

    /// Every node reachable by following edges backwards, excluding `id`.
    /// Iterative BFS, no recursion.
    pub fn ancestors(&self, id: NodeId) -> HashSet<NodeId> {
        self.reach(id, |n| &self.parents[n])
    }

    /// Every node reachable by following edges forwards, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> HashSet<NodeId> {
        self.reach(id, |n| &self.children[n])
    }

    fn reach<'a, F>(&'a self, start: NodeId, step: F) -> HashSet<NodeId>
    where
        F: Fn(NodeId) -> &'a [NodeId],
    {
        let mut seen = HashSet::new();
        let mut frontier = vec![start];
        while let Some(node) = frontier.pop() {
            for &next in step(node) {
                if seen.insert(next) {
                    frontier.push(next);
                }
            }
        }
        seen.remove(&start);
        seen
    }

    /// A copy of the graph keeping only edges accepted by `keep`.
    ///
    /// Node handles are preserved, so path results translate directly.
    pub fn retain_edges<F>(&self, keep: F) -> CausalGraph
    where
        F: Fn(NodeId, NodeId) -> bool,
    {
        let n = self.nodes.len();
        let mut parents = vec![Vec::new(); n];
        let mut children = vec![Vec::new(); n];
        let mut neighbors = vec![Vec::new(); n];
        for from in 0..n {
            for &to in &self.children[from] {
                if keep(from, to) {
                    children[from].push(to);
                    parents[to].push(from);
                    neighbors[from].push(to);
                    neighbors[to].push(from);
                }
            }
        }
        CausalGraph {
            nodes: self.nodes.clone(),
            parents,
            children,
            neighbors,
        }
    }

    /// The permissive-identification view: latent nodes become isolated, so
    /// every path running through an unobserved variable disappears.
    pub fn latent_pruned(&self) -> CausalGraph {
        self.retain_edges(|from, to| self.nodes[from].observed && self.nodes[to].observed)
    }

    /// The instrument-test view: treatment's outgoing edges removed.
    pub fn without_outgoing_edges(&self, id: NodeId) -> CausalGraph {
        self.retain_edges(|from, _| from != id)
    }
}

/// Builder for [`CausalGraph`]. Edges may name nodes declared later;
/// resolution and validation happen in [`GraphBuilder::build`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<(String, String)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an observed variable.
    #[must_use]
    pub fn node(mut self, name: &str) -> Self {
        self.nodes.push(Node {
            name: name.to_string(),
            observed: true,
        });
        self
    }

    /// Declare a latent (unobserved) variable.
    #[must_use]
    pub fn latent(mut self, name: &str) -> Self {
        self.nodes.push(Node {
            name: name.to_string(),
            observed: false,
        });
        self
    }

    /// Declare a directed edge `from -> to`.
    #[must_use]
    pub fn edge(mut self, from: &str, to: &str) -> Self {
        self.edges.push((from.to_string(), to.to_string()));
        self
    }

    /// Validate the declaration and produce the immutable graph.
    pub fn build(self) -> Result<CausalGraph, GraphError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(GraphError::DuplicateNode {
                    name: node.name.clone(),
                });
            }
        }

        let n = self.nodes.len();
        let index = |name: &str| self.nodes.iter().position(|node| node.name == name);

        let mut parents = vec![Vec::new(); n];
        let mut children: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        let mut neighbors = vec![Vec::new(); n];

        for (from_name, to_name) in &self.edges {
            let from = index(from_name).ok_or_else(|| GraphError::UndeclaredNode {
                name: from_name.clone(),
            })?;
            let to = index(to_name).ok_or_else(|| GraphError::UndeclaredNode {
                name: to_name.clone(),
            })?;
            if from == to {
                return Err(GraphError::SelfLoop {
                    name: from_name.clone(),
                });
            }
            if children[from].contains(&to) {
                continue;
            }
            children[from].push(to);
            parents[to].push(from);
            neighbors[from].push(to);
            neighbors[to].push(from);
        }

        Ok(CausalGraph {
            nodes: self.nodes,
            parents,
            children,
            neighbors,
        })
    }
}
