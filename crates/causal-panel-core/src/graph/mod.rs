//! Causal graph model and path analysis.
//!
//! The graph is data, not code: a node table plus directed adjacency,
//! immutable after construction. Identification criteria are evaluated
//! against this value type, so they are directly testable on constructed
//! graphs.

mod model;
mod paths;

pub use model::{CausalGraph, GraphBuilder, NodeId};
pub use paths::{all_paths, backdoor_paths, d_separated, directed_paths, path_blocked};

use crate::variables::{CONFOUND, POST_SPENDS, PRE_SPENDS, SIGNUP_MONTH, TREATMENT};

/// The declared graph for the spending panel.
///
/// Program signup (`treatment`) is driven by prior spending, the signup
/// month, and one latent confound `Z` that points only into treatment.
/// Post-period spending responds to treatment and to the signup month.
pub fn spending_graph() -> CausalGraph {
    GraphBuilder::new()
        .node(TREATMENT)
        .node(PRE_SPENDS)
        .node(POST_SPENDS)
        .node(SIGNUP_MONTH)
        .latent(CONFOUND)
        .edge(CONFOUND, TREATMENT)
        .edge(PRE_SPENDS, TREATMENT)
        .edge(TREATMENT, POST_SPENDS)
        .edge(SIGNUP_MONTH, POST_SPENDS)
        .edge(SIGNUP_MONTH, TREATMENT)
        .build()
        .expect("declared spending graph is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spending_graph_shape() {
        let graph = spending_graph();
        assert_eq!(graph.node_count(), 5);

        let t = graph.node_id(TREATMENT).unwrap();
        let z = graph.node_id(CONFOUND).unwrap();
        let post = graph.node_id(POST_SPENDS).unwrap();

        assert!(graph.has_edge(z, t));
        assert!(graph.has_edge(t, post));
        assert!(!graph.has_edge(z, post));
        assert!(!graph.is_observed(z));
        assert!(graph.is_observed(t));
    }

    #[test]
    fn test_confound_points_only_into_treatment() {
        let graph = spending_graph();
        let z = graph.node_id(CONFOUND).unwrap();
        let t = graph.node_id(TREATMENT).unwrap();
        assert_eq!(graph.children(z), &[t]);
        assert!(graph.parents(z).is_empty());
    }
}
