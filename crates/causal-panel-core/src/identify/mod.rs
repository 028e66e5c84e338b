//! Identification engine.
//!
//! Given the declared graph and a treatment/outcome pair, decides which
//! identification strategies (backdoor adjustment, frontdoor adjustment,
//! instrumental variable) yield a valid estimand. Pure function of the
//! graph and the two names.
//!
//! When strict backdoor identification fails (typically because of a latent
//! confounder), the engine retries the same criteria on the latent-pruned
//! subgraph and marks the estimand `assumption_weakened` instead of failing
//! outright. The candidate adjustment set is never invented: it is always
//! the observed non-descendants of treatment that are ancestors of
//! treatment or outcome.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::IdentifyError;
use crate::graph::{
    backdoor_paths, d_separated, directed_paths, path_blocked, CausalGraph, NodeId,
};

/// An identification strategy the engine can certify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Backdoor,
    Frontdoor,
    InstrumentalVariable,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Backdoor => write!(f, "backdoor"),
            Strategy::Frontdoor => write!(f, "frontdoor"),
            Strategy::InstrumentalVariable => write!(f, "instrumental variable"),
        }
    }
}

/// The identification result for one treatment/outcome pair.
#[derive(Debug, Clone)]
pub struct IdentifiedEstimand {
    pub treatment: String,
    pub outcome: String,
    /// Valid backdoor adjustment set (variable names, sorted), if any.
    pub backdoor: Option<Vec<String>>,
    /// Valid frontdoor mediator set, if any.
    pub frontdoor: Option<Vec<String>>,
    /// Valid instruments, sorted.
    pub instruments: Vec<String>,
    /// True when backdoor validity holds only on the latent-pruned graph.
    pub assumption_weakened: bool,
}

impl IdentifiedEstimand {
    /// Strategies that apply, in reporting order.
    pub fn strategies(&self) -> Vec<Strategy> {
        let mut out = Vec::new();
        if self.backdoor.is_some() {
            out.push(Strategy::Backdoor);
        }
        if self.frontdoor.is_some() {
            out.push(Strategy::Frontdoor);
        }
        if !self.instruments.is_empty() {
            out.push(Strategy::InstrumentalVariable);
        }
        out
    }

    pub fn is_identified(&self) -> bool {
        !self.strategies().is_empty()
    }

    /// The backdoor adjustment set, or the reportable unidentifiable error.
    pub fn require_backdoor(&self) -> Result<&[String], IdentifyError> {
        self.backdoor
            .as_deref()
            .ok_or_else(|| IdentifyError::Unidentifiable {
                treatment: self.treatment.clone(),
                outcome: self.outcome.clone(),
            })
    }
}

/// Determine which identification strategies apply for `treatment` on
/// `outcome` in `graph`.
pub fn identify(
    graph: &CausalGraph,
    treatment: &str,
    outcome: &str,
) -> Result<IdentifiedEstimand, IdentifyError> {
    let t = resolve(graph, treatment)?;
    let y = resolve(graph, outcome)?;
    if t == y {
        return Err(IdentifyError::SameVariable {
            name: treatment.to_string(),
        });
    }

    let mut assumption_weakened = false;
    let mut backdoor = backdoor_adjustment(graph, t, y);
    if backdoor.is_none() {
        let pruned = graph.latent_pruned();
        backdoor = backdoor_adjustment(&pruned, t, y);
        if backdoor.is_some() {
            debug!(
                treatment,
                outcome, "strict backdoor criterion failed; accepting latent-pruned adjustment"
            );
            assumption_weakened = true;
        }
    }

    let estimand = IdentifiedEstimand {
        treatment: treatment.to_string(),
        outcome: outcome.to_string(),
        backdoor: backdoor.map(|set| names(graph, set)),
        frontdoor: frontdoor_mediators(graph, t, y).map(|set| names(graph, set)),
        instruments: names(graph, instruments(graph, t, y)),
        assumption_weakened,
    };
    debug!(
        treatment,
        outcome,
        strategies = ?estimand.strategies(),
        weakened = estimand.assumption_weakened,
        "identification complete"
    );
    Ok(estimand)
}

fn resolve(graph: &CausalGraph, name: &str) -> Result<NodeId, IdentifyError> {
    graph
        .node_id(name)
        .ok_or_else(|| IdentifyError::UnknownVariable {
            name: name.to_string(),
            known: graph.known_variables(),
        })
}

fn names(graph: &CausalGraph, ids: Vec<NodeId>) -> Vec<String> {
    let mut out: Vec<String> = ids.iter().map(|&id| graph.name(id).to_string()).collect();
    out.sort();
    out
}

/// Backdoor criterion with the default candidate set: every observed
/// non-descendant of treatment that is an ancestor of treatment or outcome.
/// Valid when the set blocks every backdoor path.
fn backdoor_adjustment(graph: &CausalGraph, t: NodeId, y: NodeId) -> Option<Vec<NodeId>> {
    let t_descendants = graph.descendants(t);
    let t_ancestors = graph.ancestors(t);
    let y_ancestors = graph.ancestors(y);

    let set: Vec<NodeId> = graph
        .observed_nodes()
        .into_iter()
        .filter(|&v| v != t && v != y)
        .filter(|v| !t_descendants.contains(v))
        .filter(|v| t_ancestors.contains(v) || y_ancestors.contains(v))
        .collect();

    let given: HashSet<NodeId> = set.iter().copied().collect();
    let blocked = backdoor_paths(graph, t, y)
        .iter()
        .all(|path| path_blocked(graph, path, &given));
    blocked.then_some(set)
}

/// Frontdoor criterion: a smallest observed mediator set that intercepts
/// every directed treatment-to-outcome path, has no open backdoor from the
/// treatment, and whose own backdoor paths to the outcome are blocked by
/// the treatment.
fn frontdoor_mediators(graph: &CausalGraph, t: NodeId, y: NodeId) -> Option<Vec<NodeId>> {
    let forward = directed_paths(graph, t, y);
    if forward.is_empty() {
        return None;
    }

    let mut candidates: Vec<NodeId> = forward
        .iter()
        .flat_map(|path| path[1..path.len() - 1].iter().copied())
        .filter(|&v| graph.is_observed(v))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    candidates.sort_unstable();

    for size in 1..=candidates.len() {
        for set in combinations(&candidates, size) {
            if frontdoor_valid(graph, t, y, &set, &forward) {
                return Some(set);
            }
        }
    }
    None
}

fn frontdoor_valid(
    graph: &CausalGraph,
    t: NodeId,
    y: NodeId,
    mediators: &[NodeId],
    forward: &[Vec<NodeId>],
) -> bool {
    let set: HashSet<NodeId> = mediators.iter().copied().collect();

    let intercepts = forward
        .iter()
        .all(|path| path[1..path.len() - 1].iter().any(|v| set.contains(v)));

    let empty = HashSet::new();
    let unconfounded_with_treatment = mediators.iter().all(|&m| {
        backdoor_paths(graph, t, m)
            .iter()
            .all(|path| path_blocked(graph, path, &empty))
    });

    let treatment_only: HashSet<NodeId> = HashSet::from([t]);
    let outcome_paths_blocked = mediators.iter().all(|&m| {
        backdoor_paths(graph, m, y)
            .iter()
            .all(|path| path_blocked(graph, path, &treatment_only))
    });

    intercepts && unconfounded_with_treatment && outcome_paths_blocked
}

/// Instrument search: an observed node with a directed path into the
/// treatment that is separated from the outcome once the treatment's
/// outgoing edges are removed (exclusion plus no shared confounding).
fn instruments(graph: &CausalGraph, t: NodeId, y: NodeId) -> Vec<NodeId> {
    let cut = graph.without_outgoing_edges(t);
    let empty = HashSet::new();
    graph
        .observed_nodes()
        .into_iter()
        .filter(|&i| i != t && i != y)
        .filter(|&i| graph.descendants(i).contains(&t))
        .filter(|&i| d_separated(&cut, i, y, &empty))
        .collect()
}

fn combinations(items: &[NodeId], size: usize) -> Vec<Vec<NodeId>> {
    if size == 0 {
        return vec![vec![]];
    }
    if items.len() < size {
        return vec![];
    }
    let mut out = Vec::new();
    for (idx, &item) in items.iter().enumerate() {
        for mut rest in combinations(&items[idx + 1..], size - 1) {
            rest.insert(0, item);
            out.push(rest);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{spending_graph, GraphBuilder};
    use crate::variables::{POST_SPENDS, PRE_SPENDS, SIGNUP_MONTH, TREATMENT};

    #[test]
    fn test_spending_graph_backdoor_set() {
        let graph = spending_graph();
        let estimand = identify(&graph, TREATMENT, POST_SPENDS).unwrap();
        assert_eq!(
            estimand.backdoor.as_deref(),
            Some(&["pre_spends".to_string(), "signup_month".to_string()][..])
        );
        assert!(!estimand.assumption_weakened);
    }

    #[test]
    fn test_spending_graph_has_no_frontdoor() {
        let graph = spending_graph();
        let estimand = identify(&graph, TREATMENT, POST_SPENDS).unwrap();
        assert!(estimand.frontdoor.is_none());
    }

    #[test]
    fn test_spending_graph_instrument_is_pre_spends() {
        // pre_spends drives treatment and touches post_spends only through
        // it; signup_month has a direct edge to the outcome and must not
        // qualify.
        let graph = spending_graph();
        let estimand = identify(&graph, TREATMENT, POST_SPENDS).unwrap();
        assert_eq!(estimand.instruments, vec![PRE_SPENDS.to_string()]);
    }

    #[test]
    fn test_signup_month_as_treatment_is_identified() {
        let graph = spending_graph();
        let estimand = identify(&graph, SIGNUP_MONTH, POST_SPENDS).unwrap();
        assert!(estimand.backdoor.is_some());
    }

    #[test]
    fn test_unknown_variable_is_reported_with_known_set() {
        let graph = spending_graph();
        let err = identify(&graph, "spend", POST_SPENDS).unwrap_err();
        match err {
            IdentifyError::UnknownVariable { name, known } => {
                assert_eq!(name, "spend");
                assert!(known.contains("post_spends"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_variable_rejected() {
        let graph = spending_graph();
        let err = identify(&graph, TREATMENT, TREATMENT).unwrap_err();
        assert!(matches!(err, IdentifyError::SameVariable { .. }));
    }

    #[test]
    fn test_latent_confounding_weakens_backdoor() {
        // t <- u -> y with latent u: strictly unidentifiable, permissively
        // identified with an empty adjustment set.
        let graph = GraphBuilder::new()
            .node("t")
            .node("y")
            .latent("u")
            .edge("u", "t")
            .edge("u", "y")
            .edge("t", "y")
            .build()
            .unwrap();
        let estimand = identify(&graph, "t", "y").unwrap();
        assert_eq!(estimand.backdoor.as_deref(), Some(&[][..]));
        assert!(estimand.assumption_weakened);
    }

    #[test]
    fn test_frontdoor_mediator_found_under_latent_confounding() {
        // Classic frontdoor shape: t -> m -> y, latent u -> t and u -> y.
        let graph = GraphBuilder::new()
            .node("t")
            .node("m")
            .node("y")
            .latent("u")
            .edge("t", "m")
            .edge("m", "y")
            .edge("u", "t")
            .edge("u", "y")
            .build()
            .unwrap();
        let estimand = identify(&graph, "t", "y").unwrap();
        assert_eq!(estimand.frontdoor.as_deref(), Some(&["m".to_string()][..]));
        assert!(estimand.instruments.is_empty());
    }

    #[test]
    fn test_instrument_found_under_latent_confounding() {
        // i -> t -> y, latent u -> t and u -> y: i is a valid instrument.
        let graph = GraphBuilder::new()
            .node("i")
            .node("t")
            .node("y")
            .latent("u")
            .edge("i", "t")
            .edge("t", "y")
            .edge("u", "t")
            .edge("u", "y")
            .build()
            .unwrap();
        let estimand = identify(&graph, "t", "y").unwrap();
        assert_eq!(estimand.instruments, vec!["i".to_string()]);
    }

    #[test]
    fn test_direct_cause_of_outcome_is_not_an_instrument() {
        // i -> t, i -> y: exclusion fails.
        let graph = GraphBuilder::new()
            .node("i")
            .node("t")
            .node("y")
            .edge("i", "t")
            .edge("i", "y")
            .edge("t", "y")
            .build()
            .unwrap();
        let estimand = identify(&graph, "t", "y").unwrap();
        assert!(estimand.instruments.is_empty());
    }

    #[test]
    fn test_require_backdoor_reports_unidentifiable() {
        let estimand = IdentifiedEstimand {
            treatment: "t".into(),
            outcome: "y".into(),
            backdoor: None,
            frontdoor: None,
            instruments: vec![],
            assumption_weakened: false,
        };
        let err = estimand.require_backdoor().unwrap_err();
        assert!(matches!(err, IdentifyError::Unidentifiable { .. }));
    }
}
