//! Error types for causal-panel-core.

use thiserror::Error;

/// Errors raised while declaring a causal graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate node: {name}")]
    DuplicateNode { name: String },

    #[error("Self-loop on node: {name}")]
    SelfLoop { name: String },

    #[error("Edge references undeclared node: {name}")]
    UndeclaredNode { name: String },
}

/// Errors raised by the identification engine.
///
/// `Unidentifiable` is a reportable outcome, not a crash: the tool boundary
/// formats it into a caller-visible string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifyError {
    #[error("Variable {name} is not a node of the causal graph (known variables: {known})")]
    UnknownVariable { name: String, known: String },

    #[error("Treatment and outcome must be distinct variables, got {name} twice")]
    SameVariable { name: String },

    #[error("No identifiable causal effect for {treatment} -> {outcome}")]
    Unidentifiable { treatment: String, outcome: String },
}

/// Per-method estimator failure. Recovered by the estimation dispatcher,
/// which advances to the next candidate method.
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("not applicable: {reason}")]
    NotApplicable { reason: String },
}

impl EstimatorError {
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self::NotApplicable {
            reason: reason.into(),
        }
    }
}

/// Error surfaced by the estimation engine once every candidate method
/// has failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("No suitable estimation method found for {treatment} -> {outcome}")]
    NoSuitableMethod { treatment: String, outcome: String },
}

/// Top-level error type for causal-panel-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Identification error: {0}")]
    Identify(#[from] IdentifyError),

    #[error("Estimation error: {0}")]
    Estimate(#[from] EstimateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::UndeclaredNode {
            name: "spend".into(),
        };
        assert!(err.to_string().contains("undeclared node"));
        assert!(err.to_string().contains("spend"));
    }

    #[test]
    fn test_unknown_variable_lists_known_names() {
        let err = IdentifyError::UnknownVariable {
            name: "foo".into(),
            known: "treatment, post_spends".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("foo"));
        assert!(msg.contains("post_spends"));
    }

    #[test]
    fn test_no_suitable_method_names_the_pair() {
        let err = EstimateError::NoSuitableMethod {
            treatment: "treatment".into(),
            outcome: "post_spends".into(),
        };
        assert!(err.to_string().contains("treatment -> post_spends"));
    }
}
