//! Causal Panel Core Library
//!
//! Answers two questions over a synthetic panel of per-user monthly
//! spending: which identification strategy (backdoor, frontdoor,
//! instrumental variable) can recover the effect of a treatment variable
//! on an outcome variable in the declared causal graph, and, when a
//! backdoor strategy exists, what is the estimated average treatment
//! effect on the treated.
//!
//! # Architecture
//!
//! - [`graph`]: the declared causal graph as a first-class value type,
//!   with path enumeration and separation rules
//! - [`identify`]: the identification engine (pure graph reasoning)
//! - [`estimate`]: the estimation engine: an ordered estimator strategy
//!   list walked by a single dispatcher
//! - [`dataset`]: panel generation and the per-cohort aggregate frame
//! - [`context`]: the process-wide immutable state handed to the tool
//!   boundary
//!
//! # Example
//!
//! ```
//! use causal_panel_core::graph::spending_graph;
//! use causal_panel_core::identify::{identify, Strategy};
//!
//! let graph = spending_graph();
//! let estimand = identify(&graph, "treatment", "post_spends").unwrap();
//! assert!(estimand.strategies().contains(&Strategy::Backdoor));
//! ```

pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod identify;
pub mod variables;

// Re-exports for convenience
pub use self::config::Config;
pub use self::context::AppContext;
pub use self::error::{
    CoreError, CoreResult, EstimateError, EstimatorError, GraphError, IdentifyError,
};
pub use self::estimate::{default_candidates, estimate, CausalEstimate, Estimator, TargetUnits};
pub use self::identify::{identify, IdentifiedEstimand, Strategy};
