//! Process-wide immutable state.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::Config;
use crate::dataset::{CohortFrame, PanelDataset};
use crate::error::CoreResult;
use crate::graph::{spending_graph, CausalGraph};
use crate::variables::variable_descriptions;

/// Everything the engines and the tool boundary read: the generated panel,
/// its reference-cohort aggregate, the declared graph, and the variable
/// descriptions. Built once before any tool call is accepted and never
/// mutated afterwards, so it can be shared without locking.
pub struct AppContext {
    pub config: Config,
    pub panel: PanelDataset,
    pub cohort: CohortFrame,
    pub graph: CausalGraph,
    pub descriptions: BTreeMap<&'static str, &'static str>,
}

impl AppContext {
    /// Validate configuration, generate the panel, and derive the cohort
    /// frame.
    pub fn initialize(config: Config) -> CoreResult<Self> {
        config.validate()?;

        let panel = PanelDataset::generate(&config.dataset)?;
        let cohort = CohortFrame::from_panel(&panel, config.dataset.reference_month);
        info!(
            panel_rows = panel.len(),
            cohort_rows = cohort.len(),
            reference_month = config.dataset.reference_month,
            "application context initialized"
        );

        Ok(Self {
            config,
            panel,
            cohort,
            graph: spending_graph(),
            descriptions: variable_descriptions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.dataset.num_users = 100;
        config.dataset.seed = Some(7);
        config
    }

    #[test]
    fn test_initialize_builds_all_state() {
        let context = AppContext::initialize(small_config()).unwrap();
        assert_eq!(context.panel.len(), 100 * 12);
        assert!(!context.cohort.is_empty());
        assert_eq!(context.graph.node_count(), 5);
        assert_eq!(context.descriptions.len(), 5);
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let mut config = small_config();
        config.dataset.reference_month = 0;
        assert!(AppContext::initialize(config).is_err());
    }
}
