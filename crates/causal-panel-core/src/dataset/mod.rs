//! Synthetic spending panel and its per-cohort aggregate view.

mod cohort;
mod panel;

pub use cohort::{CohortFrame, CohortRow};
pub use panel::{ObservationRow, PanelDataset};
