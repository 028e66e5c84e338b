//! Per-user aggregate frame for one reference signup cohort.

use std::collections::BTreeMap;

use crate::dataset::PanelDataset;
use crate::variables::{POST_SPENDS, PRE_SPENDS, SIGNUP_MONTH, TREATMENT};

/// One user's pre/post spending summary.
///
/// `pre_spends`/`post_spends` are NaN when the corresponding window is
/// empty (reference month at a panel boundary). Estimators treat missing
/// values as droppable input, not as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRow {
    pub user_id: u32,
    /// Either 0 (never signed up) or the reference month.
    pub signup_month: u32,
    pub treatment: bool,
    /// Mean spend over months strictly before the reference month.
    pub pre_spends: f64,
    /// Mean spend over months strictly after the reference month.
    pub post_spends: f64,
}

/// The cohort-aggregated dataset the estimation engine runs on: one row
/// per user who never signed up or signed up exactly in the reference
/// month.
#[derive(Debug, Clone)]
pub struct CohortFrame {
    rows: Vec<CohortRow>,
    reference_month: u32,
}

impl CohortFrame {
    /// Aggregate the panel for the given reference signup month.
    pub fn from_panel(panel: &PanelDataset, reference_month: u32) -> Self {
        struct Window {
            signup_month: u32,
            treatment: bool,
            pre_sum: f64,
            pre_count: u32,
            post_sum: f64,
            post_count: u32,
        }

        let mut users: BTreeMap<u32, Window> = BTreeMap::new();
        for row in panel.rows() {
            if row.signup_month != 0 && row.signup_month != reference_month {
                continue;
            }
            let window = users.entry(row.user_id).or_insert(Window {
                signup_month: row.signup_month,
                treatment: row.treatment,
                pre_sum: 0.0,
                pre_count: 0,
                post_sum: 0.0,
                post_count: 0,
            });
            if row.month < reference_month {
                window.pre_sum += row.spend;
                window.pre_count += 1;
            } else if row.month > reference_month {
                window.post_sum += row.spend;
                window.post_count += 1;
            }
        }

        let rows = users
            .into_iter()
            .map(|(user_id, w)| CohortRow {
                user_id,
                signup_month: w.signup_month,
                treatment: w.treatment,
                pre_spends: mean_or_nan(w.pre_sum, w.pre_count),
                post_spends: mean_or_nan(w.post_sum, w.post_count),
            })
            .collect();

        Self {
            rows,
            reference_month,
        }
    }

    /// Wrap pre-built rows, e.g. a synthetic frame in tests.
    pub fn from_rows(rows: Vec<CohortRow>, reference_month: u32) -> Self {
        Self {
            rows,
            reference_month,
        }
    }

    pub fn rows(&self) -> &[CohortRow] {
        &self.rows
    }

    pub fn reference_month(&self) -> u32 {
        self.reference_month
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Numeric view of a named variable; `None` for names without a column
    /// in this frame (the latent confound has no data).
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let extract: fn(&CohortRow) -> f64 = match name {
            TREATMENT => |r| {
                if r.treatment {
                    1.0
                } else {
                    0.0
                }
            },
            PRE_SPENDS => |r| r.pre_spends,
            POST_SPENDS => |r| r.post_spends,
            SIGNUP_MONTH => |r| f64::from(r.signup_month),
            _ => return None,
        };
        Some(self.rows.iter().map(extract).collect())
    }
}

fn mean_or_nan(sum: f64, count: u32) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        sum / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ObservationRow;

    fn panel_row(user_id: u32, signup_month: u32, month: u32, spend: f64) -> ObservationRow {
        ObservationRow {
            user_id,
            signup_month,
            month,
            spend,
            treatment: signup_month > 0,
        }
    }

    fn small_panel() -> PanelDataset {
        // User 0 never signs up, user 1 signs up in month 3, user 2 signs
        // up in month 2 and must be excluded from the reference-3 cohort.
        let mut rows = Vec::new();
        for month in 1..=4 {
            rows.push(panel_row(0, 0, month, 10.0 * f64::from(month)));
            rows.push(panel_row(1, 3, month, 100.0 + f64::from(month)));
            rows.push(panel_row(2, 2, month, 7.0));
        }
        PanelDataset::from_rows(rows)
    }

    #[test]
    fn test_cohort_membership_and_windows() {
        let frame = CohortFrame::from_panel(&small_panel(), 3);
        assert_eq!(frame.len(), 2);

        let user0 = &frame.rows()[0];
        assert_eq!(user0.user_id, 0);
        assert!(!user0.treatment);
        // pre: months 1,2 -> (10 + 20) / 2; post: month 4 only.
        assert_eq!(user0.pre_spends, 15.0);
        assert_eq!(user0.post_spends, 40.0);

        let user1 = &frame.rows()[1];
        assert_eq!(user1.user_id, 1);
        assert!(user1.treatment);
        assert_eq!(user1.pre_spends, 101.5);
        assert_eq!(user1.post_spends, 104.0);
    }

    #[test]
    fn test_boundary_reference_month_yields_nan_window() {
        let frame = CohortFrame::from_panel(&small_panel(), 1);
        let user0 = frame.rows().iter().find(|r| r.user_id == 0).unwrap();
        assert!(user0.pre_spends.is_nan());
        assert!(user0.post_spends.is_finite());
    }

    #[test]
    fn test_column_views() {
        let frame = CohortFrame::from_panel(&small_panel(), 3);
        assert_eq!(frame.column(TREATMENT), Some(vec![0.0, 1.0]));
        assert_eq!(frame.column(SIGNUP_MONTH), Some(vec![0.0, 3.0]));
        assert!(frame.column("Z").is_none());
        assert!(frame.column("user_id").is_none());
    }
}
