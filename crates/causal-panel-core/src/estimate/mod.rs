//! Estimation engine.
//!
//! Candidate estimators are an explicit ordered strategy list behind a
//! common [`Estimator`] trait; one dispatcher walks the list and returns
//! the first finite estimate together with the method that produced it.
//! A method failure is recovered locally by advancing to the next
//! candidate; numerical grumbling from an estimator is logged, never
//! surfaced to the caller.

mod matching;
mod regression;

pub use matching::PropensityScoreMatching;
pub use regression::LinearRegression;

use tracing::{debug, info};

use crate::dataset::CohortFrame;
use crate::error::{EstimateError, EstimatorError};
use crate::identify::IdentifiedEstimand;

/// Population the estimate targets. Every candidate method is attempted
/// with the treatment effect on the treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetUnits {
    Att,
}

/// A point estimate and the method that produced it.
///
/// The method is chosen by fallback, so callers must not assume a specific
/// estimator ran.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalEstimate {
    pub method: &'static str,
    pub value: f64,
    pub treatment: String,
    pub outcome: String,
}

/// A backdoor effect estimator.
pub trait Estimator: Send + Sync {
    /// Stable method identifier reported to callers.
    fn name(&self) -> &'static str;

    /// Produce a point estimate, or explain why this method does not apply.
    fn fit(
        &self,
        frame: &CohortFrame,
        estimand: &IdentifiedEstimand,
        target: TargetUnits,
    ) -> Result<f64, EstimatorError>;
}

/// The default candidate order: matching first, regression as fallback.
pub fn default_candidates() -> Vec<Box<dyn Estimator>> {
    vec![
        Box::new(PropensityScoreMatching),
        Box::new(LinearRegression),
    ]
}

/// Walk the candidate list and return the first finite estimate.
pub fn estimate(
    estimand: &IdentifiedEstimand,
    frame: &CohortFrame,
    candidates: &[Box<dyn Estimator>],
) -> Result<CausalEstimate, EstimateError> {
    for method in candidates {
        match method.fit(frame, estimand, TargetUnits::Att) {
            Ok(value) if value.is_finite() => {
                info!(
                    method = method.name(),
                    value,
                    treatment = %estimand.treatment,
                    outcome = %estimand.outcome,
                    "estimation succeeded"
                );
                return Ok(CausalEstimate {
                    method: method.name(),
                    value,
                    treatment: estimand.treatment.clone(),
                    outcome: estimand.outcome.clone(),
                });
            }
            Ok(value) => {
                debug!(
                    method = method.name(),
                    value, "estimator returned a non-finite value; advancing"
                );
            }
            Err(err) => {
                debug!(
                    method = method.name(),
                    error = %err,
                    "estimator not applicable; advancing"
                );
            }
        }
    }
    Err(EstimateError::NoSuitableMethod {
        treatment: estimand.treatment.clone(),
        outcome: estimand.outcome.clone(),
    })
}

/// Numeric design extracted from the cohort frame for one estimand:
/// treatment and outcome columns plus the adjustment covariates, with
/// incomplete rows dropped.
pub(crate) struct Design {
    pub treatment: Vec<f64>,
    pub outcome: Vec<f64>,
    pub covariates: Vec<Vec<f64>>,
    pub covariate_names: Vec<String>,
}

pub(crate) fn design(
    frame: &CohortFrame,
    estimand: &IdentifiedEstimand,
) -> Result<Design, EstimatorError> {
    let adjustment = estimand.backdoor.as_deref().ok_or_else(|| {
        EstimatorError::not_applicable("estimand carries no backdoor adjustment set")
    })?;

    let fetch = |name: &str| {
        frame.column(name).ok_or_else(|| {
            EstimatorError::not_applicable(format!("column {name} is not in the cohort frame"))
        })
    };

    let treatment = fetch(&estimand.treatment)?;
    let outcome = fetch(&estimand.outcome)?;
    let covariates: Vec<Vec<f64>> = adjustment
        .iter()
        .map(|name| fetch(name))
        .collect::<Result<_, _>>()?;

    // Missing pre/post windows surface as NaN; those rows are simply not
    // usable by a backdoor estimator.
    let complete: Vec<usize> = (0..treatment.len())
        .filter(|&i| {
            treatment[i].is_finite()
                && outcome[i].is_finite()
                && covariates.iter().all(|col| col[i].is_finite())
        })
        .collect();

    if complete.is_empty() {
        return Err(EstimatorError::not_applicable(
            "no complete rows after dropping missing values",
        ));
    }

    let take = |col: &[f64]| complete.iter().map(|&i| col[i]).collect::<Vec<f64>>();
    Ok(Design {
        treatment: take(&treatment),
        outcome: take(&outcome),
        covariates: covariates.iter().map(|col| take(col)).collect(),
        covariate_names: adjustment.to_vec(),
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Pearson correlation; zero for degenerate columns.
pub(crate) fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    if va < 1e-12 || vb < 1e-12 {
        return 0.0;
    }
    cov / (va.sqrt() * vb.sqrt())
}
