//! Linear-regression adjustment estimator.

use nalgebra::{DMatrix, DVector};

use tracing::debug;

use crate::dataset::CohortFrame;
use crate::error::EstimatorError;
use crate::identify::IdentifiedEstimand;

use super::{correlation, design, variance, Estimator, TargetUnits};

/// Backdoor ATT via ordinary least squares of the outcome on
/// [intercept | treatment | adjustment covariates].
///
/// The generating model is linear with a homogeneous effect, so the
/// treatment coefficient is the ATT. Covariates that are constant or
/// near-duplicates of the treatment column are dropped before fitting so
/// the treatment coefficient keeps its meaning; the solve itself uses SVD
/// least squares and tolerates remaining ill-conditioning.
pub struct LinearRegression;

const COLLINEARITY_LIMIT: f64 = 0.999;

impl Estimator for LinearRegression {
    fn name(&self) -> &'static str {
        "backdoor.linear_regression"
    }

    fn fit(
        &self,
        frame: &CohortFrame,
        estimand: &IdentifiedEstimand,
        _target: TargetUnits,
    ) -> Result<f64, EstimatorError> {
        let design = design(frame, estimand)?;
        let t = &design.treatment;

        if variance(t) < 1e-12 {
            return Err(EstimatorError::not_applicable(
                "treatment column has no variation",
            ));
        }

        let mut kept: Vec<&[f64]> = Vec::new();
        for (column, name) in design.covariates.iter().zip(&design.covariate_names) {
            if variance(column) < 1e-12 {
                debug!(covariate = %name, "dropping constant covariate");
                continue;
            }
            if correlation(column, t).abs() > COLLINEARITY_LIMIT {
                debug!(
                    covariate = %name,
                    "dropping covariate collinear with the treatment"
                );
                continue;
            }
            kept.push(column);
        }

        let n = t.len();
        let k = 2 + kept.len();
        let mut x = DMatrix::<f64>::zeros(n, k);
        for i in 0..n {
            x[(i, 0)] = 1.0;
            x[(i, 1)] = t[i];
            for (j, column) in kept.iter().enumerate() {
                x[(i, j + 2)] = column[i];
            }
        }
        let y = DVector::from_vec(design.outcome.clone());

        let beta = x
            .svd(true, true)
            .solve(&y, 1e-12)
            .map_err(|e| EstimatorError::not_applicable(format!("least squares failed: {e}")))?;

        let value = beta[1];
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EstimatorError::not_applicable(
                "regression produced a non-finite coefficient",
            ))
        }
    }
}
