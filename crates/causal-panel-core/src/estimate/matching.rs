//! Propensity-score matching estimator.

use nalgebra::{DMatrix, DVector};

use crate::dataset::CohortFrame;
use crate::error::EstimatorError;
use crate::identify::IdentifiedEstimand;

use super::{design, mean, variance, Design, Estimator, TargetUnits};

const MAX_IRLS_ITERATIONS: usize = 25;
const CONVERGENCE_TOLERANCE: f64 = 1e-8;
const PROBABILITY_FLOOR: f64 = 1e-6;

/// Backdoor ATT via one-to-one nearest-neighbor matching on the
/// propensity score.
///
/// The score model is a logistic regression of treatment on the
/// standardized adjustment covariates. Fitted probabilities are clamped,
/// so a separating covariate (the cohort frame's `signup_month` is an
/// exact multiple of treatment) degrades the match toward a group-mean
/// comparison instead of diverging.
pub struct PropensityScoreMatching;

impl Estimator for PropensityScoreMatching {
    fn name(&self) -> &'static str {
        "backdoor.propensity_score_matching"
    }

    fn fit(
        &self,
        frame: &CohortFrame,
        estimand: &IdentifiedEstimand,
        _target: TargetUnits,
    ) -> Result<f64, EstimatorError> {
        let design = design(frame, estimand)?;

        if !is_binary(&design.treatment) {
            return Err(EstimatorError::not_applicable(
                "treatment column is not binary",
            ));
        }

        let treated: Vec<usize> = (0..design.treatment.len())
            .filter(|&i| design.treatment[i] == 1.0)
            .collect();
        let controls: Vec<usize> = (0..design.treatment.len())
            .filter(|&i| design.treatment[i] == 0.0)
            .collect();
        if treated.is_empty() || controls.is_empty() {
            return Err(EstimatorError::not_applicable(
                "matching needs both treated and control units",
            ));
        }

        let scores = propensity_scores(&design);

        let mut total = 0.0;
        for &t in &treated {
            let mut best = controls[0];
            let mut best_distance = f64::INFINITY;
            for &c in &controls {
                let distance = (scores[t] - scores[c]).abs();
                if distance < best_distance {
                    best_distance = distance;
                    best = c;
                }
            }
            total += design.outcome[t] - design.outcome[best];
        }

        let att = total / treated.len() as f64;
        if att.is_finite() {
            Ok(att)
        } else {
            Err(EstimatorError::not_applicable(
                "matching produced a non-finite estimate",
            ))
        }
    }
}

fn is_binary(values: &[f64]) -> bool {
    values.iter().all(|&v| v == 0.0 || v == 1.0)
}

/// Fitted treatment probabilities from an IRLS logistic fit on
/// [intercept | standardized covariates].
fn propensity_scores(design: &Design) -> Vec<f64> {
    let n = design.treatment.len();
    let standardized: Vec<Vec<f64>> = design.covariates.iter().map(|col| zscore(col)).collect();
    let k = standardized.len() + 1;

    let mut x = DMatrix::<f64>::zeros(n, k);
    for i in 0..n {
        x[(i, 0)] = 1.0;
        for (j, col) in standardized.iter().enumerate() {
            x[(i, j + 1)] = col[i];
        }
    }
    let y = DVector::from_vec(design.treatment.clone());

    let mut beta = DVector::<f64>::zeros(k);
    for _ in 0..MAX_IRLS_ITERATIONS {
        let eta = &x * &beta;
        let p = eta.map(|e| clamp_probability(sigmoid(e)));

        let mut weighted_x = x.clone();
        for i in 0..n {
            let w = p[i] * (1.0 - p[i]);
            for j in 0..k {
                weighted_x[(i, j)] *= w;
            }
        }
        let information = x.transpose() * &weighted_x;
        let residual = &y - &p;
        let score = x.transpose() * residual;

        let step = match information.svd(true, true).solve(&score, 1e-12) {
            Ok(step) => step,
            Err(_) => break,
        };
        beta += &step;
        if step.norm() < CONVERGENCE_TOLERANCE {
            break;
        }
    }

    let eta = &x * &beta;
    (0..n)
        .map(|i| clamp_probability(sigmoid(eta[i])))
        .collect()
}

fn sigmoid(e: f64) -> f64 {
    1.0 / (1.0 + (-e).exp())
}

fn clamp_probability(p: f64) -> f64 {
    p.clamp(PROBABILITY_FLOOR, 1.0 - PROBABILITY_FLOOR)
}

fn zscore(values: &[f64]) -> Vec<f64> {
    let sd = variance(values).sqrt();
    if sd < 1e-12 {
        return vec![0.0; values.len()];
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) / sd).collect()
}
