//! Influence measures: Cook's distance, studentized residuals, DFFITS.

use super::leverage::{high_leverage_points, leverage_threshold, leverage_threshold_conservative};
use crate::core::{FittedModel, InfluenceDiagnosticsReport};

/// Cook's distance above which an observation is influential by the
/// conventional rule.
pub const COOKS_DISTANCE_CONVENTIONAL: f64 = 1.0;

/// |studentized residual| above which an observation is flagged as an outlier.
pub const STUDENTIZED_RESIDUAL_THRESHOLD: f64 = 2.0;

/// Size-dependent Cook's distance cutoff 4/n.
pub fn cooks_distance_threshold(n: usize) -> f64 {
    4.0 / n as f64
}

/// DFFITS cutoff 2·√(p/n).
pub fn dffits_threshold(n_params: usize, n: usize) -> f64 {
    2.0 * (n_params as f64 / n as f64).sqrt()
}

/// 1 − h_ii, or `None` when the observation determines its own fitted value.
fn complement(h: f64) -> Option<f64> {
    let one_minus_h = 1.0 - h;
    (one_minus_h > f64::EPSILON).then_some(one_minus_h)
}

/// Compute Cook's distance for each observation.
///
/// D_i = (e_i² / (p · σ̂²)) · (h_ii / (1 − h_ii)²)
///
/// `NaN` where σ̂² is undefined or h_ii = 1.
pub fn cooks_distance(residuals: &[f64], leverage: &[f64], sigma2: f64, n_params: usize) -> Vec<f64> {
    if !(sigma2 > 0.0 && sigma2.is_finite()) || n_params == 0 {
        return vec![f64::NAN; residuals.len()];
    }

    residuals
        .iter()
        .zip(leverage)
        .map(|(&e, &h)| match complement(h) {
            Some(omh) => (e * e / (n_params as f64 * sigma2)) * (h / (omh * omh)),
            None => f64::NAN,
        })
        .collect()
}

/// Internally standardized residuals e_i / (σ̂ √(1 − h_ii)).
pub fn standardized_residuals(residuals: &[f64], leverage: &[f64], sigma2: f64) -> Vec<f64> {
    if !(sigma2 > 0.0 && sigma2.is_finite()) {
        return vec![f64::NAN; residuals.len()];
    }
    let sigma = sigma2.sqrt();

    residuals
        .iter()
        .zip(leverage)
        .map(|(&e, &h)| match complement(h) {
            Some(omh) => e / (sigma * omh.sqrt()),
            None => f64::NAN,
        })
        .collect()
}

/// Externally studentized residuals.
///
/// t_i = e_i / (s_(i) √(1 − h_ii)), where the leave-one-out variance comes
/// from the deletion identity
///
/// s²_(i) = (RSS − e_i² / (1 − h_ii)) / (n − p − 1)
///
/// so no model is refit. `NaN` when n − p − 1 ≤ 0 or h_ii = 1.
pub fn studentized_residuals(residuals: &[f64], leverage: &[f64], rss: f64, df_residual: usize) -> Vec<f64> {
    if df_residual <= 1 {
        return vec![f64::NAN; residuals.len()];
    }
    let df_loo = (df_residual - 1) as f64;

    residuals
        .iter()
        .zip(leverage)
        .map(|(&e, &h)| {
            let Some(omh) = complement(h) else {
                return f64::NAN;
            };
            let s2_loo = (rss - e * e / omh) / df_loo;
            if s2_loo > 0.0 {
                e / (s2_loo.sqrt() * omh.sqrt())
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// DFFITS from externally studentized residuals: t_i · √(h_ii / (1 − h_ii)).
pub fn dffits(studentized: &[f64], leverage: &[f64]) -> Vec<f64> {
    studentized
        .iter()
        .zip(leverage)
        .map(|(&t, &h)| match complement(h) {
            Some(omh) => t * (h / omh).sqrt(),
            None => f64::NAN,
        })
        .collect()
}

/// Per-observation influence measures of a fitted model.
///
/// Values are in design row order; `DesignMatrix::retained_rows` maps them
/// back to dataset rows.
pub fn diagnose_influence(model: &FittedModel) -> InfluenceDiagnosticsReport {
    let residuals: Vec<f64> = model.residuals().iter().copied().collect();
    let leverage: Vec<f64> = model.hat_diagonal().iter().copied().collect();
    let p = model.n_parameters();

    let cooks = cooks_distance(&residuals, &leverage, model.sigma2(), p);
    let studentized = studentized_residuals(&residuals, &leverage, model.rss(), model.df_residual());
    let standardized = standardized_residuals(&residuals, &leverage, model.sigma2());
    let dffits = dffits(&studentized, &leverage);

    InfluenceDiagnosticsReport {
        leverage,
        cooks_distance: cooks,
        studentized_residuals: studentized,
        standardized_residuals: standardized,
        dffits,
        n_parameters: p,
    }
}

/// Identify influential observations based on Cook's distance.
///
/// Returns indices of observations with D_i > threshold.
/// Default threshold: 4/n.
pub fn influential_cooks(cooks_d: &[f64], threshold: Option<f64>) -> Vec<usize> {
    let cutoff = threshold.unwrap_or_else(|| cooks_distance_threshold(cooks_d.len()));

    cooks_d
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d > cutoff)
        .map(|(i, _)| i)
        .collect()
}

/// Identify outlying observations by |studentized residual| > threshold.
///
/// Default threshold: 2.
pub fn residual_outliers(studentized: &[f64], threshold: Option<f64>) -> Vec<usize> {
    let cutoff = threshold.unwrap_or(STUDENTIZED_RESIDUAL_THRESHOLD);

    studentized
        .iter()
        .enumerate()
        .filter(|(_, &t)| t.is_finite() && t.abs() > cutoff)
        .map(|(i, _)| i)
        .collect()
}

/// Identify influential observations based on DFFITS.
///
/// Returns indices of observations with |DFFITS_i| > threshold.
/// Default threshold: 2·√(p/n).
pub fn influential_dffits(dffits: &[f64], n_params: usize, threshold: Option<f64>) -> Vec<usize> {
    let cutoff = threshold.unwrap_or_else(|| dffits_threshold(n_params, dffits.len()));

    dffits
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d.abs() > cutoff)
        .map(|(i, _)| i)
        .collect()
}

impl InfluenceDiagnosticsReport {
    /// Observations with leverage above 2p/n.
    pub fn high_leverage(&self) -> Vec<usize> {
        high_leverage_points(&self.leverage, self.n_parameters, None)
    }

    /// Observations with leverage above 3p/n.
    pub fn high_leverage_conservative(&self) -> Vec<usize> {
        self.high_leverage_above(self.leverage_threshold_conservative())
    }

    /// Observations with leverage above a caller-chosen cutoff.
    pub fn high_leverage_above(&self, threshold: f64) -> Vec<usize> {
        high_leverage_points(&self.leverage, self.n_parameters, Some(threshold))
    }

    /// Observations with Cook's distance above 4/n.
    pub fn influential(&self) -> Vec<usize> {
        influential_cooks(&self.cooks_distance, None)
    }

    /// Observations with Cook's distance above `threshold`, e.g.
    /// [`COOKS_DISTANCE_CONVENTIONAL`].
    pub fn influential_above(&self, threshold: f64) -> Vec<usize> {
        influential_cooks(&self.cooks_distance, Some(threshold))
    }

    /// Observations with |studentized residual| above 2.
    pub fn outliers(&self) -> Vec<usize> {
        residual_outliers(&self.studentized_residuals, None)
    }

    /// Observations with |DFFITS| above 2·√(p/n).
    pub fn influential_dffits(&self) -> Vec<usize> {
        influential_dffits(&self.dffits, self.n_parameters, None)
    }

    /// The 2p/n leverage cutoff for this model.
    pub fn leverage_threshold(&self) -> f64 {
        leverage_threshold(self.n_parameters, self.leverage.len())
    }

    /// The 3p/n leverage cutoff for this model.
    pub fn leverage_threshold_conservative(&self) -> f64 {
        leverage_threshold_conservative(self.n_parameters, self.leverage.len())
    }
}
