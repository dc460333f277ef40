//! Durbin-Watson test for first-order autocorrelation of the residuals.

use crate::core::{DegreesOfFreedom, DiagnosticResult, DwAlternative, FittedModel};
use crate::solvers::{RegressionError, Result};
use faer::Mat;
use statrs::distribution::{ContinuousCDF, Normal};

/// Durbin-Watson statistic d = Σ(e_t − e_{t−1})² / Σ e_t².
///
/// Near 2 without autocorrelation, toward 0 for positive and toward 4 for
/// negative autocorrelation. `NaN` when the residuals are all zero.
pub fn durbin_watson_statistic(residuals: &[f64]) -> f64 {
    let denom: f64 = residuals.iter().map(|e| e * e).sum();
    if denom == 0.0 {
        return f64::NAN;
    }
    let num: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    num / denom
}

/// Durbin-Watson test in row order of the design.
///
/// The p-value uses a normal approximation whose mean and variance are the
/// exact null moments of d given the design: with A the first-difference
/// quadratic form and M = I − H,
///
/// E[d] = tr(MA) / (n − p)
/// Var[d] = 2 [(n − p) tr((MA)²) − tr(MA)²] / ((n − p)² (n − p + 2))
///
/// The traces are computed through the thin Q factor, so no n × n matrix is
/// formed.
///
/// # Errors
/// `DegenerateModel` if there are no residual degrees of freedom or the
/// residuals are identically zero.
pub fn durbin_watson(
    model: &FittedModel,
    alternative: DwAlternative,
    significance_level: f64,
) -> Result<DiagnosticResult> {
    let n = model.n_observations();
    let p = model.n_parameters();
    if model.df_residual() == 0 || n < 2 {
        return Err(RegressionError::DegenerateModel(
            "Durbin-Watson needs residual degrees of freedom".to_string(),
        ));
    }

    let residuals: Vec<f64> = model.residuals().iter().copied().collect();
    let d = durbin_watson_statistic(&residuals);
    if d.is_nan() {
        return Err(RegressionError::DegenerateModel(
            "Durbin-Watson undefined for a perfect fit".to_string(),
        ));
    }

    let (mean, variance) = null_moments(model.q(), n, p);
    let p_value = if variance > 0.0 && variance.is_finite() {
        let std_normal = Normal::new(0.0, 1.0)
            .map_err(|e| RegressionError::DegenerateModel(format!("normal distribution: {}", e)))?;
        let z = (d - mean) / variance.sqrt();
        let lower = std_normal.cdf(z);
        match alternative {
            DwAlternative::Greater => lower,
            DwAlternative::Less => 1.0 - lower,
            DwAlternative::TwoSided => (2.0 * lower.min(1.0 - lower)).min(1.0),
        }
    } else {
        f64::NAN
    };

    log::trace!(
        "durbin-watson: d = {:.4}, E[d] = {:.4}, Var[d] = {:.4e}",
        d,
        mean,
        variance
    );

    Ok(DiagnosticResult::new(
        "Durbin-Watson",
        d,
        DegreesOfFreedom::None,
        p_value,
        significance_level,
    ))
}

/// Exact mean and variance of d under independent normal errors.
fn null_moments(q: &Mat<f64>, n: usize, p: usize) -> (f64, f64) {
    let df = (n - p) as f64;

    // DQ: first differences of the rows of Q, (n − 1) × p
    let dq = Mat::from_fn(n - 1, p, |i, j| q[(i + 1, j)] - q[(i, j)]);
    // AQ = Dᵀ(DQ), n × p
    let aq = Mat::from_fn(n, p, |i, j| {
        let up = if i >= 1 { dq[(i - 1, j)] } else { 0.0 };
        let down = if i < n - 1 { dq[(i, j)] } else { 0.0 };
        up - down
    });

    // B = QᵀAQ = (DQ)ᵀ(DQ); tr(QᵀA²Q) = ‖AQ‖²
    let b = dq.transpose() * &dq;
    let tr_b: f64 = (0..p).map(|k| b[(k, k)]).sum();
    let tr_b2: f64 = (0..p)
        .flat_map(|i| (0..p).map(move |j| (i, j)))
        .map(|(i, j)| b[(i, j)].powi(2))
        .sum();
    let tr_qa2q: f64 = (0..n)
        .flat_map(|i| (0..p).map(move |j| (i, j)))
        .map(|(i, j)| aq[(i, j)].powi(2))
        .sum();

    let tr_a = 2.0 * (n as f64 - 1.0);
    let tr_a2 = 6.0 * n as f64 - 8.0;

    let tr_ma = tr_a - tr_b;
    let tr_ma2 = tr_a2 - 2.0 * tr_qa2q + tr_b2;

    let mean = tr_ma / df;
    let variance = 2.0 * (df * tr_ma2 - tr_ma * tr_ma) / (df * df * (df + 2.0));
    (mean, variance)
}
