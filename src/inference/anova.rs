//! Omnibus F-test, goodness of fit, and the inference summary.

use super::coefficient::CoefficientInference;
use crate::core::{
    DegreesOfFreedom, DiagnosticResult, DiagnosticsOptions, FittedModel, InferenceReport,
};
use crate::solvers::{RegressionError, Result};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Model degrees of freedom: p − 1 with an intercept, p without.
fn model_df(model: &FittedModel) -> usize {
    let p = model.n_parameters();
    if model.design().has_intercept() {
        p - 1
    } else {
        p
    }
}

fn require_residual_df(model: &FittedModel) -> Result<f64> {
    match model.df_residual() {
        0 => Err(RegressionError::DegenerateModel(
            "no residual degrees of freedom (n = p)".to_string(),
        )),
        df => Ok(df as f64),
    }
}

/// Omnibus ANOVA F-test of all non-intercept coefficients being zero.
///
/// F = (ESS / (p − 1)) / (RSS / (n − p)), referred to F(p − 1, n − p).
/// An intercept-only model has no numerator degrees of freedom and yields a
/// `NaN` statistic and p-value.
pub fn omnibus_f_test(model: &FittedModel, significance_level: f64) -> Result<DiagnosticResult> {
    let df_resid = require_residual_df(model)?;
    let df_model = model_df(model) as f64;

    let (f_statistic, p_value) = if df_model == 0.0 {
        (f64::NAN, f64::NAN)
    } else {
        let f = (model.ess() / df_model) / (model.rss() / df_resid);
        let p = if f.is_nan() {
            f64::NAN
        } else if f.is_infinite() {
            0.0
        } else {
            let f_dist = FisherSnedecor::new(df_model, df_resid)
                .map_err(|e| RegressionError::DegenerateModel(format!("F distribution: {}", e)))?;
            f_dist.sf(f.max(0.0))
        };
        (f, p)
    };

    Ok(DiagnosticResult::new(
        "F-test",
        f_statistic,
        DegreesOfFreedom::Pair(df_model, df_resid),
        p_value,
        significance_level,
    ))
}

/// Summarize a fit with default options (α = 0.05, 95% intervals).
pub fn summarize(model: &FittedModel) -> Result<InferenceReport> {
    summarize_with(model, &DiagnosticsOptions::default())
}

/// Per-coefficient t-tests, the omnibus F-test, R², adjusted R², and
/// information criteria.
///
/// # Errors
/// `DegenerateModel` if the residual degrees of freedom are zero.
pub fn summarize_with(model: &FittedModel, options: &DiagnosticsOptions) -> Result<InferenceReport> {
    options.validate()?;
    let df_resid = require_residual_df(model)?;

    let n = model.n_observations() as f64;
    let p = model.n_parameters() as f64;
    let alpha = options.significance_level;

    let coefficients = model.coefficients();
    let std_errors = model.std_errors();
    let t_stats = CoefficientInference::t_statistics(coefficients, std_errors);
    let p_vals = CoefficientInference::p_values(&t_stats, df_resid)?;
    let confidence_intervals = CoefficientInference::confidence_intervals(
        coefficients,
        std_errors,
        df_resid,
        options.confidence_level,
    )?;

    let coefficient_tests = model
        .column_names()
        .iter()
        .enumerate()
        .map(|(j, name)| {
            DiagnosticResult::new(
                name.clone(),
                t_stats[j],
                DegreesOfFreedom::Single(df_resid),
                p_vals[j],
                alpha,
            )
        })
        .collect();

    let omnibus_test = omnibus_f_test(model, alpha)?;

    let rss = model.rss();
    let tss = model.tss();
    let r_squared = if tss > 0.0 {
        (1.0 - rss / tss).clamp(0.0, 1.0)
    } else if rss < 1e-10 {
        1.0
    } else {
        0.0
    };

    let df_total = if model.design().has_intercept() {
        n - 1.0
    } else {
        n
    };
    let adjusted_r_squared = 1.0 - (1.0 - r_squared) * df_total / df_resid;

    // Gaussian log-likelihood at σ̂² = RSS / n; σ² counts as a parameter
    let log_likelihood = if rss > 0.0 {
        -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (rss / n).ln() + 1.0)
    } else {
        f64::INFINITY
    };
    let k = p + 1.0;
    let aic = 2.0 * k - 2.0 * log_likelihood;
    let bic = k * n.ln() - 2.0 * log_likelihood;

    Ok(InferenceReport {
        column_names: model.column_names().to_vec(),
        estimates: coefficients.iter().copied().collect(),
        std_errors: std_errors.iter().copied().collect(),
        coefficient_tests,
        confidence_intervals,
        confidence_level: options.confidence_level,
        omnibus_test,
        r_squared,
        adjusted_r_squared,
        residual_std_error: model.sigma2().sqrt(),
        log_likelihood,
        aic,
        bic,
    })
}
