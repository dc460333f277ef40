//! Coefficient inference calculations.

use crate::core::ConfidenceInterval;
use crate::solvers::{RegressionError, Result};
use faer::Col;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    ///
    /// A zero standard error with a non-zero estimate gives ±∞; 0/0 gives `NaN`.
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Compute two-sided p-values from t-statistics.
    ///
    /// p_j = 2 * P(T > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Result<Col<f64>> {
        let t_dist = student_t(df)?;

        Ok(Col::from_fn(t_statistics.nrows(), |j| {
            let t = t_statistics[j];
            if t.is_nan() {
                f64::NAN
            } else if t.is_infinite() {
                0.0
            } else {
                (2.0 * t_dist.sf(t.abs())).min(1.0)
            }
        }))
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> Result<Vec<ConfidenceInterval>> {
        let t_dist = student_t(df)?;
        let alpha = 1.0 - confidence_level;
        let t_crit = t_dist.inverse_cdf(1.0 - alpha / 2.0);

        Ok((0..coefficients.nrows())
            .map(|j| {
                let margin = t_crit * std_errors[j];
                ConfidenceInterval {
                    lower: coefficients[j] - margin,
                    upper: coefficients[j] + margin,
                }
            })
            .collect())
    }
}

fn student_t(df: f64) -> Result<StudentsT> {
    if df <= 0.0 {
        return Err(RegressionError::DegenerateModel(format!(
            "residual degrees of freedom must be positive, got {}",
            df
        )));
    }
    StudentsT::new(0.0, 1.0, df)
        .map_err(|e| RegressionError::DegenerateModel(format!("t distribution: {}", e)))
}
