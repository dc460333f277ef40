//! Breusch-Pagan test for heteroscedasticity.

use crate::core::{DegreesOfFreedom, DiagnosticResult, FittedModel};
use crate::solvers::{RegressionError, Result};
use faer::Col;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Studentized (Koenker) Breusch-Pagan test.
///
/// Regresses the squared residuals on the model's own design and refers
/// LM = n · R²_aux to χ²(p − 1). The auxiliary fit reuses the model's
/// Q factor. Under the null the error variance does not depend on the
/// predictors.
///
/// An intercept-only model has no auxiliary regressors and yields a `NaN`
/// statistic and p-value. If every squared residual is equal there is no
/// variation to explain: LM = 0 and p = 1.
///
/// # Errors
/// `DegenerateModel` if there are no residual degrees of freedom.
pub fn breusch_pagan(model: &FittedModel, significance_level: f64) -> Result<DiagnosticResult> {
    if model.df_residual() == 0 {
        return Err(RegressionError::DegenerateModel(
            "Breusch-Pagan needs residual degrees of freedom".to_string(),
        ));
    }

    let n = model.n_observations();
    let p = model.n_parameters();
    let df = if model.design().has_intercept() {
        p - 1
    } else {
        p
    };

    let u = Col::from_fn(n, |i| model.residuals()[i].powi(2));
    let u_mean = u.iter().sum::<f64>() / n as f64;
    let tss: f64 = u.iter().map(|&v| (v - u_mean).powi(2)).sum();

    let (statistic, p_value) = if df == 0 {
        (f64::NAN, f64::NAN)
    } else if tss <= 0.0 {
        (0.0, 1.0)
    } else {
        let fitted = model.project(&u);
        let rss: f64 = (0..n).map(|i| (u[i] - fitted[i]).powi(2)).sum();
        let r_squared = (1.0 - rss / tss).clamp(0.0, 1.0);
        let lm = n as f64 * r_squared;

        let chi2 = ChiSquared::new(df as f64)
            .map_err(|e| RegressionError::DegenerateModel(format!("chi-squared distribution: {}", e)))?;
        (lm, chi2.sf(lm))
    };

    log::trace!("breusch-pagan: LM = {:.4}, df = {}", statistic, df);

    Ok(DiagnosticResult::new(
        "Breusch-Pagan",
        statistic,
        DegreesOfFreedom::Single(df as f64),
        p_value,
        significance_level,
    ))
}
