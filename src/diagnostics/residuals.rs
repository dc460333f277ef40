//! Residual diagnostics: autocorrelation, heteroscedasticity, normality.

use super::autocorrelation::durbin_watson;
use super::heteroscedasticity::breusch_pagan;
use super::normality::shapiro_wilk;
use crate::core::{DiagnosticsOptions, FittedModel, ResidualDiagnosticsReport};
use crate::solvers::Result;

/// Run the residual tests with default options.
pub fn diagnose_residuals(model: &FittedModel) -> Result<ResidualDiagnosticsReport> {
    diagnose_residuals_with(model, &DiagnosticsOptions::default())
}

/// Run Durbin-Watson, Breusch-Pagan, and Shapiro-Wilk on a fitted model.
///
/// All three decisions are taken at `options.significance_level`.
///
/// # Errors
/// - `DegenerateModel` without residual degrees of freedom or for a perfect fit
/// - `SampleSize` if n is outside the Shapiro-Wilk range (3..=5000)
pub fn diagnose_residuals_with(
    model: &FittedModel,
    options: &DiagnosticsOptions,
) -> Result<ResidualDiagnosticsReport> {
    options.validate()?;
    let alpha = options.significance_level;

    let durbin_watson = durbin_watson(model, options.dw_alternative, alpha)?;
    let breusch_pagan = breusch_pagan(model, alpha)?;

    let residuals: Vec<f64> = model.residuals().iter().copied().collect();
    let shapiro_wilk = shapiro_wilk(&residuals, alpha)?;

    Ok(ResidualDiagnosticsReport {
        durbin_watson,
        breusch_pagan,
        shapiro_wilk,
    })
}
