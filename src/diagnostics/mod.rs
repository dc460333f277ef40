//! Regression diagnostics.
//!
//! - **Multicollinearity**: Spearman correlations, VIF, and generalized VIF
//! - **Residuals**: Durbin-Watson, Breusch-Pagan, and Shapiro-Wilk tests
//! - **Influence**: leverage, Cook's distance, studentized residuals, DFFITS
//!
//! # Example
//!
//! ```rust,ignore
//! use lm_diagnostics::diagnostics::{diagnose_influence, diagnose_residuals};
//!
//! let residuals = diagnose_residuals(&model)?;
//! if residuals.breusch_pagan.rejects_null() {
//!     println!("error variance depends on the predictors");
//! }
//!
//! let influence = diagnose_influence(&model);
//! let influential = influence.influential();
//! ```

mod autocorrelation;
mod correlation;
mod heteroscedasticity;
mod influence;
mod leverage;
mod normality;
mod registry;
mod residuals;
mod vif;

pub use autocorrelation::{durbin_watson, durbin_watson_statistic};
pub use correlation::{spearman_correlation, spearman_matrix};
pub use heteroscedasticity::breusch_pagan;
pub use influence::{
    cooks_distance, cooks_distance_threshold, diagnose_influence, dffits, dffits_threshold,
    influential_cooks, influential_dffits, residual_outliers, standardized_residuals,
    studentized_residuals, COOKS_DISTANCE_CONVENTIONAL, STUDENTIZED_RESIDUAL_THRESHOLD,
};
pub use leverage::{
    high_leverage_points, leverage, leverage_threshold, leverage_threshold_conservative,
};
pub use normality::{shapiro_wilk, SHAPIRO_WILK_MAX_N, SHAPIRO_WILK_MIN_N};
pub use registry::{
    diagnose_all, BreuschPagan, Diagnostic, DiagnosticSuite, DurbinWatson, OmnibusFTest,
    ShapiroWilk,
};
pub use residuals::{diagnose_residuals, diagnose_residuals_with};
pub use vif::{
    analyze_multicollinearity, analyze_multicollinearity_with, generalized_vifs,
    high_vif_predictors, multicollinearity_report, variance_inflation_factors, VIF_MODERATE,
    VIF_SEVERE,
};
