//! Structured diagnostic outputs.
//!
//! Reports are plain records; rendering them as tables, plots, or prose is
//! left to the caller.

use faer::Mat;

/// Outcome of a hypothesis test at a fixed significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// p-value below the significance level.
    RejectNull,
    /// p-value at or above the significance level, or undefined.
    DoNotRejectNull,
}

impl Decision {
    /// Decide from a p-value; a `NaN` p-value never rejects.
    pub fn from_p_value(p_value: f64, significance_level: f64) -> Self {
        if p_value < significance_level {
            Decision::RejectNull
        } else {
            Decision::DoNotRejectNull
        }
    }
}

/// Degrees of freedom of a test's reference distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegreesOfFreedom {
    /// The reference distribution has no df parameter.
    None,
    /// Student-t or chi-squared.
    Single(f64),
    /// F distribution (numerator, denominator).
    Pair(f64, f64),
}

/// A single hypothesis test result.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticResult {
    /// Test name (for coefficient tests, the column name).
    pub test: String,
    /// Test statistic.
    pub statistic: f64,
    /// Degrees of freedom of the reference distribution.
    pub df: DegreesOfFreedom,
    /// p-value.
    pub p_value: f64,
    /// Significance level the decision was taken at.
    pub significance_level: f64,
    /// Reject or do not reject the null hypothesis.
    pub decision: Decision,
}

impl DiagnosticResult {
    /// Build a result, deriving the decision from the p-value.
    pub fn new(
        test: impl Into<String>,
        statistic: f64,
        df: DegreesOfFreedom,
        p_value: f64,
        significance_level: f64,
    ) -> Self {
        Self {
            test: test.into(),
            statistic,
            df,
            p_value,
            significance_level,
            decision: Decision::from_p_value(p_value, significance_level),
        }
    }

    /// Whether the null hypothesis is rejected.
    pub fn rejects_null(&self) -> bool {
        self.decision == Decision::RejectNull
    }
}

/// A two-sided confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Coefficient tests, the omnibus F-test, and goodness of fit.
#[derive(Debug, Clone)]
pub struct InferenceReport {
    /// Column names, aligned with every per-coefficient vector below.
    pub column_names: Vec<String>,
    /// Coefficient estimates.
    pub estimates: Vec<f64>,
    /// Standard errors.
    pub std_errors: Vec<f64>,
    /// Per-coefficient two-sided t-tests.
    pub coefficient_tests: Vec<DiagnosticResult>,
    /// Confidence intervals at `confidence_level`.
    pub confidence_intervals: Vec<ConfidenceInterval>,
    /// Confidence level of the intervals.
    pub confidence_level: f64,
    /// Omnibus ANOVA F-test.
    pub omnibus_test: DiagnosticResult,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// R² adjusted for degrees of freedom.
    pub adjusted_r_squared: f64,
    /// Residual standard error σ̂.
    pub residual_std_error: f64,
    /// Gaussian log-likelihood at the MLE of σ².
    pub log_likelihood: f64,
    /// Akaike information criterion.
    pub aic: f64,
    /// Bayesian information criterion.
    pub bic: f64,
}

/// VIF of a single design column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnVif {
    /// Design column name.
    pub column: String,
    /// 1 / (1 − R²) of the column on all other design columns.
    pub vif: f64,
}

/// Generalized VIF of a model term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVif {
    /// Term name.
    pub term: String,
    /// Number of design columns of the term.
    pub df: usize,
    /// Generalized VIF (equals the VIF for single-column terms).
    pub gvif: f64,
    /// GVIF^(1 / (2·df)), comparable across terms of different size.
    pub adjusted_gvif: f64,
}

/// Correlation and variance inflation among the predictors.
#[derive(Debug, Clone)]
pub struct MulticollinearityReport {
    /// Names of the continuous covariates, indexing `pairwise_correlations`.
    pub covariates: Vec<String>,
    /// Spearman rank correlation matrix of the continuous covariates.
    pub pairwise_correlations: Mat<f64>,
    /// VIF per non-intercept design column, in design order.
    pub vif: Vec<ColumnVif>,
    /// Generalized VIF per non-intercept model term.
    pub term_vif: Vec<TermVif>,
}

impl MulticollinearityReport {
    /// VIF of a design column by name.
    pub fn vif_of(&self, column: &str) -> Option<f64> {
        self.vif.iter().find(|v| v.column == column).map(|v| v.vif)
    }

    /// Design columns whose VIF exceeds `threshold`.
    pub fn high_vif_columns(&self, threshold: f64) -> Vec<&str> {
        self.vif
            .iter()
            .filter(|v| v.vif > threshold)
            .map(|v| v.column.as_str())
            .collect()
    }
}

/// Tests on the residual vector.
#[derive(Debug, Clone)]
pub struct ResidualDiagnosticsReport {
    /// First-order autocorrelation.
    pub durbin_watson: DiagnosticResult,
    /// Heteroscedasticity.
    pub breusch_pagan: DiagnosticResult,
    /// Normality.
    pub shapiro_wilk: DiagnosticResult,
}

/// Per-observation influence measures, in design row order.
#[derive(Debug, Clone)]
pub struct InfluenceDiagnosticsReport {
    /// Hat diagonal h_ii.
    pub leverage: Vec<f64>,
    /// Cook's distance.
    pub cooks_distance: Vec<f64>,
    /// Externally studentized residuals.
    pub studentized_residuals: Vec<f64>,
    /// Internally standardized residuals e_i / (σ̂ √(1 − h_ii)).
    pub standardized_residuals: Vec<f64>,
    /// DFFITS.
    pub dffits: Vec<f64>,
    /// Number of design columns.
    pub n_parameters: usize,
}

/// Every diagnostic for one fitted model.
#[derive(Debug, Clone)]
pub struct FullReport {
    pub inference: InferenceReport,
    pub residuals: ResidualDiagnosticsReport,
    pub influence: InfluenceDiagnosticsReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_from_p_value() {
        assert_eq!(Decision::from_p_value(0.01, 0.05), Decision::RejectNull);
        assert_eq!(Decision::from_p_value(0.05, 0.05), Decision::DoNotRejectNull);
        assert_eq!(
            Decision::from_p_value(f64::NAN, 0.05),
            Decision::DoNotRejectNull
        );
    }

    #[test]
    fn test_high_vif_columns() {
        let report = MulticollinearityReport {
            covariates: vec![],
            pairwise_correlations: Mat::zeros(0, 0),
            vif: vec![
                ColumnVif {
                    column: "a".into(),
                    vif: 1.2,
                },
                ColumnVif {
                    column: "b".into(),
                    vif: 12.0,
                },
            ],
            term_vif: vec![],
        };

        assert_eq!(report.high_vif_columns(5.0), vec!["b"]);
        assert_eq!(report.vif_of("a"), Some(1.2));
        assert_eq!(report.vif_of("z"), None);
    }
}
