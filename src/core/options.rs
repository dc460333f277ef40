//! Diagnostics options and configuration.

use thiserror::Error;

/// What to do with an observation that lacks a value for a model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Drop the row and record why it was dropped.
    ///
    /// Equivalent to R's `na.omit`.
    #[default]
    Omit,

    /// Return an error at the first missing cell.
    ///
    /// Equivalent to R's `na.fail`.
    Fail,
}

/// Alternative hypothesis for the Durbin-Watson test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DwAlternative {
    /// First-order autocorrelation of either sign.
    #[default]
    TwoSided,
    /// Positive autocorrelation (small statistic).
    Greater,
    /// Negative autocorrelation (large statistic).
    Less,
}

/// Configuration shared by the fitter and every diagnostic.
#[derive(Debug, Clone)]
pub struct DiagnosticsOptions {
    /// Significance level used for reject / do-not-reject decisions (default: 0.05).
    pub significance_level: f64,
    /// Confidence level for coefficient intervals (default: 0.95).
    pub confidence_level: f64,
    /// Relative tolerance for rank detection: a pivot below
    /// `rank_tolerance * max |pivot|` marks its column as dependent (default: 1e-10).
    pub rank_tolerance: f64,
    /// Missing value handling when building the design (default: `Omit`).
    pub missing_policy: MissingPolicy,
    /// Alternative hypothesis for Durbin-Watson (default: two-sided).
    pub dw_alternative: DwAlternative,
}

impl Default for DiagnosticsOptions {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
            missing_policy: MissingPolicy::Omit,
            dw_alternative: DwAlternative::TwoSided,
        }
    }
}

/// Errors that can occur when validating diagnostics options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("significance_level must be in (0, 1), got {0}")]
    InvalidSignificanceLevel(f64),
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be positive and below 1, got {0}")]
    InvalidRankTolerance(f64),
}

impl DiagnosticsOptions {
    /// Create a new builder for diagnostics options.
    pub fn builder() -> DiagnosticsOptionsBuilder {
        DiagnosticsOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(OptionsError::InvalidSignificanceLevel(
                self.significance_level,
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if !(self.rank_tolerance > 0.0 && self.rank_tolerance < 1.0) {
            return Err(OptionsError::InvalidRankTolerance(self.rank_tolerance));
        }
        Ok(())
    }
}

/// Builder for `DiagnosticsOptions`.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsOptionsBuilder {
    options: DiagnosticsOptions,
}

impl DiagnosticsOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the significance level (alpha).
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.options.significance_level = alpha;
        self
    }

    /// Set the confidence level for coefficient intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the relative rank tolerance.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Set the missing value policy.
    pub fn missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.options.missing_policy = policy;
        self
    }

    /// Set the Durbin-Watson alternative hypothesis.
    pub fn dw_alternative(mut self, alternative: DwAlternative) -> Self {
        self.options.dw_alternative = alternative;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<DiagnosticsOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> DiagnosticsOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = DiagnosticsOptions::default();
        assert!((opts.significance_level - 0.05).abs() < 1e-12);
        assert!((opts.confidence_level - 0.95).abs() < 1e-12);
        assert!((opts.rank_tolerance - 1e-10).abs() < 1e-20);
        assert_eq!(opts.missing_policy, MissingPolicy::Omit);
        assert_eq!(opts.dw_alternative, DwAlternative::TwoSided);
    }

    #[test]
    fn test_builder() {
        let opts = DiagnosticsOptions::builder()
            .significance_level(0.01)
            .missing_policy(MissingPolicy::Fail)
            .dw_alternative(DwAlternative::Greater)
            .build()
            .unwrap();

        assert!((opts.significance_level - 0.01).abs() < 1e-12);
        assert_eq!(opts.missing_policy, MissingPolicy::Fail);
        assert_eq!(opts.dw_alternative, DwAlternative::Greater);
    }

    #[test]
    fn test_validation_invalid_significance_level() {
        let result = DiagnosticsOptions::builder().significance_level(1.0).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidSignificanceLevel(_))
        ));

        let result = DiagnosticsOptions::builder()
            .significance_level(f64::NAN)
            .build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidSignificanceLevel(_))
        ));
    }

    #[test]
    fn test_validation_invalid_confidence_level() {
        let result = DiagnosticsOptions::builder().confidence_level(0.0).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidConfidenceLevel(_))
        ));
    }

    #[test]
    fn test_validation_invalid_rank_tolerance() {
        let result = DiagnosticsOptions::builder().rank_tolerance(-1e-8).build();
        assert!(matches!(result, Err(OptionsError::InvalidRankTolerance(_))));
    }

    #[test]
    fn test_build_unchecked_skips_validation() {
        let opts = DiagnosticsOptions::builder()
            .confidence_level(2.0)
            .build_unchecked();
        assert!((opts.confidence_level - 2.0).abs() < 1e-12);
    }
}
