//! Core traits and the error type for model fitting.

use crate::core::{DesignMatrix, FittedModel};
use thiserror::Error;

/// Errors that can occur while building, fitting, or diagnosing a model.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("column '{column}' has {got} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("insufficient data: need more than {needed} usable rows, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("design matrix is rank deficient; linearly dependent columns: {}", .columns.join(", "))]
    RankDeficient { columns: Vec<String> },

    #[error("degenerate model: {0}")]
    DegenerateModel(String),

    #[error("{test} requires {min} <= n <= {max}, got n = {n}")]
    SampleSize {
        test: &'static str,
        n: usize,
        min: usize,
        max: usize,
    },

    #[error("missing value for variable '{variable}' in row {row}")]
    MissingValue { variable: String, row: usize },

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("variable '{variable}' must be {expected}")]
    VariableType {
        variable: String,
        expected: &'static str,
    },

    #[error("factor '{factor}' has no level '{level}'")]
    UnknownLevel { factor: String, level: String },

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] crate::core::OptionsError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegressionError>;

/// A least-squares estimator over a prepared design matrix.
pub trait Regressor {
    /// Fit the model described by `design`.
    ///
    /// # Returns
    /// An immutable fitted model that diagnostics borrow read-only.
    fn fit(&self, design: &DesignMatrix) -> Result<FittedModel>;
}
