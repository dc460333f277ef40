//! Least-squares fitting.

mod ols;
mod traits;

pub use ols::{check_full_rank, fit, OlsFitter};
pub use traits::{RegressionError, Regressor, Result};
