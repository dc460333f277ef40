//! Statistical inference (t-tests, confidence intervals, omnibus F-test).

mod anova;
mod coefficient;

pub use anova::{omnibus_f_test, summarize, summarize_with};
pub use coefficient::CoefficientInference;
