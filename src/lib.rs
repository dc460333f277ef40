//! Diagnostics for ordinary least-squares regression.
//!
//! Builds a design matrix from tabular data (continuous covariates plus
//! reference-coded factors), fits it by QR-based least squares, and reports
//! coefficient inference, multicollinearity, residual assumption tests, and
//! per-observation influence. Every output is a structured record; rendering
//! is up to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use lm_diagnostics::prelude::*;
//!
//! let data = Dataset::builder()
//!     .numeric("y", y)
//!     .numeric("dose", dose)
//!     .categorical("site", site)
//!     .build()?;
//! let spec = ModelSpec::new("y").covariate("dose").factor(Factor::new("site"));
//!
//! let design = build_design(&data, &spec)?;
//! let model = fit(&design)?;
//!
//! let summary = summarize(&model)?;
//! println!("R² = {:.3}", summary.r_squared);
//!
//! let report = diagnose_all(&model, &DiagnosticsOptions::default())?;
//! println!("influential rows: {:?}", report.influence.influential());
//! ```

pub mod core;
pub mod diagnostics;
pub mod inference;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        build_design, build_design_with, Dataset, DesignMatrix, DiagnosticResult,
        DiagnosticsOptions, DwAlternative, Factor, FittedModel, FullReport, InferenceReport,
        InfluenceDiagnosticsReport, MissingPolicy, ModelSpec, MulticollinearityReport,
        ResidualDiagnosticsReport, Value,
    };
    pub use crate::diagnostics::{
        analyze_multicollinearity, diagnose_all, diagnose_influence, diagnose_residuals,
        Diagnostic, DiagnosticSuite,
    };
    pub use crate::inference::summarize;
    pub use crate::solvers::{fit, OlsFitter, RegressionError, Regressor};
}

pub use crate::core::{build_design, Dataset, DiagnosticsOptions, FittedModel, ModelSpec};
pub use crate::diagnostics::{
    analyze_multicollinearity, diagnose_all, diagnose_influence, diagnose_residuals,
};
pub use crate::inference::summarize;
pub use crate::solvers::{fit, RegressionError, Result};
