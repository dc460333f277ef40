//! Pluggable diagnostics and the combined report.

use super::autocorrelation::durbin_watson;
use super::heteroscedasticity::breusch_pagan;
use super::influence::diagnose_influence;
use super::normality::shapiro_wilk;
use super::residuals::diagnose_residuals_with;
use crate::core::{DiagnosticResult, DiagnosticsOptions, DwAlternative, FittedModel, FullReport};
use crate::inference::{omnibus_f_test, summarize_with};
use crate::solvers::Result;
use rayon::prelude::*;

/// A hypothesis test that runs against a fitted model.
///
/// Implementations only read the model, so a suite can run them on any
/// number of threads.
pub trait Diagnostic: Send + Sync {
    /// Short display name.
    fn name(&self) -> &'static str;

    /// Run the test.
    fn run(&self, model: &FittedModel) -> Result<DiagnosticResult>;
}

/// Omnibus ANOVA F-test.
#[derive(Debug, Clone, Copy)]
pub struct OmnibusFTest {
    pub significance_level: f64,
}

/// Durbin-Watson autocorrelation test.
#[derive(Debug, Clone, Copy)]
pub struct DurbinWatson {
    pub alternative: DwAlternative,
    pub significance_level: f64,
}

/// Studentized Breusch-Pagan heteroscedasticity test.
#[derive(Debug, Clone, Copy)]
pub struct BreuschPagan {
    pub significance_level: f64,
}

/// Shapiro-Wilk normality test on the residuals.
#[derive(Debug, Clone, Copy)]
pub struct ShapiroWilk {
    pub significance_level: f64,
}

impl Default for OmnibusFTest {
    fn default() -> Self {
        Self {
            significance_level: DiagnosticsOptions::default().significance_level,
        }
    }
}

impl Default for DurbinWatson {
    fn default() -> Self {
        let options = DiagnosticsOptions::default();
        Self {
            alternative: options.dw_alternative,
            significance_level: options.significance_level,
        }
    }
}

impl Default for BreuschPagan {
    fn default() -> Self {
        Self {
            significance_level: DiagnosticsOptions::default().significance_level,
        }
    }
}

impl Default for ShapiroWilk {
    fn default() -> Self {
        Self {
            significance_level: DiagnosticsOptions::default().significance_level,
        }
    }
}

impl Diagnostic for OmnibusFTest {
    fn name(&self) -> &'static str {
        "F-test"
    }

    fn run(&self, model: &FittedModel) -> Result<DiagnosticResult> {
        omnibus_f_test(model, self.significance_level)
    }
}

impl Diagnostic for DurbinWatson {
    fn name(&self) -> &'static str {
        "Durbin-Watson"
    }

    fn run(&self, model: &FittedModel) -> Result<DiagnosticResult> {
        durbin_watson(model, self.alternative, self.significance_level)
    }
}

impl Diagnostic for BreuschPagan {
    fn name(&self) -> &'static str {
        "Breusch-Pagan"
    }

    fn run(&self, model: &FittedModel) -> Result<DiagnosticResult> {
        breusch_pagan(model, self.significance_level)
    }
}

impl Diagnostic for ShapiroWilk {
    fn name(&self) -> &'static str {
        "Shapiro-Wilk"
    }

    fn run(&self, model: &FittedModel) -> Result<DiagnosticResult> {
        let residuals: Vec<f64> = model.residuals().iter().copied().collect();
        shapiro_wilk(&residuals, self.significance_level)
    }
}

/// An ordered collection of diagnostics run against one model.
///
/// # Example
///
/// ```rust,ignore
/// use lm_diagnostics::diagnostics::{BreuschPagan, DiagnosticSuite};
///
/// let suite = DiagnosticSuite::new().with(BreuschPagan { significance_level: 0.01 });
/// for (name, result) in suite.names().into_iter().zip(suite.run(&model)) {
///     println!("{}: {:?}", name, result);
/// }
/// ```
#[derive(Default)]
pub struct DiagnosticSuite {
    diagnostics: Vec<Box<dyn Diagnostic>>,
}

impl DiagnosticSuite {
    /// Create an empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// The F-test and the three residual tests, configured from `options`.
    pub fn standard(options: &DiagnosticsOptions) -> Self {
        let alpha = options.significance_level;
        Self::new()
            .with(OmnibusFTest {
                significance_level: alpha,
            })
            .with(DurbinWatson {
                alternative: options.dw_alternative,
                significance_level: alpha,
            })
            .with(BreuschPagan {
                significance_level: alpha,
            })
            .with(ShapiroWilk {
                significance_level: alpha,
            })
    }

    /// Append a diagnostic.
    pub fn with(mut self, diagnostic: impl Diagnostic + 'static) -> Self {
        self.diagnostics.push(Box::new(diagnostic));
        self
    }

    /// Append a boxed diagnostic.
    pub fn push(&mut self, diagnostic: Box<dyn Diagnostic>) {
        self.diagnostics.push(diagnostic);
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.diagnostics.iter().map(|d| d.name()).collect()
    }

    /// Number of registered diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether no diagnostics are registered.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Run every diagnostic in order. One failing test does not stop the others.
    pub fn run(&self, model: &FittedModel) -> Vec<Result<DiagnosticResult>> {
        self.diagnostics.iter().map(|d| d.run(model)).collect()
    }

    /// Run every diagnostic on the rayon pool; results keep registration order.
    pub fn run_parallel(&self, model: &FittedModel) -> Vec<Result<DiagnosticResult>> {
        self.diagnostics.par_iter().map(|d| d.run(model)).collect()
    }
}

/// Inference, residual tests, and influence measures for one model.
///
/// The three parts are independent reads of the model and run concurrently.
///
/// # Errors
/// The first error from inference or the residual tests.
pub fn diagnose_all(model: &FittedModel, options: &DiagnosticsOptions) -> Result<FullReport> {
    options.validate()?;

    let (inference, (residuals, influence)) = rayon::join(
        || summarize_with(model, options),
        || {
            rayon::join(
                || diagnose_residuals_with(model, options),
                || diagnose_influence(model),
            )
        },
    );

    Ok(FullReport {
        inference: inference?,
        residuals: residuals?,
        influence,
    })
}
