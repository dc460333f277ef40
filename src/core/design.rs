//! Design matrix construction from a dataset and a model specification.
//!
//! The design has an intercept column, one column per continuous covariate,
//! and `levels - 1` indicator columns per factor (reference coding: rows at
//! the reference level are zero across the factor's indicators).

use super::dataset::{Dataset, ModelSpec, Value};
use super::options::{DiagnosticsOptions, MissingPolicy};
use crate::solvers::{check_full_rank, RegressionError, Result};
use faer::{Col, Mat};
use std::collections::BTreeSet;
use std::ops::Range;

/// Name of the intercept column.
pub const INTERCEPT: &str = "(Intercept)";

/// What a model term contributes to the design.
#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// The all-ones column.
    Intercept,
    /// A single continuous column.
    Covariate,
    /// Indicator columns for every non-reference level.
    Factor {
        /// All levels, reference included, in column order.
        levels: Vec<String>,
        /// The level coded as all zeros.
        reference: String,
    },
}

/// A model term and the design columns it occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Variable name (or [`INTERCEPT`]).
    pub name: String,
    /// How the term is encoded.
    pub kind: TermKind,
    /// Half-open range of design column indices.
    pub columns: Range<usize>,
}

impl Term {
    /// Number of design columns (degrees of freedom) for this term.
    pub fn df(&self) -> usize {
        self.columns.len()
    }
}

/// Why a row was left out of the design.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// The row had no usable value for this variable.
    MissingValue { variable: String },
}

/// A dataset row excluded from the design.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    /// Index of the row in the original dataset.
    pub row: usize,
    /// Why it was dropped.
    pub reason: DropReason,
}

/// Numeric design matrix, response vector, and naming metadata.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    x: Mat<f64>,
    y: Col<f64>,
    column_names: Vec<String>,
    terms: Vec<Term>,
    response: String,
    retained_rows: Vec<usize>,
    dropped_rows: Vec<DroppedRow>,
}

impl DesignMatrix {
    /// Wrap a prepared matrix. Each column becomes its own term; a column named
    /// [`INTERCEPT`] is treated as the intercept.
    pub fn new(x: Mat<f64>, y: Col<f64>, column_names: Vec<String>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }
        if column_names.len() != x.ncols() {
            return Err(RegressionError::ColumnLength {
                column: "column_names".to_string(),
                expected: x.ncols(),
                got: column_names.len(),
            });
        }

        let terms = column_names
            .iter()
            .enumerate()
            .map(|(j, name)| Term {
                name: name.clone(),
                kind: if name == INTERCEPT {
                    TermKind::Intercept
                } else {
                    TermKind::Covariate
                },
                columns: j..j + 1,
            })
            .collect();

        let n = x.nrows();
        Ok(Self {
            x,
            y,
            column_names,
            terms,
            response: "y".to_string(),
            retained_rows: (0..n).collect(),
            dropped_rows: Vec::new(),
        })
    }

    /// The n × p design matrix.
    pub fn x(&self) -> &Mat<f64> {
        &self.x
    }

    /// The response vector of length n.
    pub fn y(&self) -> &Col<f64> {
        &self.y
    }

    /// Column names, one per design column.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Model terms and their column ranges.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Response variable name.
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Number of retained observations (n).
    pub fn n_observations(&self) -> usize {
        self.x.nrows()
    }

    /// Number of design columns (p).
    pub fn n_columns(&self) -> usize {
        self.x.ncols()
    }

    /// Whether an intercept column is present.
    pub fn has_intercept(&self) -> bool {
        self.terms.iter().any(|t| t.kind == TermKind::Intercept)
    }

    /// Original dataset indices of the retained rows, in order.
    pub fn retained_rows(&self) -> &[usize] {
        &self.retained_rows
    }

    /// Rows excluded during construction.
    pub fn dropped_rows(&self) -> &[DroppedRow] {
        &self.dropped_rows
    }

    /// Number of rows excluded during construction.
    pub fn n_dropped(&self) -> usize {
        self.dropped_rows.len()
    }

    /// Extract a single design column.
    pub fn column(&self, j: usize) -> Col<f64> {
        Col::from_fn(self.x.nrows(), |i| self.x[(i, j)])
    }
}

/// Build a design matrix with default options.
pub fn build_design(dataset: &Dataset, spec: &ModelSpec) -> Result<DesignMatrix> {
    build_design_with(dataset, spec, &DiagnosticsOptions::default())
}

/// Build a design matrix.
///
/// # Errors
/// - `UnknownVariable` if `spec` names a variable no row provides
/// - `VariableType` if a numeric variable holds a level or vice versa
/// - `MissingValue` under `MissingPolicy::Fail`
/// - `UnknownLevel` for levels outside a factor's declared set
/// - `InsufficientData` if the retained rows do not exceed the column count
/// - `RankDeficient` if any columns are exactly collinear
pub fn build_design_with(
    dataset: &Dataset,
    spec: &ModelSpec,
    options: &DiagnosticsOptions,
) -> Result<DesignMatrix> {
    options.validate()?;

    if dataset.is_empty() {
        return Err(RegressionError::InsufficientData { needed: 1, got: 0 });
    }

    for variable in spec.variables() {
        if !dataset.has_variable(variable) {
            return Err(RegressionError::UnknownVariable(variable.to_string()));
        }
    }

    let (retained_rows, dropped_rows) = select_rows(dataset, spec, options.missing_policy)?;
    if !dropped_rows.is_empty() {
        log::trace!(
            "dropped {} of {} rows with missing values",
            dropped_rows.len(),
            dataset.len()
        );
    }

    // Resolve factor levels against the retained rows
    let mut factor_levels = Vec::with_capacity(spec.factors.len());
    for factor in &spec.factors {
        let observed: BTreeSet<String> = retained_rows
            .iter()
            .map(|&row| categorical_value(dataset, row, &factor.name))
            .collect::<Result<_>>()?;

        let levels = match &factor.levels {
            Some(declared) => {
                if let Some(level) = observed.iter().find(|l| !declared.contains(*l)) {
                    return Err(RegressionError::UnknownLevel {
                        factor: factor.name.clone(),
                        level: level.clone(),
                    });
                }
                declared.clone()
            }
            None => observed.into_iter().collect(),
        };

        let reference = match &factor.reference {
            Some(r) if levels.contains(r) => r.clone(),
            Some(r) => {
                return Err(RegressionError::UnknownLevel {
                    factor: factor.name.clone(),
                    level: r.clone(),
                })
            }
            None => levels.first().cloned().unwrap_or_default(),
        };

        factor_levels.push((levels, reference));
    }

    // Lay out terms
    let mut terms = vec![Term {
        name: INTERCEPT.to_string(),
        kind: TermKind::Intercept,
        columns: 0..1,
    }];
    let mut column_names = vec![INTERCEPT.to_string()];

    for name in &spec.covariates {
        let start = column_names.len();
        column_names.push(name.clone());
        terms.push(Term {
            name: name.clone(),
            kind: TermKind::Covariate,
            columns: start..start + 1,
        });
    }

    for (factor, (levels, reference)) in spec.factors.iter().zip(&factor_levels) {
        let start = column_names.len();
        for level in levels.iter().filter(|l| *l != reference) {
            column_names.push(format!("{}[T.{}]", factor.name, level));
        }
        terms.push(Term {
            name: factor.name.clone(),
            kind: TermKind::Factor {
                levels: levels.clone(),
                reference: reference.clone(),
            },
            columns: start..column_names.len(),
        });
    }

    let n = retained_rows.len();
    let p = column_names.len();
    if n <= p {
        return Err(RegressionError::InsufficientData { needed: p, got: n });
    }

    let mut x = Mat::zeros(n, p);
    let mut y = Col::zeros(n);

    for (i, &row) in retained_rows.iter().enumerate() {
        y[i] = numeric_value(dataset, row, &spec.response)?;
        x[(i, 0)] = 1.0;

        for (k, name) in spec.covariates.iter().enumerate() {
            x[(i, 1 + k)] = numeric_value(dataset, row, name)?;
        }

        for (term, (levels, reference)) in terms
            .iter()
            .filter(|t| matches!(t.kind, TermKind::Factor { .. }))
            .zip(&factor_levels)
        {
            let level = categorical_value(dataset, row, &term.name)?;
            if level != *reference {
                let offset = levels
                    .iter()
                    .filter(|l| *l != reference)
                    .position(|l| *l == level)
                    .ok_or_else(|| RegressionError::UnknownLevel {
                        factor: term.name.clone(),
                        level: level.clone(),
                    })?;
                x[(i, term.columns.start + offset)] = 1.0;
            }
        }
    }

    check_full_rank(&x, &column_names, options.rank_tolerance)?;

    log::trace!("built design: n = {}, p = {}", n, p);

    Ok(DesignMatrix {
        x,
        y,
        column_names,
        terms,
        response: spec.response.clone(),
        retained_rows,
        dropped_rows,
    })
}

/// Partition rows into retained and dropped according to the missing policy.
fn select_rows(
    dataset: &Dataset,
    spec: &ModelSpec,
    policy: MissingPolicy,
) -> Result<(Vec<usize>, Vec<DroppedRow>)> {
    let mut retained = Vec::with_capacity(dataset.len());
    let mut dropped = Vec::new();

    for row in 0..dataset.len() {
        let missing = spec
            .variables()
            .find(|v| dataset.get(row, v).map_or(true, Value::is_missing));

        match (missing, policy) {
            (None, _) => retained.push(row),
            (Some(variable), MissingPolicy::Omit) => dropped.push(DroppedRow {
                row,
                reason: DropReason::MissingValue {
                    variable: variable.to_string(),
                },
            }),
            (Some(variable), MissingPolicy::Fail) => {
                return Err(RegressionError::MissingValue {
                    variable: variable.to_string(),
                    row,
                })
            }
        }
    }

    Ok((retained, dropped))
}

fn numeric_value(dataset: &Dataset, row: usize, variable: &str) -> Result<f64> {
    match dataset.get(row, variable) {
        Some(Value::Numeric(v)) if v.is_finite() => Ok(*v),
        Some(Value::Categorical(_)) => Err(RegressionError::VariableType {
            variable: variable.to_string(),
            expected: "numeric",
        }),
        _ => Err(RegressionError::MissingValue {
            variable: variable.to_string(),
            row,
        }),
    }
}

fn categorical_value(dataset: &Dataset, row: usize, variable: &str) -> Result<String> {
    match dataset.get(row, variable) {
        Some(Value::Categorical(level)) => Ok(level.clone()),
        Some(Value::Numeric(v)) if v.is_finite() => Err(RegressionError::VariableType {
            variable: variable.to_string(),
            expected: "categorical",
        }),
        _ => Err(RegressionError::MissingValue {
            variable: variable.to_string(),
            row,
        }),
    }
}
