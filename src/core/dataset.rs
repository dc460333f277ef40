//! Tabular input data and the model specification over it.
//!
//! A [`Dataset`] is an ordered list of observations, each mapping a variable
//! name to a [`Value`]. A [`ModelSpec`] names the response, the continuous
//! covariates, and the categorical factors to draw from it. Neither is
//! mutated by anything in this crate.
//!
//! # Example
//!
//! ```
//! use lm_diagnostics::core::{Dataset, Factor, ModelSpec};
//!
//! let data = Dataset::builder()
//!     .numeric("y", vec![1.0, 2.0, 3.5, 4.0])
//!     .numeric("x", vec![0.5, 1.0, 1.5, 2.0])
//!     .categorical("site", vec!["a", "b", "a", "b"])
//!     .build()
//!     .unwrap();
//!
//! let spec = ModelSpec::new("y").covariate("x").factor(Factor::new("site"));
//! assert_eq!(data.len(), 4);
//! assert_eq!(spec.variables().count(), 3);
//! ```

use crate::solvers::{RegressionError, Result};
use std::collections::BTreeMap;

/// A single cell of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A continuous value. `NaN` and `±inf` are treated as missing.
    Numeric(f64),
    /// A categorical level.
    Categorical(String),
    /// An explicitly missing value.
    Missing,
}

impl Value {
    /// Whether this cell counts as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Numeric(v) => !v.is_finite(),
            Value::Categorical(_) => false,
            Value::Missing => true,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(level: &str) -> Self {
        Value::Categorical(level.to_string())
    }
}

impl From<String> for Value {
    fn from(level: String) -> Self {
        Value::Categorical(level)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

/// One row: variable name to value. Absent keys count as missing.
pub type Observation = BTreeMap<String, Value>;

/// An ordered sequence of observations.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Observation>,
}

impl Dataset {
    /// Wrap a set of rows.
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    /// Create a column-oriented builder.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in their original order.
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// The value of `variable` in `row`, if present.
    pub fn get(&self, row: usize, variable: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|obs| obs.get(variable))
    }

    /// Whether any row mentions `variable`.
    pub fn has_variable(&self, variable: &str) -> bool {
        self.rows.iter().any(|obs| obs.contains_key(variable))
    }
}

/// Column-oriented construction of a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    columns: Vec<(String, Vec<Value>)>,
}

impl DatasetBuilder {
    /// Add a continuous column. `NaN` entries are missing.
    pub fn numeric(mut self, name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        self.columns.push((
            name.into(),
            values.into_iter().map(Value::Numeric).collect(),
        ));
        self
    }

    /// Add a categorical column.
    pub fn categorical<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        levels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.columns.push((
            name.into(),
            levels
                .into_iter()
                .map(|level| Value::Categorical(level.into()))
                .collect(),
        ));
        self
    }

    /// Add a column of arbitrary values (may mix in `Value::Missing`).
    pub fn column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    /// Assemble rows. All columns must have the same length.
    pub fn build(self) -> Result<Dataset> {
        let n = self.columns.first().map_or(0, |(_, v)| v.len());

        for (name, values) in &self.columns {
            if values.len() != n {
                return Err(RegressionError::ColumnLength {
                    column: name.clone(),
                    expected: n,
                    got: values.len(),
                });
            }
        }

        let mut rows = vec![Observation::new(); n];
        for (name, values) in self.columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(name.clone(), value);
            }
        }

        Ok(Dataset { rows })
    }
}

/// A categorical predictor and its reference coding.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    /// Variable name in the dataset.
    pub name: String,
    /// Declared levels, or `None` to use the sorted observed levels.
    pub levels: Option<Vec<String>>,
    /// Reference level, or `None` to use the first level.
    pub reference: Option<String>,
}

impl Factor {
    /// A factor whose levels are inferred from the data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: None,
            reference: None,
        }
    }

    /// A factor with explicit levels and reference level.
    pub fn with_levels<S: Into<String>>(
        name: impl Into<String>,
        levels: impl IntoIterator<Item = S>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            levels: Some(levels.into_iter().map(Into::into).collect()),
            reference: Some(reference.into()),
        }
    }

    /// Keep inferred levels but choose the reference level.
    pub fn reference(mut self, level: impl Into<String>) -> Self {
        self.reference = Some(level.into());
        self
    }
}

/// Which variables a linear model uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    /// Response variable.
    pub response: String,
    /// Continuous covariates, in design order.
    pub covariates: Vec<String>,
    /// Categorical factors, in design order after the covariates.
    pub factors: Vec<Factor>,
}

impl ModelSpec {
    /// A model with only an intercept.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            covariates: Vec::new(),
            factors: Vec::new(),
        }
    }

    /// Add a continuous covariate.
    pub fn covariate(mut self, name: impl Into<String>) -> Self {
        self.covariates.push(name.into());
        self
    }

    /// Add a categorical factor.
    pub fn factor(mut self, factor: Factor) -> Self {
        self.factors.push(factor);
        self
    }

    /// Every variable the model references: response, covariates, factors.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.response.as_str())
            .chain(self.covariates.iter().map(String::as_str))
            .chain(self.factors.iter().map(|f| f.name.as_str()))
    }
}
