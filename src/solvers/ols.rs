//! Ordinary Least Squares fitter.

use crate::core::{DesignMatrix, DiagnosticsOptions, FittedModel};
use crate::solvers::traits::{RegressionError, Regressor, Result};
use crate::utils::{back_substitute, centered_sum_of_squares, invert_upper_triangular};
use faer::{Col, Mat};
use std::collections::BTreeSet;

/// Ordinary Least Squares estimator.
///
/// Solves the least-squares problem through a Householder QR factorization
/// X = QR instead of inverting X'X. The thin factor Q (n × p) is kept on the
/// fitted model so leverage and auxiliary projections never materialize the
/// n × n hat matrix.
///
/// Rank-deficient designs are rejected with [`RegressionError::RankDeficient`]
/// naming the dependent columns; no term is silently dropped.
///
/// # Example
///
/// ```rust,ignore
/// use lm_diagnostics::solvers::{OlsFitter, Regressor};
///
/// let fitted = OlsFitter::default().fit(&design)?;
/// println!("RSS = {}", fitted.rss());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OlsFitter {
    options: DiagnosticsOptions,
}

impl OlsFitter {
    /// Create a new fitter with the given options.
    pub fn new(options: DiagnosticsOptions) -> Self {
        Self { options }
    }

    /// Get the options used by this fitter.
    pub fn options(&self) -> &DiagnosticsOptions {
        &self.options
    }
}

impl Regressor for OlsFitter {
    fn fit(&self, design: &DesignMatrix) -> Result<FittedModel> {
        self.options.validate()?;

        let x = design.x();
        let y = design.y();
        let n = x.nrows();
        let p = x.ncols();

        let (q, r) = factorize(x, design.column_names(), self.options.rank_tolerance)?;
        if (0..n).any(|i| !y[i].is_finite()) {
            return Err(RegressionError::DegenerateModel(
                "response contains non-finite values".to_string(),
            ));
        }

        // Solve R β = Q'y
        let qty = q.transpose() * y;
        let qty: Vec<f64> = (0..p).map(|j| qty[j]).collect();
        let beta = back_substitute(r.as_ref(), &qty);
        let coefficients = Col::from_fn(p, |j| beta[j]);

        let fitted_values = Col::from_fn(n, |i| (0..p).map(|j| x[(i, j)] * beta[j]).sum());
        let residuals = Col::from_fn(n, |i| y[i] - fitted_values[i]);
        let rss: f64 = residuals.iter().map(|e: &f64| e.powi(2)).sum();

        let tss = if design.has_intercept() {
            let y_values: Vec<f64> = (0..n).map(|i| y[i]).collect();
            centered_sum_of_squares(&y_values)
        } else {
            y.iter().map(|&yi| yi.powi(2)).sum()
        };

        // Leverage: squared norm of each row of Q
        let hat_diagonal = Col::from_fn(n, |i| (0..p).map(|j| q[(i, j)].powi(2)).sum());

        // (X'X)⁻¹ = R⁻¹ R⁻ᵀ
        let r_inv = invert_upper_triangular(r.as_ref(), p);
        let unscaled_covariance = &r_inv * r_inv.transpose();

        let df_residual = n - p;
        let sigma2 = if df_residual > 0 {
            rss / df_residual as f64
        } else {
            f64::NAN
        };

        let covariance = Mat::from_fn(p, p, |i, j| unscaled_covariance[(i, j)] * sigma2);
        let std_errors = Col::from_fn(p, |j| {
            let var = covariance[(j, j)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        });

        log::trace!(
            "ols fit: n = {}, p = {}, rss = {:.6e}, df = {}",
            n,
            p,
            rss,
            df_residual
        );

        Ok(FittedModel {
            design: design.clone(),
            coefficients,
            unscaled_covariance,
            covariance,
            std_errors,
            fitted_values,
            residuals,
            hat_diagonal,
            q,
            df_residual,
            rss,
            tss,
            sigma2,
        })
    }
}

/// Fit a design matrix with default options.
pub fn fit(design: &DesignMatrix) -> Result<FittedModel> {
    OlsFitter::default().fit(design)
}

/// Verify that `x` has full column rank, naming the dependent columns if not.
pub fn check_full_rank(x: &Mat<f64>, column_names: &[String], rank_tolerance: f64) -> Result<()> {
    factorize(x, column_names, rank_tolerance).map(|_| ())
}

/// QR-factorize `x`, returning the thin Q (n × p) and the p × p upper triangle R.
///
/// The rank check runs on `x` with every column scaled to unit length, so it
/// does not depend on the units of the columns. With an unpivoted Householder
/// QR, |R_jj| is then the distance of unit column j from the span of the
/// columns before it, and a pivot below `rank_tolerance * max |R_kk|` marks
/// column j as dependent. Scaling leaves Q unchanged; R is rescaled on return.
fn factorize(
    x: &Mat<f64>,
    column_names: &[String],
    rank_tolerance: f64,
) -> Result<(Mat<f64>, Mat<f64>)> {
    let n = x.nrows();
    let p = x.ncols();

    if p == 0 {
        return Err(RegressionError::DegenerateModel(
            "design matrix has no columns".to_string(),
        ));
    }
    if n < p {
        return Err(RegressionError::InsufficientData { needed: p, got: n });
    }
    if (0..p).any(|j| (0..n).any(|i| !x[(i, j)].is_finite())) {
        return Err(RegressionError::DegenerateModel(
            "design matrix contains non-finite values".to_string(),
        ));
    }

    let scales: Vec<f64> = (0..p).map(|j| column_scale(x, j)).collect();
    let scaled = Mat::from_fn(n, p, |i, j| x[(i, j)] / scales[j]);

    let qr = scaled.qr();
    let r_unit = qr.R();

    let pivots: Vec<f64> = (0..p).map(|j| r_unit[(j, j)].abs()).collect();
    if pivots.iter().any(|v| !v.is_finite()) {
        return Err(RegressionError::DegenerateModel(
            "QR factorization produced non-finite pivots".to_string(),
        ));
    }
    let max_pivot = pivots.iter().copied().fold(0.0, f64::max);
    let cutoff = rank_tolerance * max_pivot;

    let deficient: Vec<usize> = (0..p).filter(|&j| pivots[j] <= cutoff).collect();

    if !deficient.is_empty() {
        let independent: Vec<usize> = (0..p).filter(|j| !deficient.contains(j)).collect();
        let mut implicated = BTreeSet::new();

        for &j in &deficient {
            implicated.insert(j);
            let basis: Vec<usize> = independent.iter().copied().filter(|&k| k < j).collect();
            implicated.extend(dependency_partners(x, &basis, j));
        }

        let columns: Vec<String> = implicated
            .into_iter()
            .map(|j| column_names.get(j).cloned().unwrap_or_else(|| format!("column {}", j)))
            .collect();

        log::trace!("rank deficient design; dependent columns: {:?}", columns);
        return Err(RegressionError::RankDeficient { columns });
    }

    // X = Q (R_unit D) with D the column scales
    let r = Mat::from_fn(p, p, |i, j| if i <= j { r_unit[(i, j)] * scales[j] } else { 0.0 });

    Ok((qr.compute_thin_Q(), r))
}

/// Euclidean norm of column `j`, or 1 for an all-zero column.
fn column_scale(x: &Mat<f64>, j: usize) -> f64 {
    let n = x.nrows();
    let largest = (0..n).map(|i| x[(i, j)].abs()).fold(0.0, f64::max);
    if largest == 0.0 {
        return 1.0;
    }
    let sum_sq: f64 = (0..n).map(|i| (x[(i, j)] / largest).powi(2)).sum();
    largest * sum_sq.sqrt()
}

/// Columns of `basis` that carry a non-negligible weight when column `target`
/// is regressed on them.
fn dependency_partners(x: &Mat<f64>, basis: &[usize], target: usize) -> Vec<usize> {
    if basis.is_empty() {
        return Vec::new();
    }

    let n = x.nrows();
    let m = basis.len();
    let sub = Mat::from_fn(n, m, |i, k| x[(i, basis[k])]);
    let t = Col::from_fn(n, |i| x[(i, target)]);

    let qr = sub.qr();
    let q = qr.compute_thin_Q();
    let r = qr.R();

    let qtt = q.transpose() * &t;
    let rhs: Vec<f64> = (0..m).map(|k| qtt[k]).collect();
    let weights = back_substitute(r, &rhs);

    let column_norm = |j: usize| (0..n).map(|i| x[(i, j)].powi(2)).sum::<f64>().sqrt();
    let target_norm = column_norm(target);

    basis
        .iter()
        .zip(weights)
        .filter(|&(&k, w)| w.is_finite() && w.abs() * column_norm(k) > 1e-8 * target_norm)
        .map(|(&k, _)| k)
        .collect()
}
