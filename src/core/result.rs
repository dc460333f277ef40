//! The fitted linear model.

use super::design::DesignMatrix;
use crate::solvers::{RegressionError, Result};
use faer::{Col, Mat};

/// Result of an ordinary least-squares fit.
///
/// Created once by the fitter and immutable afterwards; every diagnostic
/// borrows it read-only, so it can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub(crate) design: DesignMatrix,
    pub(crate) coefficients: Col<f64>,
    /// (X'X)⁻¹, before scaling by σ̂².
    pub(crate) unscaled_covariance: Mat<f64>,
    pub(crate) covariance: Mat<f64>,
    pub(crate) std_errors: Col<f64>,
    pub(crate) fitted_values: Col<f64>,
    pub(crate) residuals: Col<f64>,
    pub(crate) hat_diagonal: Col<f64>,
    /// Thin orthonormal factor Q (n × p) of the design.
    pub(crate) q: Mat<f64>,
    pub(crate) df_residual: usize,
    pub(crate) rss: f64,
    pub(crate) tss: f64,
    pub(crate) sigma2: f64,
}

impl FittedModel {
    /// The design matrix the model was fit on.
    pub fn design(&self) -> &DesignMatrix {
        &self.design
    }

    /// Coefficient estimates, one per design column.
    pub fn coefficients(&self) -> &Col<f64> {
        &self.coefficients
    }

    /// Coefficient covariance matrix σ̂²(X'X)⁻¹.
    pub fn covariance(&self) -> &Mat<f64> {
        &self.covariance
    }

    /// (X'X)⁻¹ without the σ̂² factor.
    pub fn unscaled_covariance(&self) -> &Mat<f64> {
        &self.unscaled_covariance
    }

    /// Standard errors of the coefficients.
    pub fn std_errors(&self) -> &Col<f64> {
        &self.std_errors
    }

    /// Fitted values Xβ̂.
    pub fn fitted_values(&self) -> &Col<f64> {
        &self.fitted_values
    }

    /// Residuals y − Xβ̂, in design row order.
    pub fn residuals(&self) -> &Col<f64> {
        &self.residuals
    }

    /// Diagonal of the hat matrix (leverage), in design row order.
    pub fn hat_diagonal(&self) -> &Col<f64> {
        &self.hat_diagonal
    }

    /// Residual degrees of freedom n − p.
    pub fn df_residual(&self) -> usize {
        self.df_residual
    }

    /// Residual sum of squares.
    pub fn rss(&self) -> f64 {
        self.rss
    }

    /// Total sum of squares (about the mean when the model has an intercept).
    pub fn tss(&self) -> f64 {
        self.tss
    }

    /// Explained sum of squares, TSS − RSS.
    pub fn ess(&self) -> f64 {
        self.tss - self.rss
    }

    /// Residual variance estimate σ̂² = RSS / (n − p); `NaN` for an exact fit.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Number of observations (n).
    pub fn n_observations(&self) -> usize {
        self.design.n_observations()
    }

    /// Number of estimated coefficients (p).
    pub fn n_parameters(&self) -> usize {
        self.design.n_columns()
    }

    /// Column names, aligned with the coefficients.
    pub fn column_names(&self) -> &[String] {
        self.design.column_names()
    }

    /// Predict the response for rows laid out like the design matrix.
    pub fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>> {
        let p = self.n_parameters();
        if x.ncols() != p {
            return Err(RegressionError::ColumnLength {
                column: "x".to_string(),
                expected: p,
                got: x.ncols(),
            });
        }

        Ok(Col::from_fn(x.nrows(), |i| {
            (0..p).map(|j| x[(i, j)] * self.coefficients[j]).sum()
        }))
    }

    /// Project a vector onto the column space of the design: H v = Q (Q'v).
    pub(crate) fn project(&self, v: &Col<f64>) -> Col<f64> {
        let qtv = self.q.transpose() * v;
        &self.q * &qtv
    }

    /// The thin orthonormal factor of the design.
    pub(crate) fn q(&self) -> &Mat<f64> {
        &self.q
    }
}
