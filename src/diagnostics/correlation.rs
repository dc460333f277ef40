//! Rank correlation among continuous covariates.

use crate::core::{DesignMatrix, TermKind};
use crate::utils::{average_ranks, pearson_correlation};
use faer::Mat;

/// Spearman rank correlation of two equally long samples.
///
/// Ties receive average ranks. `NaN` if either sample is constant.
pub fn spearman_correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return f64::NAN;
    }
    pearson_correlation(&average_ranks(a), &average_ranks(b))
}

/// Symmetric Spearman correlation matrix with a unit diagonal.
pub fn spearman_matrix(columns: &[Vec<f64>]) -> Mat<f64> {
    let k = columns.len();
    let ranks: Vec<Vec<f64>> = columns.iter().map(|c| average_ranks(c)).collect();

    let mut corr = Mat::zeros(k, k);
    for i in 0..k {
        corr[(i, i)] = 1.0;
        for j in (i + 1)..k {
            let r = pearson_correlation(&ranks[i], &ranks[j]);
            corr[(i, j)] = r;
            corr[(j, i)] = r;
        }
    }
    corr
}

/// Names and values of the continuous covariates of a design, in term order.
pub(crate) fn continuous_covariates(design: &DesignMatrix) -> (Vec<String>, Vec<Vec<f64>>) {
    design
        .terms()
        .iter()
        .filter(|t| t.kind == TermKind::Covariate)
        .map(|t| {
            let j = t.columns.start;
            let values = design.column(j).iter().copied().collect();
            (t.name.clone(), values)
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_relation_is_perfect() {
        let a: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let b: Vec<f64> = a.iter().map(|v| v.powi(3)).collect();
        assert!((spearman_correlation(&a, &b) - 1.0).abs() < 1e-12);

        let c: Vec<f64> = a.iter().map(|v| -v.exp()).collect();
        assert!((spearman_correlation(&a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_use_average_ranks() {
        // Ranks: a = [1, 2, 3, 4], b = [1.5, 1.5, 3, 4]
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 5.0, 6.0, 7.0];
        let expected = pearson_correlation(&[1.0, 2.0, 3.0, 4.0], &[1.5, 1.5, 3.0, 4.0]);
        assert!((spearman_correlation(&a, &b) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_nan() {
        assert!(spearman_correlation(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).is_nan());
    }

    #[test]
    fn test_matrix_symmetric_unit_diagonal() {
        let cols = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 1.0, 4.0, 3.0, 5.0],
            vec![5.0, 4.0, 3.0, 2.0, 1.0],
        ];
        let m = spearman_matrix(&cols);
        for i in 0..3 {
            assert_eq!(m[(i, i)], 1.0);
            for j in 0..3 {
                assert_eq!(m[(i, j)], m[(j, i)]);
            }
        }
        assert!((m[(0, 2)] + 1.0).abs() < 1e-12);
        assert!((m[(0, 1)] - 0.8).abs() < 1e-12);
    }
}
