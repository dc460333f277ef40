//! Variance Inflation Factor (VIF) for multicollinearity detection.

use super::correlation::{continuous_covariates, spearman_matrix};
use crate::core::{
    build_design_with, ColumnVif, Dataset, DiagnosticsOptions, FittedModel, ModelSpec,
    MulticollinearityReport, TermKind, TermVif,
};
use crate::solvers::{OlsFitter, Regressor, Result};
use crate::utils::{center_columns, centered_sum_of_squares};
use faer::Mat;

/// VIF above which collinearity is usually called moderate.
pub const VIF_MODERATE: f64 = 5.0;
/// VIF above which collinearity is usually called severe.
pub const VIF_SEVERE: f64 = 10.0;

/// Compute the Variance Inflation Factor of each non-intercept design column.
///
/// VIF_j = 1 / (1 - R²_j), where R²_j comes from regressing column j on all
/// other design columns. The auxiliary regressions are not refit: for a
/// full-rank design
///
/// VIF_j = [(X'X)⁻¹]_jj · Σ(x_ij − x̄_j)²
///
/// which is read directly off the fitted model. Without an intercept the
/// auxiliary R² is uncentered and the sum of squares is Σ x_ij².
///
/// # Interpretation
/// - VIF = 1: column orthogonal to the others
/// - VIF > 5: moderate multicollinearity
/// - VIF > 10: severe multicollinearity
pub fn variance_inflation_factors(model: &FittedModel) -> Vec<ColumnVif> {
    let design = model.design();
    let x = design.x();
    let xtx_inv = model.unscaled_covariance();
    let centered = design.has_intercept();

    non_intercept_columns(model)
        .into_iter()
        .map(|j| {
            let values: Vec<f64> = (0..x.nrows()).map(|i| x[(i, j)]).collect();
            let ss = if centered {
                centered_sum_of_squares(&values)
            } else {
                values.iter().map(|v| v * v).sum()
            };
            ColumnVif {
                column: design.column_names()[j].clone(),
                vif: xtx_inv[(j, j)] * ss,
            }
        })
        .collect()
}

/// Compute the generalized VIF (Fox & Monette) of each non-intercept term.
///
/// GVIF_T = det(R_TT) · det(R_OO) / det(R), with R the cross-product of the
/// centered non-intercept columns, T the term's columns and O the rest.
/// For a single-column term this equals its VIF. GVIF^(1/(2·df)) puts terms
/// of different width on the scale of a standard-error inflation.
pub fn generalized_vifs(model: &FittedModel) -> Vec<TermVif> {
    let design = model.design();
    let columns = non_intercept_columns(model);

    let z = if design.has_intercept() {
        center_columns(design.x().as_ref()).0
    } else {
        design.x().clone()
    };

    let log_det_all = log_det_gram(&z, &columns);

    design
        .terms()
        .iter()
        .filter(|t| t.kind != TermKind::Intercept)
        .map(|term| {
            let own: Vec<usize> = term.columns.clone().collect();
            let others: Vec<usize> = columns
                .iter()
                .copied()
                .filter(|j| !term.columns.contains(j))
                .collect();

            let gvif = (log_det_gram(&z, &own) + log_det_gram(&z, &others) - log_det_all).exp();
            let df = term.df();
            TermVif {
                term: term.name.clone(),
                df,
                gvif,
                adjusted_gvif: gvif.powf(1.0 / (2.0 * df as f64)),
            }
        })
        .collect()
}

/// Spearman correlations, VIF, and GVIF of a fitted model's predictors.
pub fn multicollinearity_report(model: &FittedModel) -> MulticollinearityReport {
    let (covariates, values) = continuous_covariates(model.design());
    let vif = variance_inflation_factors(model);

    let flagged = vif.iter().filter(|v| v.vif > VIF_MODERATE).count();
    if flagged > 0 {
        log::trace!("{} design columns with VIF above {}", flagged, VIF_MODERATE);
    }

    MulticollinearityReport {
        covariates,
        pairwise_correlations: spearman_matrix(&values),
        vif,
        term_vif: generalized_vifs(model),
    }
}

/// Analyze multicollinearity among the predictors of `spec` with default options.
pub fn analyze_multicollinearity(dataset: &Dataset, spec: &ModelSpec) -> Result<MulticollinearityReport> {
    analyze_multicollinearity_with(dataset, spec, &DiagnosticsOptions::default())
}

/// Analyze multicollinearity among the predictors of `spec`.
///
/// # Errors
/// Any design construction error; in particular `RankDeficient`, naming the
/// exactly collinear columns, where a VIF would be infinite.
pub fn analyze_multicollinearity_with(
    dataset: &Dataset,
    spec: &ModelSpec,
    options: &DiagnosticsOptions,
) -> Result<MulticollinearityReport> {
    let design = build_design_with(dataset, spec, options)?;
    let model = OlsFitter::new(options.clone()).fit(&design)?;
    Ok(multicollinearity_report(&model))
}

/// Identify design columns with high multicollinearity.
///
/// Returns indices into `vif` of entries above `threshold`.
pub fn high_vif_predictors(vif: &[ColumnVif], threshold: f64) -> Vec<usize> {
    vif.iter()
        .enumerate()
        .filter(|(_, v)| v.vif > threshold)
        .map(|(i, _)| i)
        .collect()
}

fn non_intercept_columns(model: &FittedModel) -> Vec<usize> {
    model
        .design()
        .terms()
        .iter()
        .filter(|t| t.kind != TermKind::Intercept)
        .flat_map(|t| t.columns.clone())
        .collect()
}

/// ln det(Z_Sᵀ Z_S) from the R diagonal of a QR of the selected columns.
fn log_det_gram(z: &Mat<f64>, columns: &[usize]) -> f64 {
    if columns.is_empty() {
        return 0.0;
    }
    let sub = Mat::from_fn(z.nrows(), columns.len(), |i, k| z[(i, columns[k])]);
    let qr = sub.qr();
    let r = qr.R();
    (0..columns.len()).map(|k| 2.0 * r[(k, k)].abs().ln()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DesignMatrix, INTERCEPT};
    use crate::solvers::fit;
    use faer::Col;

    fn model_from(columns: Vec<Vec<f64>>) -> FittedModel {
        let n = columns[0].len();
        let p = columns.len() + 1;
        let x = Mat::from_fn(n, p, |i, j| if j == 0 { 1.0 } else { columns[j - 1][i] });
        let y = Col::from_fn(n, |i| (i as f64 * 0.7).sin());
        let mut names = vec![INTERCEPT.to_string()];
        names.extend((1..p).map(|j| format!("x{}", j)));
        fit(&DesignMatrix::new(x, y, names).unwrap()).unwrap()
    }

    /// VIF from an explicit auxiliary regression with intercept.
    fn auxiliary_vif(columns: &[Vec<f64>], j: usize) -> f64 {
        let n = columns[0].len();
        let others: Vec<&Vec<f64>> = columns
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != j)
            .map(|(_, c)| c)
            .collect();
        let x = Mat::from_fn(n, others.len() + 1, |i, k| {
            if k == 0 {
                1.0
            } else {
                others[k - 1][i]
            }
        });
        let y = Col::from_fn(n, |i| columns[j][i]);
        let mut names = vec![INTERCEPT.to_string()];
        names.extend((0..others.len()).map(|k| format!("o{}", k)));
        let aux = fit(&DesignMatrix::new(x, y, names).unwrap()).unwrap();
        let r2 = 1.0 - aux.rss() / aux.tss();
        1.0 / (1.0 - r2)
    }

    #[test]
    fn test_vif_orthogonal_predictors() {
        // Centered, mutually orthogonal sign patterns
        let a: Vec<f64> = (0..16).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let b: Vec<f64> = (0..16).map(|i| if (i / 2) % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let model = model_from(vec![a, b]);

        for v in variance_inflation_factors(&model) {
            assert!((v.vif - 1.0).abs() < 1e-10, "{} = {}", v.column, v.vif);
        }
    }

    #[test]
    fn test_vif_matches_auxiliary_regression() {
        let a: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..30).map(|i| i as f64 * 0.5 + ((i * 7) % 5) as f64).collect();
        let c: Vec<f64> = (0..30).map(|i| ((i * 13) % 11) as f64).collect();
        let columns = vec![a, b, c];
        let model = model_from(columns.clone());

        let vif = variance_inflation_factors(&model);
        for (j, v) in vif.iter().enumerate() {
            let expected = auxiliary_vif(&columns, j);
            assert!((v.vif - expected).abs() < 1e-8 * expected, "{}", v.column);
        }
        assert!(vif[0].vif > 1.5);
    }

    #[test]
    fn test_gvif_single_column_equals_vif() {
        let a: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..25).map(|i| (i as f64).sqrt() + ((i * 3) % 4) as f64).collect();
        let model = model_from(vec![a, b]);

        let vif = variance_inflation_factors(&model);
        let gvif = generalized_vifs(&model);
        assert_eq!(gvif.len(), 2);
        for (v, g) in vif.iter().zip(&gvif) {
            assert_eq!(g.df, 1);
            assert!((v.vif - g.gvif).abs() < 1e-8 * v.vif);
            assert!((g.adjusted_gvif - g.gvif.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_high_vif_predictors() {
        let vif = vec![
            ColumnVif {
                column: "a".into(),
                vif: 1.0,
            },
            ColumnVif {
                column: "b".into(),
                vif: 7.0,
            },
            ColumnVif {
                column: "c".into(),
                vif: 15.0,
            },
        ];
        assert_eq!(high_vif_predictors(&vif, VIF_MODERATE), vec![1, 2]);
        assert_eq!(high_vif_predictors(&vif, VIF_SEVERE), vec![2]);
    }
}
