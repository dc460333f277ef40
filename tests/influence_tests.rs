//! Influence diagnostics integration tests.

mod common;

use approx::assert_relative_eq;
use common::{design_from_columns, design_without_row, normal_draws, uniform_draws};
use lm_diagnostics::core::DiagnosticsOptions;
use lm_diagnostics::diagnostics::{
    diagnose_all, diagnose_influence, DiagnosticSuite, COOKS_DISTANCE_CONVENTIONAL,
};
use lm_diagnostics::solvers::fit;

fn three_parameter_design(n: usize, seed: u64) -> lm_diagnostics::core::DesignMatrix {
    let x1 = uniform_draws(n, 0.0, 4.0, seed);
    let x2 = normal_draws(n, seed + 1);
    let noise = normal_draws(n, seed + 2);
    let y: Vec<f64> = (0..n).map(|i| 1.0 + 0.8 * x1[i] - 1.2 * x2[i] + noise[i]).collect();
    design_from_columns(&[x1, x2], y)
}

#[test]
fn test_closed_forms_match_leave_one_out_refits() {
    let n = 20;
    let p = 3;
    let design = three_parameter_design(n, 5);
    let model = fit(&design).unwrap();
    let report = diagnose_influence(&model);

    for i in 0..n {
        let reduced = fit(&design_without_row(&design, i)).unwrap();
        let loo_fitted = reduced.predict(design.x()).unwrap();
        let s_loo = reduced.sigma2().sqrt();
        let h = model.hat_diagonal()[i];

        // Cook's distance: Σ_j (ŷ_j − ŷ_j(i))² / (p σ̂²)
        let shift: f64 = (0..n)
            .map(|j| (model.fitted_values()[j] - loo_fitted[j]).powi(2))
            .sum();
        let cooks = shift / (p as f64 * model.sigma2());
        assert_relative_eq!(report.cooks_distance[i], cooks, epsilon = 1e-6, max_relative = 1e-6);

        // Externally studentized residual with the deleted-fit variance
        let t = model.residuals()[i] / (s_loo * (1.0 - h).sqrt());
        assert_relative_eq!(report.studentized_residuals[i], t, epsilon = 1e-6, max_relative = 1e-6);

        // DFFITS: scaled change in the observation's own fitted value
        let dffits = (model.fitted_values()[i] - loo_fitted[i]) / (s_loo * h.sqrt());
        assert_relative_eq!(report.dffits[i], dffits, epsilon = 1e-6, max_relative = 1e-6);
    }
}

#[test]
fn test_planted_outlier_is_flagged() {
    let n = 40;
    let x = uniform_draws(n, 0.0, 10.0, 71);
    let noise = normal_draws(n, 72);
    let mut y: Vec<f64> = (0..n).map(|i| 2.0 + 0.5 * x[i] + 0.3 * noise[i]).collect();

    // Far from the line at the largest x
    let (far, _) = x
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
    y[far] += 15.0;

    let model = fit(&design_from_columns(&[x], y)).unwrap();
    let report = diagnose_influence(&model);

    assert!(report.influential().contains(&far));
    assert!(report.influential_above(COOKS_DISTANCE_CONVENTIONAL).contains(&far));
    assert!(report.outliers().contains(&far));
    assert!(report.influential_dffits().contains(&far));
}

#[test]
fn test_standardized_residual_definition() {
    let design = three_parameter_design(30, 11);
    let model = fit(&design).unwrap();
    let report = diagnose_influence(&model);
    let sigma = model.sigma2().sqrt();

    for i in 0..30 {
        let h = report.leverage[i];
        let expected = model.residuals()[i] / (sigma * (1.0 - h).sqrt());
        assert_relative_eq!(report.standardized_residuals[i], expected, epsilon = 1e-12);
    }
    assert!((report.leverage_threshold() - 0.2).abs() < 1e-12);
}

#[test]
fn test_full_report_runs_all_parts() {
    let design = three_parameter_design(50, 21);
    let model = fit(&design).unwrap();
    let options = DiagnosticsOptions::default();

    let report = diagnose_all(&model, &options).unwrap();
    assert_eq!(report.inference.coefficient_tests.len(), 3);
    assert_eq!(report.influence.cooks_distance.len(), 50);
    assert!(report.residuals.shapiro_wilk.statistic > 0.0);

    let suite = DiagnosticSuite::standard(&options);
    let results = suite.run_parallel(&model);
    assert_eq!(results.len(), 4);
    assert_eq!(
        results[1].as_ref().unwrap(),
        &report.residuals.durbin_watson
    );
}
