//! Residual diagnostics integration tests.

mod common;

use approx::assert_relative_eq;
use common::{design_from_columns, normal_draws, uniform_draws};
use lm_diagnostics::core::{DegreesOfFreedom, DiagnosticsOptions, DwAlternative};
use lm_diagnostics::diagnostics::{diagnose_residuals, diagnose_residuals_with, shapiro_wilk};
use lm_diagnostics::solvers::{fit, RegressionError};

// ============================================================================
// Durbin-Watson
// ============================================================================

#[test]
fn test_smooth_errors_give_small_durbin_watson() {
    let n = 100;
    let t: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let noise = normal_draws(n, 17);
    let y: Vec<f64> = (0..n)
        .map(|i| 0.5 * t[i] + 2.0 * (i as f64 / 2.0).sin() + 0.2 * noise[i])
        .collect();

    let model = fit(&design_from_columns(&[t], y)).unwrap();
    let options = DiagnosticsOptions::builder()
        .dw_alternative(DwAlternative::Greater)
        .build()
        .unwrap();
    let report = diagnose_residuals_with(&model, &options).unwrap();

    assert!(report.durbin_watson.statistic < 1.0, "d = {}", report.durbin_watson.statistic);
    assert!(report.durbin_watson.p_value < 0.001);
    assert!(report.durbin_watson.rejects_null());
}

#[test]
fn test_white_noise_durbin_watson_near_two() {
    let n = 200;
    let x = uniform_draws(n, 0.0, 1.0, 51);
    let y = normal_draws(n, 52);

    let model = fit(&design_from_columns(&[x], y)).unwrap();
    let report = diagnose_residuals(&model).unwrap();

    let d = report.durbin_watson.statistic;
    assert!((d - 2.0).abs() < 0.6, "d = {}", d);
    assert!(report.durbin_watson.p_value > 0.0 && report.durbin_watson.p_value <= 1.0);
}

// ============================================================================
// Breusch-Pagan
// ============================================================================

#[test]
fn test_breusch_pagan_detects_variance_growing_with_x() {
    let n = 150;
    let x = uniform_draws(n, 1.0, 10.0, 61);
    let noise = normal_draws(n, 62);
    let y: Vec<f64> = (0..n).map(|i| 1.0 + x[i] + x[i] * noise[i]).collect();

    let model = fit(&design_from_columns(&[x], y)).unwrap();
    let report = diagnose_residuals(&model).unwrap();

    assert_eq!(report.breusch_pagan.df, DegreesOfFreedom::Single(1.0));
    assert!(report.breusch_pagan.p_value < 0.01, "p = {}", report.breusch_pagan.p_value);
    assert!(report.breusch_pagan.rejects_null());
}

#[test]
fn test_breusch_pagan_df_counts_predictors() {
    let n = 50;
    let cols = vec![
        uniform_draws(n, 0.0, 1.0, 71),
        uniform_draws(n, 0.0, 1.0, 72),
        uniform_draws(n, 0.0, 1.0, 73),
    ];
    let model = fit(&design_from_columns(&cols, normal_draws(n, 74))).unwrap();
    let report = diagnose_residuals(&model).unwrap();

    assert_eq!(report.breusch_pagan.df, DegreesOfFreedom::Single(3.0));
    assert!(report.breusch_pagan.statistic >= 0.0);
}

// ============================================================================
// Shapiro-Wilk
// ============================================================================

#[test]
fn test_normal_errors_give_high_w() {
    let n = 200;
    let x = uniform_draws(n, 0.0, 5.0, 81);
    let noise = normal_draws(n, 82);
    let y: Vec<f64> = (0..n).map(|i| 2.0 - x[i] + noise[i]).collect();

    let model = fit(&design_from_columns(&[x], y)).unwrap();
    let report = diagnose_residuals(&model).unwrap();

    assert!(report.shapiro_wilk.statistic > 0.97, "W = {}", report.shapiro_wilk.statistic);
    assert!(report.shapiro_wilk.statistic <= 1.0);
}

#[test]
fn test_skewed_errors_rejected() {
    let n = 200;
    let x = uniform_draws(n, 0.0, 5.0, 91);
    let z = normal_draws(n, 92);
    // Log-normal errors are strongly right-skewed
    let y: Vec<f64> = (0..n).map(|i| 2.0 + x[i] + (1.5 * z[i]).exp()).collect();

    let model = fit(&design_from_columns(&[x], y)).unwrap();
    let report = diagnose_residuals(&model).unwrap();

    assert!(report.shapiro_wilk.p_value < 0.001);
    assert!(report.shapiro_wilk.rejects_null());
}

#[test]
fn test_shapiro_wilk_matches_reference_values() {
    // ToothGrowth$len from R's datasets; shapiro.test gives W = 0.96743, p = 0.1091
    let len = [
        4.2, 11.5, 7.3, 5.8, 6.4, 10.0, 11.2, 11.2, 5.2, 7.0, 16.5, 16.5, 15.2, 17.3, 22.5, 17.3,
        13.6, 14.5, 18.8, 15.5, 23.6, 18.5, 33.9, 25.5, 26.4, 32.5, 26.7, 21.5, 23.3, 29.5, 15.2,
        21.5, 17.6, 9.7, 14.5, 10.0, 8.2, 9.4, 16.5, 9.7, 19.7, 23.3, 23.6, 26.4, 20.0, 25.2, 25.8,
        21.2, 14.5, 27.3, 25.5, 26.4, 22.4, 24.5, 24.8, 30.9, 26.4, 27.3, 29.4, 23.0,
    ];
    let result = shapiro_wilk(&len, 0.05).unwrap();

    assert_relative_eq!(result.statistic, 0.96743, epsilon = 1e-5);
    assert_relative_eq!(result.p_value, 0.1091, epsilon = 1e-4);
    assert!(!result.rejects_null());
}

#[test]
fn test_shapiro_wilk_sample_size_range() {
    assert!(matches!(
        shapiro_wilk(&[0.3, -0.1], 0.05),
        Err(RegressionError::SampleSize { n: 2, min: 3, max: 5000, .. })
    ));

    let n = 5001;
    let x = uniform_draws(n, 0.0, 1.0, 101);
    let y = normal_draws(n, 102);
    let model = fit(&design_from_columns(&[x], y)).unwrap();

    assert!(matches!(
        diagnose_residuals(&model),
        Err(RegressionError::SampleSize { n: 5001, .. })
    ));
}
