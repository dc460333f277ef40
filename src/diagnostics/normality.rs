//! Shapiro-Wilk normality test.
//!
//! Uses Royston's approximation (AS R94): the coefficients come from Blom
//! scores with polynomial corrections for the two extreme order statistics,
//! and W is mapped to a normal deviate through a log (n ≤ 11) or log-normal
//! (n ≥ 12) transformation. For n = 3 the p-value is exact.

use crate::core::{DegreesOfFreedom, DiagnosticResult};
use crate::solvers::{RegressionError, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Smallest sample the approximation supports.
pub const SHAPIRO_WILK_MIN_N: usize = 3;
/// Largest sample the approximation supports.
pub const SHAPIRO_WILK_MAX_N: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Evaluate c[0] + c[1]·x + c[2]·x² + … by Horner's rule.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Shapiro-Wilk test that `sample` comes from a normal distribution.
///
/// # Errors
/// - `SampleSize` unless 3 ≤ n ≤ 5000
/// - `DegenerateModel` if the sample is constant or holds non-finite values
pub fn shapiro_wilk(sample: &[f64], significance_level: f64) -> Result<DiagnosticResult> {
    let n = sample.len();
    if !(SHAPIRO_WILK_MIN_N..=SHAPIRO_WILK_MAX_N).contains(&n) {
        return Err(RegressionError::SampleSize {
            test: "Shapiro-Wilk",
            n,
            min: SHAPIRO_WILK_MIN_N,
            max: SHAPIRO_WILK_MAX_N,
        });
    }
    if sample.iter().any(|v| !v.is_finite()) {
        return Err(RegressionError::DegenerateModel(
            "Shapiro-Wilk sample contains non-finite values".to_string(),
        ));
    }

    let mut x = sample.to_vec();
    x.sort_by(f64::total_cmp);

    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    let range = x[n - 1] - x[0];
    if range <= 0.0 || ss <= 0.0 {
        return Err(RegressionError::DegenerateModel(
            "Shapiro-Wilk sample is constant".to_string(),
        ));
    }

    let std_normal = Normal::new(0.0, 1.0)
        .map_err(|e| RegressionError::DegenerateModel(format!("normal distribution: {}", e)))?;

    let (w, p_value) = if n == 3 {
        let numerator = FRAC_1_SQRT_2 * (x[2] - x[0]);
        let w = (numerator * numerator / ss).clamp(0.75, 1.0);
        // p = (6/π)(asin(√W) − π/3)
        let p = (6.0 / PI) * (w.sqrt().asin() - PI / 3.0);
        (w, p)
    } else {
        let a = coefficients(n, &std_normal)?;
        let half = n / 2;
        let sa: f64 = (0..half).map(|i| a[i] * (x[n - 1 - i] - x[i])).sum();
        let w = (sa * sa / ss).min(1.0);
        (w, p_value(w, n, &std_normal))
    };

    Ok(DiagnosticResult::new(
        "Shapiro-Wilk",
        w,
        DegreesOfFreedom::None,
        p_value.clamp(0.0, 1.0),
        significance_level,
    ))
}

/// Antisymmetric weights for the lower half of the order statistics (n ≥ 4).
fn coefficients(n: usize, std_normal: &Normal) -> Result<Vec<f64>> {
    let half = n / 2;
    let an = n as f64;

    // Blom approximation to expected normal order statistics (negative half)
    let m: Vec<f64> = (1..=half)
        .map(|i| std_normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; half];

    let (first_free, fac_sq, one_minus) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        (
            2,
            summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
            1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
        )
    } else {
        (1, summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1)
    };

    if fac_sq <= 0.0 || one_minus <= 0.0 {
        return Err(RegressionError::DegenerateModel(format!(
            "Shapiro-Wilk coefficients undefined for n = {}",
            n
        )));
    }
    let fac = (fac_sq / one_minus).sqrt();

    a[0] = a1;
    for i in first_free..half {
        a[i] = -m[i] / fac;
    }

    Ok(a)
}

/// Upper-tail p-value of W via Royston's normalizing transformation.
fn p_value(w: f64, n: usize, std_normal: &Normal) -> f64 {
    let an = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    let (z_input, mean, sd) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 0.0;
        }
        (-(gamma - y).ln(), poly(&C3, an), poly(&C4, an).exp())
    } else {
        let ln_n = an.ln();
        (y, poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    std_normal.sf((z_input - mean) / sd)
}
