//! Leverage (hat matrix diagonal) thresholds and flagging.

use crate::core::FittedModel;

/// Leverage values h_ii of a fitted model.
///
/// Read from the squared row norms of the thin Q factor computed at fit
/// time; the n × n hat matrix H = X(X'X)⁻¹X' is never formed.
///
/// # Properties
/// - h_ii ∈ [0, 1]
/// - Σ h_ii = p (number of parameters)
pub fn leverage(model: &FittedModel) -> Vec<f64> {
    model.hat_diagonal().iter().copied().collect()
}

/// Conventional high-leverage cutoff 2p/n.
pub fn leverage_threshold(n_params: usize, n: usize) -> f64 {
    2.0 * n_params as f64 / n as f64
}

/// Conservative high-leverage cutoff 3p/n.
pub fn leverage_threshold_conservative(n_params: usize, n: usize) -> f64 {
    3.0 * n_params as f64 / n as f64
}

/// Identify high leverage observations.
///
/// Returns indices of observations with h_ii > threshold.
/// Default threshold: 2p/n.
pub fn high_leverage_points(leverage: &[f64], n_params: usize, threshold: Option<f64>) -> Vec<usize> {
    let cutoff = threshold.unwrap_or_else(|| leverage_threshold(n_params, leverage.len()));

    leverage
        .iter()
        .enumerate()
        .filter(|(_, &h)| h > cutoff)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DesignMatrix, INTERCEPT};
    use crate::solvers::fit;
    use faer::{Col, Mat};

    #[test]
    fn test_leverage_sums_to_p() {
        let x = Mat::from_fn(12, 3, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => ((i * 7) % 5) as f64,
        });
        let y = Col::from_fn(12, |i| i as f64);
        let design =
            DesignMatrix::new(x, y, vec![INTERCEPT.into(), "a".into(), "b".into()]).unwrap();
        let h = leverage(&fit(&design).unwrap());

        let total: f64 = h.iter().sum();
        assert!((total - 3.0).abs() < 1e-10);
        assert!(h.iter().all(|&v| (0.0..=1.0 + 1e-12).contains(&v)));
    }

    #[test]
    fn test_outlying_predictor_has_high_leverage() {
        let x = Mat::from_fn(10, 2, |i, j| {
            if j == 0 {
                1.0
            } else if i == 9 {
                50.0
            } else {
                i as f64
            }
        });
        let y = Col::from_fn(10, |i| i as f64);
        let design = DesignMatrix::new(x, y, vec![INTERCEPT.into(), "t".into()]).unwrap();
        let h = leverage(&fit(&design).unwrap());

        assert_eq!(high_leverage_points(&h, 2, None), vec![9]);
        assert!(h[9] > leverage_threshold_conservative(2, 10));
    }

    #[test]
    fn test_thresholds() {
        assert!((leverage_threshold(3, 30) - 0.2).abs() < 1e-12);
        assert!((leverage_threshold_conservative(3, 30) - 0.3).abs() < 1e-12);
        assert_eq!(high_leverage_points(&[0.1, 0.5, 0.2], 1, Some(0.15)), vec![1, 2]);
    }
}
