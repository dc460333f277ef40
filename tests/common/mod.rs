//! Common test utilities and data generators.

#![allow(dead_code)]

use faer::{Col, Mat};
use lm_diagnostics::core::{Dataset, DesignMatrix, INTERCEPT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Seeded standard-normal draws.
pub fn normal_draws(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Seeded uniform draws on [lo, hi).
pub fn uniform_draws(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}

/// y = 3 + 2x + ε with x ~ U(0, 10), ε ~ N(0, 1).
pub fn simple_linear_dataset(n: usize, seed: u64) -> Dataset {
    let x = uniform_draws(n, 0.0, 10.0, seed);
    let eps = normal_draws(n, seed.wrapping_add(1));
    let y: Vec<f64> = x.iter().zip(&eps).map(|(xi, e)| 3.0 + 2.0 * xi + e).collect();

    Dataset::builder()
        .numeric("y", y)
        .numeric("x", x)
        .build()
        .unwrap()
}

/// Design with an intercept and the given predictor columns.
pub fn design_from_columns(columns: &[Vec<f64>], y: Vec<f64>) -> DesignMatrix {
    let n = y.len();
    let p = columns.len() + 1;
    let x = Mat::from_fn(n, p, |i, j| if j == 0 { 1.0 } else { columns[j - 1][i] });
    let mut names = vec![INTERCEPT.to_string()];
    names.extend((1..p).map(|j| format!("x{}", j)));
    DesignMatrix::new(x, Col::from_fn(n, |i| y[i]), names).unwrap()
}

/// Drop row `skip` from a design.
pub fn design_without_row(design: &DesignMatrix, skip: usize) -> DesignMatrix {
    let n = design.n_observations();
    let p = design.n_columns();
    let keep: Vec<usize> = (0..n).filter(|&i| i != skip).collect();
    let x = Mat::from_fn(n - 1, p, |i, j| design.x()[(keep[i], j)]);
    let y = Col::from_fn(n - 1, |i| design.y()[keep[i]]);
    DesignMatrix::new(x, y, design.column_names().to_vec()).unwrap()
}
