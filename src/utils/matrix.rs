//! Matrix and vector helpers shared by the fitter and the diagnostics.

use faer::{Col, Mat, MatRef};

/// Center a matrix by subtracting column means.
pub fn center_columns(x: MatRef<'_, f64>) -> (Mat<f64>, Col<f64>) {
    let n_rows = x.nrows();
    let n_cols = x.ncols();

    let mut means = Col::zeros(n_cols);
    let mut centered = Mat::zeros(n_rows, n_cols);

    for j in 0..n_cols {
        let sum: f64 = (0..n_rows).map(|i| x[(i, j)]).sum();
        means[j] = sum / n_rows as f64;

        for i in 0..n_rows {
            centered[(i, j)] = x[(i, j)] - means[j];
        }
    }

    (centered, means)
}

/// Sum of squared deviations about the mean.
pub fn centered_sum_of_squares(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|&v| (v - mean).powi(2)).sum()
}

/// Solve `R x = b` for upper-triangular `R` (leading `b.len()` block).
pub fn back_substitute(r: MatRef<'_, f64>, b: &[f64]) -> Vec<f64> {
    let p = b.len();
    let mut x = vec![0.0; p];

    for i in (0..p).rev() {
        let mut sum = b[i];
        for j in (i + 1)..p {
            sum -= r[(i, j)] * x[j];
        }
        x[i] = sum / r[(i, i)];
    }

    x
}

/// Invert the leading `p × p` block of an upper-triangular matrix.
pub fn invert_upper_triangular(r: MatRef<'_, f64>, p: usize) -> Mat<f64> {
    let mut inv = Mat::zeros(p, p);

    for col in 0..p {
        let mut e = vec![0.0; p];
        e[col] = 1.0;
        let solution = back_substitute(r, &e);
        for row in 0..=col {
            inv[(row, col)] = solution[row];
        }
    }

    inv
}

/// Ranks of `values` (1-based), ties receiving the average of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j are tied; average rank = (i+1 + j) / 2
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        i = j;
    }

    ranks
}

/// Pearson correlation; `NaN` when either input has zero variance.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    if n == 0 || n != b.len() {
        return f64::NAN;
    }

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (&ai, &bi) in a.iter().zip(b) {
        let da = ai - mean_a;
        let db = bi - mean_b;
        sab += da * db;
        saa += da * da;
        sbb += db * db;
    }

    if saa <= 0.0 || sbb <= 0.0 {
        return f64::NAN;
    }
    (sab / (saa * sbb).sqrt()).clamp(-1.0, 1.0)
}
