//! Numerical helpers.

mod matrix;

pub use matrix::{
    average_ranks, back_substitute, center_columns, centered_sum_of_squares,
    invert_upper_triangular, pearson_correlation,
};
