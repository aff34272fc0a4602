//! Permutation and algebra utilities

use nalgebra::DMatrix;
use sle_core::NOISE_TOLERANCE;
use crate::types::{Matrix, PivotRecord, Vector};

/// Swap two full rows in place
pub fn swap_rows(a: &mut Matrix, i: usize, j: usize) {
    if i != j {
        a.as_dmatrix_mut().swap_rows(i, j);
    }
}

/// Swap two full columns in place
pub fn swap_columns(a: &mut Matrix, i: usize, j: usize) {
    if i != j {
        a.as_dmatrix_mut().swap_columns(i, j);
    }
}

/// `A · v`
pub fn multiply_matrix_vector(a: &Matrix, v: &Vector) -> Vector {
    let n = a.size();
    let mut out = Vector::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..n {
            sum += a[(i, j)] * v[j];
        }
        out[i] = sum;
    }
    out
}

/// `A · B`
pub fn multiply_matrices(a: &Matrix, b: &Matrix) -> Matrix {
    let n = a.size();
    let mut out = Matrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[(i, k)] * b[(k, j)];
            }
            out[(i, j)] = sum;
        }
    }
    out
}

/// `size × size` identity matrix
pub fn identity(size: usize) -> Matrix {
    let mut out = Matrix::zeros(size);
    out.as_dmatrix_mut().copy_from(&DMatrix::identity(size, size));
    out
}

/// `sqrt(Σ (u_i - v_i)²)`
pub fn euclidean_norm(u: &Vector, v: &Vector) -> f64 {
    u.iter()
        .zip(v.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// Zero out floating-point drift
#[inline]
pub fn snap_near_zero(value: f64) -> f64 {
    if value.abs() < NOISE_TOLERANCE {
        0.0
    } else {
        value
    }
}

/// `value - delta` with drift snapped to zero
///
/// A zero `delta` is not an update: `value` comes back untouched, so a
/// small entry nothing was subtracted from keeps its magnitude.
#[inline]
pub(crate) fn subtract_snapped(value: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        value
    } else {
        snap_near_zero(value - delta)
    }
}

/// Restore original variable order after complete pivoting
pub fn permute_vector(x: &mut Vector, record: &PivotRecord) {
    record.unpermute(x);
}
