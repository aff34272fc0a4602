//! Deterministic test systems

use crate::algebra::{multiply_matrix_vector, swap_rows};
use crate::types::{Matrix, Vector};

/// Simple LCG: state = (a * state + c) mod m, mapped to [min, max)
pub(crate) struct Lcg {
    state: u64,
}

impl Lcg {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(12345) }
    }

    pub(crate) fn next_in(&mut self, min: f64, max: f64) -> f64 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        let r = ((self.state >> 16) & 0x7fff) as f64 / 32768.0;
        min + r * (max - min)
    }
}

/// Strictly diagonally dominant system with a known integer solution
///
/// Returns `(A, b, x)` with `b = A·x`.
pub(crate) fn dominant_system(size: usize, seed: u64) -> (Matrix, Vector, Vector) {
    let mut rng = Lcg::new(seed);
    let mut a = Matrix::zeros(size);
    for i in 0..size {
        for j in 0..size {
            a[(i, j)] = rng.next_in(-1.0, 1.0);
        }
        a[(i, i)] += 2.0 * size as f64;
    }
    let x = Vector::from_vec((0..size).map(|_| rng.next_in(-5.0, 5.0).round()).collect());
    let b = multiply_matrix_vector(&a, &x);
    (a, b, x)
}

/// Dominant system with its rows rotated by one, so that the diagonal
/// holds small entries and every pivoting strategy has work to do
pub(crate) fn rotated_system(size: usize, seed: u64) -> (Matrix, Vector, Vector) {
    let (mut a, _, x) = dominant_system(size, seed);
    for i in 0..size - 1 {
        swap_rows(&mut a, i, i + 1);
    }
    let b = multiply_matrix_vector(&a, &x);
    (a, b, x)
}
