//! Triangular solvers and the compatibility check
//!
//! Substitution assumes a compatible system. Run `check_compatibility`
//! first; on a system it rejects, the substitutions divide by zero and
//! return non-finite components.
//!
//! Zero tests here are exact. Drift is snapped where it is produced, by
//! the elimination updates and by forward substitution, so whatever is
//! still non-zero is a value the system really carries.

use sle_core::Incompatibility;
use tracing::debug;
use crate::algebra::subtract_snapped;
use crate::types::{Matrix, Vector};

/// Verify that a reduced system has exactly one solution
///
/// A row whose coefficients and right-hand side are all zero means
/// infinitely many solutions and is reported immediately. Otherwise the
/// first zero diagonal entry means no unique solution.
pub fn check_compatibility(a: &Matrix, b: &Vector) -> Result<(), Incompatibility> {
    let n = a.size();
    let mut zero_pivot = None;

    for i in 0..n {
        let zero_row = (0..n).all(|j| a[(i, j)] == 0.0);
        if zero_row && b[i] == 0.0 {
            debug!(row = i, "zero equation: infinitely many solutions");
            return Err(Incompatibility::InfiniteSolutions { row: i });
        }
        if zero_pivot.is_none() && a[(i, i)] == 0.0 {
            zero_pivot = Some(i);
        }
    }

    match zero_pivot {
        Some(row) => {
            debug!(row, "zero diagonal: no unique solution");
            Err(Incompatibility::NoSolution { row })
        }
        None => Ok(()),
    }
}

pub fn is_compatible(a: &Matrix, b: &Vector) -> bool {
    check_compatibility(a, b).is_ok()
}

/// Solve `L·y = b` top-down
pub fn forward_substitution(l: &Matrix, b: &Vector) -> Vector {
    let n = l.size();
    let mut y = Vector::zeros(n);

    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[(i, j)] * y[j];
        }
        y[i] = subtract_snapped(b[i], sum) / l[(i, i)];
    }

    y
}

/// Solve `U·x = y` bottom-up
pub fn back_substitution(u: &Matrix, y: &Vector) -> Vector {
    let n = u.size();
    let mut x = Vector::zeros(n);

    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += u[(i, j)] * x[j];
        }
        x[i] = (y[i] - sum) / u[(i, i)];
    }

    x
}
