//! LU factorization with optional pivoting
//!
//! Produces `L`, `U`, `P` and `Q` such that `P·A·Q = L·U` whenever no
//! step met a zero pivot:
//! - no pivoting: `P = Q = I`
//! - partial pivoting: `Q = I`
//! - complete pivoting: both permutations active
//!
//! A zero pivot skips its step and later steps only update the columns to
//! their right, so the entries left below that pivot never reach `L` and
//! the identity no longer holds. `degenerate_steps` lists those steps, and
//! `solve` rejects such a factorization through the compatibility check.
//!
//! The right-hand side is never touched here; `Factorization::solve`
//! applies `P` (and `Q`) at solve time.

use serde::Serialize;
use sle_core::{Incompatibility, PivotStrategy, SleError};
use tracing::{debug, warn};
use crate::algebra::{identity, multiply_matrices, multiply_matrix_vector, subtract_snapped, swap_columns, swap_rows};
use crate::eliminate::select_pivot;
use crate::triangular::{back_substitution, check_compatibility, forward_substitution};
use crate::types::{Matrix, Vector};

/// `{L, U, P, Q, pivot}` produced by `lu_factorize`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Factorization {
    /// Unit lower-triangular multipliers
    pub l: Matrix,
    /// Row-echelon result
    pub u: Matrix,
    /// Row permutation
    pub p: Matrix,
    /// Column permutation
    pub q: Matrix,
    #[serde(rename = "pivot")]
    pub strategy: PivotStrategy,
    /// Steps whose pivot was zero
    #[serde(rename = "degenerate_steps", skip_serializing_if = "Vec::is_empty")]
    pub degenerate_steps: Vec<usize>,
}

/// Factor `a` under the given pivoting strategy
pub fn lu_factorize(a: &Matrix, strategy: PivotStrategy) -> Factorization {
    let n = a.size();
    let mut l = Matrix::zeros(n);
    let mut u = a.clone();
    let mut p = identity(n);
    let mut q = identity(n);
    let mut degenerate_steps = Vec::new();

    for k in 0..n.saturating_sub(1) {
        let (row, col) = select_pivot(&u, k, strategy);

        if row != k {
            debug!(step = k, row, "lu: swapping rows");
            swap_rows(&mut u, k, row);
            swap_rows(&mut l, k, row);
            swap_rows(&mut p, k, row);
        }
        if col != k {
            debug!(step = k, column = col, "lu: swapping columns");
            swap_columns(&mut u, k, col);
            swap_columns(&mut q, col, k);
        }

        let pivot = u[(k, k)];
        if pivot == 0.0 {
            warn!(step = k, "lu: zero pivot, skipping elimination below it");
            degenerate_steps.push(k);
            continue;
        }

        for i in (k + 1)..n {
            let m = u[(i, k)] / pivot;
            l[(i, k)] = m;
            u[(i, k)] = 0.0;
            for j in (k + 1)..n {
                u[(i, j)] = subtract_snapped(u[(i, j)], m * u[(k, j)]);
            }
        }
    }

    for i in 0..n {
        l[(i, i)] = 1.0;
    }

    Factorization { l, u, p, q, strategy, degenerate_steps }
}

impl Factorization {
    /// Numeric pivot tag (0 = none, 1 = partial, 2 = complete)
    pub fn pivot_type(&self) -> u8 {
        self.strategy.tag()
    }

    /// Formula used by `solve` for this strategy
    pub fn label(&self) -> &'static str {
        match self.strategy {
            PivotStrategy::None => "Ly=b | Ux=y",
            PivotStrategy::Partial => "Ly=Pb | Ux=y",
            PivotStrategy::Complete => "Ly=Pb | Uz=y | x=Qz",
        }
    }

    /// Solve `A·x = b` with the stored factors
    ///
    /// The compatibility check runs on `(U, y)`, i.e. on the reduced
    /// right-hand side, so a zero row of `U` is classified against the
    /// value it actually has to match.
    pub fn solve(&self, b: &Vector) -> Result<Vector, SleError> {
        let n = self.u.size();
        if b.len() != n {
            return Err(SleError::dimension_mismatch("right-hand side", n, b.len()));
        }

        let pb = match self.strategy {
            PivotStrategy::None => b.clone(),
            PivotStrategy::Partial | PivotStrategy::Complete => multiply_matrix_vector(&self.p, b),
        };

        check_compatibility(&self.l, &pb).map_err(|cause| self.incompatible(cause, "forward substitution"))?;
        let y = forward_substitution(&self.l, &pb);

        check_compatibility(&self.u, &y).map_err(|cause| self.incompatible(cause, "back substitution"))?;
        let z = back_substitution(&self.u, &y);

        Ok(match self.strategy {
            PivotStrategy::Complete => multiply_matrix_vector(&self.q, &z),
            PivotStrategy::None | PivotStrategy::Partial => z,
        })
    }

    fn incompatible(&self, cause: Incompatibility, stage: &str) -> SleError {
        SleError::from(cause)
            .in_stage(stage)
            .with_degenerate_steps(&self.degenerate_steps)
    }

    /// `L·U`
    pub fn product(&self) -> Matrix {
        multiply_matrices(&self.l, &self.u)
    }

    /// `P·A·Q` for the matrix this factorization came from
    pub fn permuted(&self, a: &Matrix) -> Matrix {
        multiply_matrices(&multiply_matrices(&self.p, a), &self.q)
    }
}
