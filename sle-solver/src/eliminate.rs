//! Forward elimination with optional pivoting
//!
//! Reduces `(A, b)` in place to row-echelon form. Complete pivoting also
//! reorders the unknowns; those column swaps are returned in a
//! `PivotRecord` so the caller can restore the original order after back
//! substitution.

use serde::Serialize;
use sle_core::PivotStrategy;
use tracing::{debug, warn};
use crate::algebra::{subtract_snapped, swap_columns, swap_rows};
use crate::types::{Matrix, PivotRecord, Vector};

/// Bookkeeping produced by one forward elimination
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Elimination {
    /// Column swaps (complete pivoting only)
    pub record: PivotRecord,
    /// Row swaps as `(step, found_row)`
    pub row_swaps: Vec<(usize, usize)>,
    /// Steps whose pivot was zero; rows below were left untouched
    pub degenerate_steps: Vec<usize>,
}

impl Elimination {
    pub fn is_degenerate(&self) -> bool {
        !self.degenerate_steps.is_empty()
    }
}

/// Locate the pivot for step `k` as `(row, column)`
///
/// Ties keep the earliest candidate in row-major order, so `(k, k)` wins
/// whenever nothing is strictly larger.
pub fn select_pivot(a: &Matrix, k: usize, strategy: PivotStrategy) -> (usize, usize) {
    let n = a.size();
    match strategy {
        PivotStrategy::None => (k, k),
        PivotStrategy::Partial => {
            let mut best = k;
            for i in (k + 1)..n {
                if a[(i, k)].abs() > a[(best, k)].abs() {
                    best = i;
                }
            }
            (best, k)
        }
        PivotStrategy::Complete => {
            let (mut best_row, mut best_col) = (k, k);
            for i in k..n {
                for j in k..n {
                    if a[(i, j)].abs() > a[(best_row, best_col)].abs() {
                        best_row = i;
                        best_col = j;
                    }
                }
            }
            (best_row, best_col)
        }
    }
}

/// Reduce `a` and `b` to row-echelon form
pub fn forward_eliminate(a: &mut Matrix, b: &mut Vector, strategy: PivotStrategy) -> Elimination {
    let n = a.size();
    let mut outcome = Elimination::default();

    for k in 0..n.saturating_sub(1) {
        let (row, col) = select_pivot(a, k, strategy);

        if row != k {
            debug!(step = k, row, "swapping rows");
            swap_rows(a, k, row);
            b.swap(k, row);
            outcome.row_swaps.push((k, row));
        }
        if col != k {
            debug!(step = k, column = col, "swapping columns");
            swap_columns(a, k, col);
            outcome.record.push(col, k);
        }

        let pivot = a[(k, k)];
        if pivot == 0.0 {
            warn!(step = k, "zero pivot, skipping elimination below it");
            outcome.degenerate_steps.push(k);
            continue;
        }

        for i in (k + 1)..n {
            let m = a[(i, k)] / pivot;
            a[(i, k)] = 0.0;
            for j in (k + 1)..n {
                a[(i, j)] = subtract_snapped(a[(i, j)], m * a[(k, j)]);
            }
            b[i] = subtract_snapped(b[i], m * b[k]);
        }
    }

    outcome
}
