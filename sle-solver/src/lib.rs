//! SLE Solver - Dense linear systems `A·x = b`
//!
//! Provides the solver core for square systems of size 2 to 8:
//! - Permutation & algebra utilities (row/column swaps, products, norms)
//! - Forward elimination with none / partial / complete pivoting
//! - LU factorization producing `L`, `U`, `P`, `Q` with `P·A·Q = L·U`
//! - Forward/back substitution and the compatibility check
//! - `SolveRequest`, which runs one or both paths and verifies the result
//! - Cosmetic decimal rounding and pure text rendering for clients
//!
//! Every operation runs synchronously on data owned by the caller.

mod types;
mod algebra;
mod rounding;
mod eliminate;
mod lu;
mod triangular;
mod solve;
mod render;

#[cfg(test)]
mod testing;

pub use types::{Matrix, Vector, PivotRecord};
pub use algebra::{
    swap_rows, swap_columns, multiply_matrix_vector, multiply_matrices,
    identity, euclidean_norm, snap_near_zero, permute_vector,
};
pub use rounding::{round_repeating_decimals, round_value};
pub use eliminate::{forward_eliminate, select_pivot, Elimination};
pub use lu::{lu_factorize, Factorization};
pub use triangular::{check_compatibility, is_compatible, forward_substitution, back_substitution};
pub use solve::{solve_gauss, verify, SolveRequest, SolveReport, GaussSolution, LuSolution, Residual};
pub use render::{plain_decimal, render_matrix, render_augmented, export_system};

pub use sle_core::{PivotStrategy, SolveMethod, RoundingPolicy, SleError, Incompatibility};
