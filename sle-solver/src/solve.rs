//! Solve requests: one value carrying everything a solve needs
//!
//! A `SolveRequest` owns its inputs and options, runs the selected
//! elimination path(s) and returns a `SolveReport`. Nothing is shared
//! between requests.

use serde::Serialize;
use sle_core::{validate_size, PivotStrategy, RoundingPolicy, SleError, SolveMethod};
use tracing::{debug, info_span};
use crate::algebra::{euclidean_norm, multiply_matrix_vector};
use crate::eliminate::{forward_eliminate, Elimination};
use crate::lu::{lu_factorize, Factorization};
use crate::rounding::round_repeating_decimals;
use crate::triangular::{back_substitution, check_compatibility};
use crate::types::{Matrix, PivotRecord, Vector};

/// Plain Gaussian elimination result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaussSolution {
    /// Row-echelon coefficient matrix
    pub reduced_a: Matrix,
    /// Right-hand side after the same row operations
    pub reduced_b: Vector,
    pub elimination: Elimination,
    /// Solution in original variable order
    pub x: Vector,
}

/// LU path result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuSolution {
    pub factorization: Factorization,
    pub label: &'static str,
    pub x: Vector,
}

/// `A·x` and `‖A·x − b‖` for a candidate solution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Residual {
    pub ax: Vector,
    pub norm: f64,
}

/// Everything a completed request produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    pub strategy: PivotStrategy,
    pub method: SolveMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss: Option<GaussSolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lu: Option<LuSolution>,
    /// Preferred solution: the Gaussian one when it ran, else the LU one
    pub solution: Vector,
    /// Residual of `solution` against the original inputs
    pub residual: Residual,
}

/// A validated system plus the options to solve it with
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    a: Matrix,
    b: Vector,
    pub strategy: PivotStrategy,
    pub method: SolveMethod,
    pub rounding: Option<RoundingPolicy>,
}

impl SolveRequest {
    /// Validate size and shape
    pub fn new(a: Matrix, b: Vector) -> Result<Self, SleError> {
        let size = validate_size(a.size())?;
        if b.len() != size {
            return Err(SleError::dimension_mismatch("right-hand side", size, b.len()));
        }
        Ok(Self {
            a,
            b,
            strategy: PivotStrategy::default(),
            method: SolveMethod::default(),
            rounding: None,
        })
    }

    /// Builder: pivoting strategy
    pub fn with_strategy(mut self, strategy: PivotStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder: elimination path(s)
    pub fn with_method(mut self, method: SolveMethod) -> Self {
        self.method = method;
        self
    }

    /// Builder: cosmetic rounding of the solution(s)
    pub fn with_rounding(mut self, rounding: Option<RoundingPolicy>) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn a(&self) -> &Matrix {
        &self.a
    }

    pub fn b(&self) -> &Vector {
        &self.b
    }

    pub fn size(&self) -> usize {
        self.a.size()
    }

    /// Run the request
    pub fn execute(&self) -> Result<SolveReport, SleError> {
        let _span = info_span!("solve", size = self.size(), strategy = %self.strategy).entered();

        let lu = if self.method.runs_lu() {
            let factorization = lu_factorize(&self.a, self.strategy);
            let mut x = factorization.solve(&self.b)?;
            if let Some(policy) = self.rounding {
                round_repeating_decimals(&mut x, policy);
            }
            let label = factorization.label();
            Some(LuSolution { factorization, label, x })
        } else {
            None
        };

        let gauss = if self.method.runs_gauss() {
            let mut solution = solve_gauss(&self.a, &self.b, self.strategy)?;
            if let Some(policy) = self.rounding {
                round_repeating_decimals(&mut solution.x, policy);
            }
            Some(solution)
        } else {
            None
        };

        let solution = match (&gauss, &lu) {
            (Some(g), _) => g.x.clone(),
            (None, Some(l)) => l.x.clone(),
            (None, None) => return Err(SleError::internal("no elimination path selected")),
        };
        let residual = verify(&self.a, &self.b, &solution)?;
        debug!(norm = residual.norm, "solve finished");

        Ok(SolveReport {
            strategy: self.strategy,
            method: self.method,
            gauss,
            lu,
            solution,
            residual,
        })
    }
}

/// Forward elimination, compatibility check, back substitution
///
/// Works on copies; the inputs are left as they were.
pub fn solve_gauss(a: &Matrix, b: &Vector, strategy: PivotStrategy) -> Result<GaussSolution, SleError> {
    if b.len() != a.size() {
        return Err(SleError::dimension_mismatch("right-hand side", a.size(), b.len()));
    }

    let mut reduced_a = a.clone();
    let mut reduced_b = b.clone();
    let elimination = forward_eliminate(&mut reduced_a, &mut reduced_b, strategy);

    check_compatibility(&reduced_a, &reduced_b).map_err(|cause| {
        SleError::from(cause)
            .in_stage("back substitution")
            .with_degenerate_steps(&elimination.degenerate_steps)
    })?;

    let mut x = back_substitution(&reduced_a, &reduced_b);
    restore_variable_order(&mut x, &elimination.record);

    Ok(GaussSolution { reduced_a, reduced_b, elimination, x })
}

fn restore_variable_order(x: &mut Vector, record: &PivotRecord) {
    if !record.is_empty() {
        record.unpermute(x);
    }
}

/// Residual of `x` against the original system
pub fn verify(a: &Matrix, b: &Vector, x: &Vector) -> Result<Residual, SleError> {
    let n = a.size();
    if b.len() != n {
        return Err(SleError::dimension_mismatch("right-hand side", n, b.len()));
    }
    if x.len() != n {
        return Err(SleError::dimension_mismatch("solution", n, x.len()));
    }
    let ax = multiply_matrix_vector(a, x);
    let norm = euclidean_norm(&ax, b);
    Ok(Residual { ax, norm })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sle_core::{codes, Incompatibility};
    use crate::testing::{dominant_system, rotated_system};

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn v(data: Vec<f64>) -> Vector {
        Vector::from_vec(data)
    }

    fn request(a: Vec<Vec<f64>>, b: Vec<f64>) -> SolveRequest {
        SolveRequest::new(m(a), v(b)).unwrap()
    }

    #[test]
    fn test_scenario_simple_no_pivoting() {
        let report = request(vec![vec![2.0, 1.0], vec![1.0, 1.0]], vec![3.0, 2.0])
            .execute()
            .unwrap();
        assert!(report.solution.max_abs_diff(&v(vec![1.0, 1.0])) < 1e-12);
        assert!(report.residual.norm < 1e-9);
        assert!(report.lu.is_none());
    }

    #[test]
    fn test_scenario_zero_pivot_needs_partial() {
        let base = request(vec![vec![0.0, 1.0], vec![1.0, 1.0]], vec![2.0, 3.0]);

        let err = base.clone().execute().unwrap_err();
        assert_eq!(err.incompatibility, Some(Incompatibility::NoSolution { row: 0 }));
        let notes = err.context.map(|c| c.notes).unwrap_or_default();
        assert_eq!(notes, vec!["zero pivot at column 0".to_string()]);

        let report = base.with_strategy(PivotStrategy::Partial).execute().unwrap();
        assert!(report.solution.max_abs_diff(&v(vec![1.0, 2.0])) < 1e-12);
    }

    #[test]
    fn test_scenario_dependent_rows() {
        let a = m(vec![vec![1.0, 2.0], vec![2.0, 4.0]]);
        let b = v(vec![3.0, 6.0]);

        // Nothing is wrong with the raw rows; elimination exposes the dependency
        assert!(check_compatibility(&a, &b).is_ok());

        for strategy in PivotStrategy::ALL {
            let err = solve_gauss(&a, &b, strategy).unwrap_err();
            assert_eq!(err.code, codes::INCOMPATIBLE_SYSTEM);
            assert_eq!(err.incompatibility, Some(Incompatibility::InfiniteSolutions { row: 1 }));

            let err = lu_factorize(&a, strategy).solve(&b).unwrap_err();
            assert!(err.is_incompatible());
        }

        let mut reduced_a = a.clone();
        let mut reduced_b = b.clone();
        forward_eliminate(&mut reduced_a, &mut reduced_b, PivotStrategy::None);
        assert_eq!(reduced_a[(1, 1)], 0.0);
    }

    #[test]
    fn test_zero_pivot_notes_on_every_method() {
        let base = request(vec![vec![0.0, 1.0], vec![1.0, 1.0]], vec![2.0, 3.0]);
        for method in [SolveMethod::Gauss, SolveMethod::Lu, SolveMethod::Both] {
            let err = base.clone().with_method(method).execute().unwrap_err();
            let ctx = err.context.unwrap();
            assert_eq!(ctx.step, Some(0), "method {:?}", method);
            assert_eq!(ctx.notes, vec!["zero pivot at column 0"], "method {:?}", method);
        }
    }

    #[test]
    fn test_small_pivots_are_solved() {
        let a = m(vec![vec![5e-13, 0.0], vec![0.0, 1.0]]);
        let b = v(vec![1.0, 1.0]);
        for strategy in PivotStrategy::ALL {
            let x = solve_gauss(&a, &b, strategy).unwrap().x;
            assert_eq!(x.to_vec(), vec![1.0 / 5e-13, 1.0], "strategy {}", strategy);
            let x = lu_factorize(&a, strategy).solve(&b).unwrap();
            assert_eq!(x.to_vec(), vec![1.0 / 5e-13, 1.0], "strategy {}", strategy);
        }

        let report = request(vec![vec![1e-13, 0.0], vec![0.0, 1e-13]], vec![1e-13, 2e-13])
            .with_strategy(PivotStrategy::Partial)
            .with_method(SolveMethod::Both)
            .execute()
            .unwrap();
        assert_eq!(report.solution.to_vec(), vec![1.0, 2.0]);
        assert_eq!(report.lu.unwrap().x.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_zero_row_verdicts() {
        let a = m(vec![vec![1.0, 1.0], vec![0.0, 0.0]]);

        let err = solve_gauss(&a, &v(vec![2.0, 0.0]), PivotStrategy::None).unwrap_err();
        assert_eq!(err.incompatibility, Some(Incompatibility::InfiniteSolutions { row: 1 }));

        let err = solve_gauss(&a, &v(vec![2.0, 5.0]), PivotStrategy::None).unwrap_err();
        assert_eq!(err.incompatibility, Some(Incompatibility::NoSolution { row: 1 }));
    }

    #[test]
    fn test_scenario_complete_pivoting_paths_agree() {
        let report = request(
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 10.0]],
            vec![6.0, 15.0, 25.0],
        )
        .with_strategy(PivotStrategy::Complete)
        .with_method(SolveMethod::Both)
        .execute()
        .unwrap();

        let gauss = report.gauss.as_ref().unwrap();
        let lu = report.lu.as_ref().unwrap();
        assert!(!gauss.elimination.record.is_empty());
        assert!(gauss.x.max_abs_diff(&lu.x) < 1e-9);
        assert!(gauss.x.max_abs_diff(&v(vec![1.0, 1.0, 1.0])) < 1e-9);
        assert_eq!(lu.label, "Ly=Pb | Uz=y | x=Qz");
    }

    #[test]
    fn test_residual_small_for_every_strategy_and_size() {
        for size in 2..=8 {
            for seed in 0..5u64 {
                let (a, b, x_true) = dominant_system(size, seed);
                let report = SolveRequest::new(a, b).unwrap()
                    .with_method(SolveMethod::Both)
                    .execute()
                    .unwrap();
                assert!(report.residual.norm < 1e-9);
                assert!(report.solution.max_abs_diff(&x_true) < 1e-9);

                let (a, b, x_true) = rotated_system(size, seed);
                for strategy in [PivotStrategy::Partial, PivotStrategy::Complete] {
                    let report = SolveRequest::new(a.clone(), b.clone()).unwrap()
                        .with_strategy(strategy)
                        .with_method(SolveMethod::Both)
                        .execute()
                        .unwrap();
                    assert!(
                        report.residual.norm < 1e-9,
                        "residual {} for size {} seed {} strategy {}",
                        report.residual.norm, size, seed, strategy
                    );
                    let lu_x = &report.lu.as_ref().unwrap().x;
                    assert!(verify(&a, &b, lu_x).unwrap().norm < 1e-9);
                    assert!(report.solution.max_abs_diff(&x_true) < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_record_reversal_matches_lu_path() {
        for size in 3..=8 {
            let (a, b, _) = rotated_system(size, 11);
            let gauss = solve_gauss(&a, &b, PivotStrategy::Complete).unwrap();
            let lu_x = lu_factorize(&a, PivotStrategy::Complete).solve(&b).unwrap();
            assert!(gauss.x.max_abs_diff(&lu_x) < 1e-9);
        }
    }

    #[test]
    fn test_inputs_untouched() {
        let a = m(vec![vec![0.0, 1.0], vec![1.0, 1.0]]);
        let b = v(vec![2.0, 3.0]);
        solve_gauss(&a, &b, PivotStrategy::Complete).unwrap();
        assert_eq!(a.row(0), vec![0.0, 1.0]);
        assert_eq!(b.to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_rounding_applies_to_solutions() {
        // x = 1/3, y = 2/3
        let report = request(vec![vec![3.0, 0.0], vec![0.0, 3.0]], vec![1.0, 2.0])
            .with_method(SolveMethod::Both)
            .with_rounding(Some(RoundingPolicy::default()))
            .execute()
            .unwrap();
        assert_eq!(report.solution.to_vec(), vec![0.3, 0.7]);
        assert_eq!(report.lu.unwrap().x.to_vec(), vec![0.3, 0.7]);
    }

    #[test]
    fn test_lu_only_method() {
        let report = request(vec![vec![2.0, 1.0], vec![1.0, 1.0]], vec![3.0, 2.0])
            .with_method(SolveMethod::Lu)
            .execute()
            .unwrap();
        assert!(report.gauss.is_none());
        assert!(report.solution.max_abs_diff(&v(vec![1.0, 1.0])) < 1e-12);
    }

    #[test]
    fn test_request_validation() {
        let err = SolveRequest::new(m(vec![vec![1.0]]), v(vec![1.0])).unwrap_err();
        assert_eq!(err.code, codes::INVALID_SIZE);

        let nine = vec![vec![1.0; 9]; 9];
        assert_eq!(SolveRequest::new(m(nine), v(vec![1.0; 9])).unwrap_err().code, codes::INVALID_SIZE);

        let err = SolveRequest::new(m(vec![vec![1.0, 0.0], vec![0.0, 1.0]]), v(vec![1.0])).unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_verify() {
        let a = m(vec![vec![2.0, 1.0], vec![1.0, 3.0]]);
        let residual = verify(&a, &v(vec![5.0, 5.0]), &v(vec![2.0, 1.0])).unwrap();
        assert_eq!(residual.ax.to_vec(), vec![5.0, 5.0]);
        assert_eq!(residual.norm, 0.0);

        let residual = verify(&a, &v(vec![5.0, 5.0]), &v(vec![2.0, 2.0])).unwrap();
        assert!((residual.norm - (1.0f64 + 9.0).sqrt()).abs() < 1e-12);

        assert!(verify(&a, &v(vec![5.0, 5.0]), &v(vec![1.0])).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = request(vec![vec![2.0, 1.0], vec![1.0, 1.0]], vec![3.0, 2.0])
            .with_method(SolveMethod::Both)
            .execute()
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "none");
        assert_eq!(json["method"], "both");
        assert_eq!(json["lu"]["label"], "Ly=b | Ux=y");
        assert!(json["gauss"]["reduced_a"].is_array());
    }
}
