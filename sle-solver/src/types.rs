//! Matrix, vector and pivot-record value types
//!
//! These are plain data containers. Nothing here knows how a system is
//! displayed; see `render` for the pure formatting helpers.

use std::fmt;
use std::ops::{Index, IndexMut};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sle_core::SleError;

/// Square matrix of `f64`
///
/// Serializes as a list of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    data: DMatrix<f64>,
}

/// Column vector of `f64`, paired row-for-row with a `Matrix`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct Vector {
    data: DVector<f64>,
}

/// Column swaps made by complete pivoting, in insertion order
///
/// Each entry is `(found_column, step)`. Replaying the entries in reverse
/// restores the original variable order of a solution vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRecord {
    swaps: Vec<(usize, usize)>,
}

impl Matrix {
    /// Create a matrix from rows, rejecting ragged or non-square input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SleError> {
        if rows.is_empty() {
            return Err(SleError::dimension_mismatch("matrix rows", 1, 0));
        }

        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(SleError::dimension_mismatch(&format!("matrix row {}", i), size, row.len())
                    .at_row(i)
                    .with_note("the coefficient matrix must be square"));
            }
        }

        Ok(Self {
            data: DMatrix::from_fn(size, size, |i, j| rows[i][j]),
        })
    }

    /// Wrap a square nalgebra matrix
    pub fn from_dmatrix(data: DMatrix<f64>) -> Result<Self, SleError> {
        if data.nrows() != data.ncols() {
            return Err(SleError::dimension_mismatch("matrix columns", data.nrows(), data.ncols()));
        }
        Ok(Self { data })
    }

    /// All-zero `size × size` matrix
    pub fn zeros(size: usize) -> Self {
        Self { data: DMatrix::zeros(size, size) }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    pub fn row(&self, row: usize) -> Vec<f64> {
        self.data.row(row).iter().copied().collect()
    }

    pub fn diagonal(&self) -> Vector {
        Vector { data: self.data.diagonal() }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size()).map(|i| self.row(i)).collect()
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub(crate) fn as_dmatrix_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.data
    }

    /// Largest entrywise difference to another matrix of the same size
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[index]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = SleError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, SleError> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.to_rows()
    }
}

impl Vector {
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data: DVector::from_vec(data) }
    }

    pub fn zeros(len: usize) -> Self {
        Self { data: DVector::zeros(len) }
    }

    pub fn from_dvector(data: DVector<f64>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.data.swap_rows(i, j);
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.data.iter_mut()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.data.as_slice()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.as_slice().to_vec()
    }

    pub fn as_dvector(&self) -> &DVector<f64> {
        &self.data
    }

    /// Largest entrywise difference to another vector
    pub fn max_abs_diff(&self, other: &Vector) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::from_vec(data)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(v: Vector) -> Self {
        v.to_vec()
    }
}

impl PivotRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `found_column` was swapped into position `step`
    pub fn push(&mut self, found_column: usize, step: usize) {
        self.swaps.push((found_column, step));
    }

    pub fn swaps(&self) -> &[(usize, usize)] {
        &self.swaps
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    /// Undo the recorded column swaps on a solution vector
    ///
    /// Entries are replayed newest first; any other order yields a
    /// different permutation whenever two swaps share an index.
    pub fn unpermute(&self, x: &mut Vector) {
        for &(found, step) in self.swaps.iter().rev() {
            x.swap(found, step);
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.size() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for j in 0..self.size() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.4}", self.data[(i, j)])?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, val) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", val)?;
        }
        write!(f, "]")
    }
}
