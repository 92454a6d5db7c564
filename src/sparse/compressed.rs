//! Compressed sparse row and column layouts.
//!
//! # Memory Layout (CSR)
//! For a matrix with `nnz` entries and `nrows` rows:
//! - `values`: \[nnz\] - stored values, grouped by row
//! - `col_indices`: \[nnz\] - column index for each value
//! - `row_ptrs`: \[nrows + 1\] - start of each row in `values`
//!
//! ```text
//! Dense:     [[1, 0, 2],    CSR:
//!             [0, 0, 3],    values: [1, 2, 3, 4]
//!             [4, 0, 0]]    col_indices: [0, 2, 2, 0]
//!                           row_ptrs: [0, 2, 3, 4]
//! ```
//!
//! CSC is the same scheme with rows and columns exchanged.

use super::WeightOperator;
use crate::error::{RegridError, Result};

/// Validate a pointer array against the number of stored values.
fn validate_ptrs(ptrs: &[usize], major: usize, nnz: usize, name: &str) -> Result<()> {
    if ptrs.len() != major + 1 {
        return Err(RegridError::schema(format!(
            "{name} length ({}) != {} + 1",
            ptrs.len(),
            major
        )));
    }

    if ptrs.first().copied() != Some(0) {
        return Err(RegridError::schema(format!("{name} must start at 0")));
    }

    for i in 1..ptrs.len() {
        if ptrs[i] < ptrs[i - 1] {
            return Err(RegridError::schema(format!(
                "{name} not monotonic at index {i}: {} < {}",
                ptrs[i],
                ptrs[i - 1]
            )));
        }
    }

    if ptrs[major] != nnz {
        return Err(RegridError::schema(format!(
            "{name} ends at {} but {nnz} values are stored",
            ptrs[major]
        )));
    }

    Ok(())
}

/// Compressed Sparse Row (CSR) matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Stored values.
    pub values: Vec<f64>,
    /// Column index of each value.
    pub col_indices: Vec<usize>,
    /// Row pointers (start index of each row).
    pub row_ptrs: Vec<usize>,
    /// Number of rows.
    pub nrows: usize,
    /// Number of columns.
    pub ncols: usize,
}

impl CsrMatrix {
    /// Create a CSR matrix from components.
    ///
    /// Column indices are not checked against `ncols`.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::Schema`] if the arrays are structurally
    /// inconsistent (length mismatch, non-monotonic pointers).
    pub fn new(
        values: Vec<f64>,
        col_indices: Vec<usize>,
        row_ptrs: Vec<usize>,
        nrows: usize,
        ncols: usize,
    ) -> Result<Self> {
        if values.len() != col_indices.len() {
            return Err(RegridError::schema(format!(
                "values length ({}) != col_indices length ({})",
                values.len(),
                col_indices.len()
            )));
        }
        validate_ptrs(&row_ptrs, nrows, values.len(), "row_ptrs")?;

        Ok(Self {
            values,
            col_indices,
            row_ptrs,
            nrows,
            ncols,
        })
    }

    /// Shape as `(nrows, ncols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of stored values.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate `(col, value)` pairs of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= nrows`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptrs[row]..self.row_ptrs[row + 1];
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Expand to parallel `(rows, cols, values)` columns.
    #[must_use]
    pub fn to_triplets(&self) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
        let mut rows = Vec::with_capacity(self.nnz());
        for r in 0..self.nrows {
            rows.extend(std::iter::repeat(r).take(self.row_ptrs[r + 1] - self.row_ptrs[r]));
        }
        (rows, self.col_indices.clone(), self.values.clone())
    }

    /// Convert to the canonical operator with this matrix's own shape.
    #[must_use]
    pub fn into_operator(self) -> WeightOperator {
        let (rows, cols, values) = self.to_triplets();
        let mut op = WeightOperator::new(self.nrows, self.ncols);
        for ((r, c), v) in rows.into_iter().zip(cols).zip(values) {
            op.push(r, c, v);
        }
        op
    }
}

/// Compressed Sparse Column (CSC) matrix.
///
/// Column access is what merging multi-part geometries needs: each
/// source column is a weight vector over destination cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    /// Stored values.
    pub values: Vec<f64>,
    /// Row index of each value.
    pub row_indices: Vec<usize>,
    /// Column pointers (start index of each column).
    pub col_ptrs: Vec<usize>,
    /// Number of rows.
    pub nrows: usize,
    /// Number of columns.
    pub ncols: usize,
}

impl CscMatrix {
    /// Create a CSC matrix from components.
    ///
    /// Row indices are not checked against `nrows`.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::Schema`] if the arrays are structurally
    /// inconsistent (length mismatch, non-monotonic pointers).
    pub fn new(
        values: Vec<f64>,
        row_indices: Vec<usize>,
        col_ptrs: Vec<usize>,
        nrows: usize,
        ncols: usize,
    ) -> Result<Self> {
        if values.len() != row_indices.len() {
            return Err(RegridError::schema(format!(
                "values length ({}) != row_indices length ({})",
                values.len(),
                row_indices.len()
            )));
        }
        validate_ptrs(&col_ptrs, ncols, values.len(), "col_ptrs")?;

        Ok(Self {
            values,
            row_indices,
            col_ptrs,
            nrows,
            ncols,
        })
    }

    /// Shape as `(nrows, ncols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of stored values.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate `(row, value)` pairs of one column.
    ///
    /// # Panics
    ///
    /// Panics if `col >= ncols`.
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.col_ptrs[col]..self.col_ptrs[col + 1];
        self.row_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Expand to parallel `(rows, cols, values)` columns.
    #[must_use]
    pub fn to_triplets(&self) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
        let mut cols = Vec::with_capacity(self.nnz());
        for c in 0..self.ncols {
            cols.extend(std::iter::repeat(c).take(self.col_ptrs[c + 1] - self.col_ptrs[c]));
        }
        (self.row_indices.clone(), cols, self.values.clone())
    }

    /// Convert to the canonical operator with this matrix's own shape.
    #[must_use]
    pub fn into_operator(self) -> WeightOperator {
        let (rows, cols, values) = self.to_triplets();
        let mut op = WeightOperator::new(self.nrows, self.ncols);
        for ((r, c), v) in rows.into_iter().zip(cols).zip(values) {
            op.push(r, c, v);
        }
        op
    }
}
