//! Sparse weight operators.
//!
//! The canonical form is [`WeightOperator`], a coordinate-list (COO)
//! matrix of `(row, col, value)` triples with a caller-declared shape
//! `(n_out, n_in)`. COO is cheap to build and to stream through during
//! application; operations with other access patterns convert explicitly:
//!
//! - [`RowLists`] (list of lists): row-wise mutation, used to fill
//!   uncovered rows with the missing-data marker.
//! - [`CsrMatrix`] (compressed rows): raw input format, row traversal.
//! - [`CscMatrix`] (compressed columns): column-wise reduction when
//!   merging multi-part geometries.
//!
//! No conversion drops stored zeros or merges duplicates, so the
//! coverage of every row (whether it holds any entry at all) survives a
//! round trip.
//!
//! # Example
//! ```text
//! Dense (n_out=3, n_in=3):   COO:
//!   [[0.5, 0.5, 0.0],          rows:   [0, 0, 2]
//!    [0.0, 0.0, 0.0],          cols:   [0, 1, 2]
//!    [0.0, 0.0, 1.0]]          values: [0.5, 0.5, 1.0]
//! ```
//! Row 1 has no entries: the destination cell is not covered.

mod compressed;
mod lil;

pub use compressed::{CscMatrix, CsrMatrix};
pub use lil::RowLists;

use crate::error::{RegridError, Result};
use serde::{Deserialize, Serialize};

/// Logical names of the operator axes.
///
/// Bookkeeping only; numeric semantics never depend on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimLabels {
    /// Name of the destination axis (length `n_out`)
    pub out_dim: String,
    /// Name of the source axis (length `n_in`)
    pub in_dim: String,
}

impl Default for DimLabels {
    fn default() -> Self {
        Self {
            out_dim: "out_dim".to_string(),
            in_dim: "in_dim".to_string(),
        }
    }
}

/// Canonical sparse regridding operator in coordinate-list form.
///
/// The shape is fixed at construction and never inferred from the stored
/// indices: trailing empty rows or columns are legal. Duplicate
/// `(row, col)` pairs are summed by every consumer.
///
/// # Examples
///
/// ```
/// use regrid_weights::sparse::WeightOperator;
///
/// let op = WeightOperator::from_triplets(3, 2, vec![0, 0, 2], vec![0, 1, 1], vec![0.25, 0.75, 1.0])
///     .expect("parallel columns have equal length");
/// assert_eq!(op.shape(), (3, 2));
/// assert_eq!(op.nnz(), 3);
/// assert_eq!(op.coverage(), vec![true, false, true]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOperator")]
pub struct WeightOperator {
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
    n_out: usize,
    n_in: usize,
    dims: DimLabels,
}

/// Serialized operator fields, validated by [`WeightOperator::from_triplets`].
#[derive(Deserialize)]
struct RawOperator {
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
    n_out: usize,
    n_in: usize,
    #[serde(default)]
    dims: DimLabels,
}

impl TryFrom<RawOperator> for WeightOperator {
    type Error = RegridError;

    fn try_from(raw: RawOperator) -> Result<Self> {
        let op = Self::from_triplets(raw.n_out, raw.n_in, raw.rows, raw.cols, raw.values)?;
        Ok(op.with_labels(raw.dims))
    }
}

impl WeightOperator {
    /// Create an operator with no entries.
    #[must_use]
    pub fn new(n_out: usize, n_in: usize) -> Self {
        Self {
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
            n_out,
            n_in,
            dims: DimLabels::default(),
        }
    }

    /// Create an operator from parallel 0-based index and value columns.
    ///
    /// Index ranges are not checked here; [`crate::smm::apply`] rejects
    /// entries outside the declared shape.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::Schema`] if the three columns differ in length.
    pub fn from_triplets(
        n_out: usize,
        n_in: usize,
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(RegridError::schema(format!(
                "row ({}), col ({}) and value ({}) columns must have equal length",
                rows.len(),
                cols.len(),
                values.len()
            )));
        }

        Ok(Self {
            rows,
            cols,
            values,
            n_out,
            n_in,
            dims: DimLabels::default(),
        })
    }

    /// Create the `n x n` identity operator.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self {
            rows: (0..n).collect(),
            cols: (0..n).collect(),
            values: vec![1.0; n],
            n_out: n,
            n_in: n,
            dims: DimLabels::default(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    /// Replace the axis labels.
    #[must_use]
    pub fn with_dims(mut self, out_dim: impl Into<String>, in_dim: impl Into<String>) -> Self {
        self.dims = DimLabels {
            out_dim: out_dim.into(),
            in_dim: in_dim.into(),
        };
        self
    }

    pub(crate) fn with_labels(mut self, dims: DimLabels) -> Self {
        self.dims = dims;
        self
    }

    /// Axis labels.
    #[must_use]
    pub fn dims(&self) -> &DimLabels {
        &self.dims
    }

    /// Shape as `(n_out, n_in)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_out, self.n_in)
    }

    /// Number of destination cells.
    #[must_use]
    pub fn n_out(&self) -> usize {
        self.n_out
    }

    /// Number of source cells.
    #[must_use]
    pub fn n_in(&self) -> usize {
        self.n_in
    }

    /// Number of stored entries, duplicates and explicit zeros included.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// True if no entry is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate stored entries as `(row, col, value)`.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(self.cols.iter())
            .zip(self.values.iter())
            .map(|((&r, &c), &v)| (r, c, v))
    }

    pub(crate) fn into_parts(self) -> (Vec<usize>, Vec<usize>, Vec<f64>, DimLabels) {
        (self.rows, self.cols, self.values, self.dims)
    }

    /// Value at `(row, col)`, summing duplicates; 0.0 if nothing is stored.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.entries()
            .filter(|&(r, c, _)| r == row && c == col)
            .map(|(_, _, v)| v)
            .sum()
    }

    /// Dense row-major copy of shape `(n_out, n_in)`.
    ///
    /// Duplicates are summed; entries outside the shape are skipped.
    #[must_use]
    pub fn to_dense(&self) -> Vec<f64> {
        let mut data = vec![0.0; self.n_out * self.n_in];
        for (r, c, v) in self.entries() {
            if r < self.n_out && c < self.n_in {
                data[r * self.n_in + c] += v;
            }
        }
        data
    }

    /// Number of stored entries per destination row.
    #[must_use]
    pub fn row_nnz(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_out];
        for &r in &self.rows {
            if r < self.n_out {
                counts[r] += 1;
            }
        }
        counts
    }

    /// Whether each destination row holds at least one entry.
    ///
    /// A stored 0.0 counts as coverage.
    #[must_use]
    pub fn coverage(&self) -> Vec<bool> {
        self.row_nnz().into_iter().map(|n| n > 0).collect()
    }

    /// Sum of weights per destination row.
    ///
    /// Well-formed conservative weights sum to ~1 on fully covered cells;
    /// this is reported, not enforced.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_out];
        for (r, _, v) in self.entries() {
            if r < self.n_out {
                sums[r] += v;
            }
        }
        sums
    }

    /// Fraction of the dense matrix not stored.
    #[must_use]
    pub fn sparsity(&self) -> f64 {
        let total = self.n_out * self.n_in;
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.nnz() as f64 / total as f64)
    }

    /// Canonical copy: entries sorted by `(row, col)` with duplicates summed.
    #[must_use]
    pub fn sum_duplicates(&self) -> Self {
        let mut entries: Vec<(usize, usize, f64)> = self.entries().collect();
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut out = Self::new(self.n_out, self.n_in).with_labels(self.dims.clone());
        for (r, c, v) in entries {
            let same_cell = out.rows.last() == Some(&r) && out.cols.last() == Some(&c);
            if !same_cell {
                out.push(r, c, v);
            } else if let Some(last) = out.values.last_mut() {
                *last += v;
            }
        }
        out
    }

    /// Check that every entry lies inside `(n_out, n_in)`.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] naming the first offending entry.
    pub fn check_bounds(&self) -> Result<()> {
        match self
            .entries()
            .find(|&(r, c, _)| r >= self.n_out || c >= self.n_in)
        {
            Some((r, c, _)) => Err(RegridError::shape_mismatch(
                "weight entry (row, col) within operator shape",
                (self.n_out, self.n_in),
                (r, c),
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn check_axis_bound(&self, axis: Axis) -> Result<()> {
        let (indices, bound, context) = match axis {
            Axis::Out => (&self.rows, self.n_out, "weight row index < n_out"),
            Axis::In => (&self.cols, self.n_in, "weight column index < n_in"),
        };
        match indices.iter().find(|&&i| i >= bound) {
            Some(&i) => Err(RegridError::shape_mismatch(context, bound, i)),
            None => Ok(()),
        }
    }

    /// Convert to per-row lists for row-wise mutation.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if a row index is `>= n_out`.
    pub fn to_row_lists(&self) -> Result<RowLists> {
        self.check_axis_bound(Axis::Out)?;
        let mut lists = RowLists::new(self.n_out, self.n_in).with_labels(self.dims.clone());
        for (r, c, v) in self.entries() {
            lists.push(r, c, v);
        }
        Ok(lists)
    }

    /// Convert to compressed sparse rows.
    ///
    /// Entries keep their relative order within each row.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if a row index is `>= n_out`.
    pub fn to_csr(&self) -> Result<CsrMatrix> {
        self.check_axis_bound(Axis::Out)?;
        let (row_ptrs, order) = compress(&self.rows, self.n_out);
        Ok(CsrMatrix {
            values: order.iter().map(|&i| self.values[i]).collect(),
            col_indices: order.iter().map(|&i| self.cols[i]).collect(),
            row_ptrs,
            nrows: self.n_out,
            ncols: self.n_in,
        })
    }

    /// Convert to compressed sparse columns.
    ///
    /// Entries keep their relative order within each column.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if a column index is `>= n_in`.
    pub fn to_csc(&self) -> Result<CscMatrix> {
        self.check_axis_bound(Axis::In)?;
        let (col_ptrs, order) = compress(&self.cols, self.n_in);
        Ok(CscMatrix {
            values: order.iter().map(|&i| self.values[i]).collect(),
            row_indices: order.iter().map(|&i| self.rows[i]).collect(),
            col_ptrs,
            nrows: self.n_out,
            ncols: self.n_in,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Out,
    In,
}

/// Stable counting sort of entry positions by `keys`.
///
/// Returns the pointer array (`len + 1`) and the permutation of entry
/// positions grouped by key. All keys must be `< len`.
fn compress(keys: &[usize], len: usize) -> (Vec<usize>, Vec<usize>) {
    let mut ptrs = vec![0usize; len + 1];
    for &k in keys {
        ptrs[k + 1] += 1;
    }
    for i in 1..ptrs.len() {
        ptrs[i] += ptrs[i - 1];
    }

    let mut next = ptrs.clone();
    let mut order = vec![0usize; keys.len()];
    for (pos, &k) in keys.iter().enumerate() {
        order[next[k]] = pos;
        next[k] += 1;
    }
    (ptrs, order)
}
