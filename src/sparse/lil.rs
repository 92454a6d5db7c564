//! List-of-lists layout for row-wise mutation.

use super::{DimLabels, WeightOperator};

/// Per-row lists of `(col, value)` pairs.
///
/// Changing the sparsity of a single row is O(1) amortized here, while
/// the COO form would have to be re-sorted to keep rows together.
///
/// # Examples
///
/// ```
/// use regrid_weights::sparse::WeightOperator;
///
/// let op = WeightOperator::from_triplets(3, 2, vec![2, 0], vec![1, 0], vec![1.0, 1.0])
///     .expect("equal lengths");
/// let lists = op.to_row_lists().expect("rows within n_out");
/// assert_eq!(lists.empty_rows(), vec![1]);
/// assert_eq!(lists.row(2), &[(1, 1.0)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RowLists {
    rows: Vec<Vec<(usize, f64)>>,
    n_in: usize,
    dims: DimLabels,
}

impl RowLists {
    /// Create `n_out` empty rows over `n_in` columns.
    #[must_use]
    pub fn new(n_out: usize, n_in: usize) -> Self {
        Self {
            rows: vec![Vec::new(); n_out],
            n_in,
            dims: DimLabels::default(),
        }
    }

    pub(crate) fn with_labels(mut self, dims: DimLabels) -> Self {
        self.dims = dims;
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn n_out(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_in(&self) -> usize {
        self.n_in
    }

    /// Entries stored in row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_out`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[(usize, f64)] {
        &self.rows[row]
    }

    /// Append an entry to row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_out`.
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        self.rows[row].push((col, value));
    }

    /// Indices of rows holding no entry at all.
    #[must_use]
    pub fn empty_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, entries)| entries.is_empty())
            .map(|(r, _)| r)
            .collect()
    }

    /// Total number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Convert back to the canonical COO form, in row-major order.
    #[must_use]
    pub fn into_operator(self) -> WeightOperator {
        let n_out = self.rows.len();
        let mut op = WeightOperator::new(n_out, self.n_in).with_labels(self.dims);
        for (r, entries) in self.rows.into_iter().enumerate() {
            for (c, v) in entries {
                op.push(r, c, v);
            }
        }
        op
    }
}
