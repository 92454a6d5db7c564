//! Missing-data propagation.
//!
//! A destination cell with no contributing source cell would regrid to
//! 0.0, indistinguishable from a genuine zero. [`inject_missing`] gives
//! every such row a single NaN weight in column 0, so that applying the
//! operator yields NaN there instead.

use crate::error::Result;
use crate::sparse::{Axis, WeightOperator};

/// Weight stored in otherwise empty rows.
pub const MISSING_MARKER: f64 = f64::NAN;

/// Rows that hold no stored entry at all.
///
/// A stored 0.0 counts as coverage.
#[must_use]
pub fn missing_rows(operator: &WeightOperator) -> Vec<usize> {
    operator
        .coverage()
        .into_iter()
        .enumerate()
        .filter(|(_, covered)| !covered)
        .map(|(r, _)| r)
        .collect()
}

/// Copy of `operator` with `(r, 0, NaN)` added to every empty row `r`.
///
/// Rows with at least one entry are untouched. The result is in row-major
/// entry order with the same shape and labels. With `n_in == 0` there is
/// no column to hold the marker and the operator is returned unchanged
/// once its rows are known to lie within `n_out`.
///
/// # Examples
///
/// ```
/// use regrid_weights::missing::inject_missing;
/// use regrid_weights::sparse::WeightOperator;
///
/// let op = WeightOperator::from_triplets(3, 2, vec![0, 2], vec![0, 1], vec![1.0, 1.0])
///     .expect("equal lengths");
/// let filled = inject_missing(&op).expect("rows within n_out");
/// assert_eq!(filled.nnz(), 3);
/// assert!(filled.get(1, 0).is_nan());
/// ```
///
/// # Errors
///
/// Returns [`crate::error::RegridError::ShapeMismatch`] if a stored row
/// index is `>= n_out`.
pub fn inject_missing(operator: &WeightOperator) -> Result<WeightOperator> {
    operator.check_axis_bound(Axis::Out)?;
    if operator.n_in() == 0 {
        tracing::debug!("operator has no source column, nothing to mark");
        return Ok(operator.clone());
    }

    let mut lists = operator.to_row_lists()?;
    let empty = lists.empty_rows();
    for &r in &empty {
        lists.push(r, 0, MISSING_MARKER);
    }

    tracing::debug!(
        injected = empty.len(),
        n_out = operator.n_out(),
        "marked uncovered destination cells as missing"
    );
    Ok(lists.into_operator())
}

impl WeightOperator {
    /// Method form of [`inject_missing`].
    ///
    /// # Errors
    ///
    /// See [`inject_missing`].
    pub fn with_missing_marked(&self) -> Result<Self> {
        inject_missing(self)
    }

    /// Method form of [`missing_rows`].
    #[must_use]
    pub fn missing_rows(&self) -> Vec<usize> {
        missing_rows(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DenseField;

    #[test]
    fn test_injects_one_nan_per_empty_row() {
        let op = WeightOperator::from_triplets(3, 2, vec![0, 2], vec![1, 0], vec![1.0, 1.0])
            .expect("valid");
        let filled = inject_missing(&op).expect("in range");

        assert_eq!(filled.nnz(), op.nnz() + 1);
        assert_eq!(filled.shape(), (3, 2));
        let nans: Vec<_> = filled.entries().filter(|(_, _, v)| v.is_nan()).collect();
        assert_eq!(nans.len(), 1);
        assert_eq!((nans[0].0, nans[0].1), (1, 0));

        let data = DenseField::new(vec![1, 2], vec![3.0, 4.0]).expect("valid");
        let out = filled.apply(&data, (1, 2), (3, 1)).expect("shapes agree");
        let values = out.field.as_slice();
        assert!((values[0] - 4.0).abs() < 1e-12);
        assert!(values[1].is_nan());
        assert!((values[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_zero_counts_as_covered() {
        let op = WeightOperator::from_triplets(2, 1, vec![0, 1], vec![0, 0], vec![0.0, 1.0])
            .expect("valid");
        let filled = inject_missing(&op).expect("in range");
        assert_eq!(filled.to_dense(), op.to_dense());
        assert!(missing_rows(&op).is_empty());
    }

    #[test]
    fn test_all_rows_empty() {
        let op = WeightOperator::new(3, 4);
        let filled = inject_missing(&op).expect("in range");
        assert_eq!(filled.nnz(), 3);
        assert!(filled.entries().all(|(_, c, v)| c == 0 && v.is_nan()));
        assert!(filled.missing_rows().is_empty());
    }

    #[test]
    fn test_no_source_columns_is_unchanged() {
        let op = WeightOperator::new(2, 0);
        assert_eq!(inject_missing(&op).expect("no-op"), op);
    }

    #[test]
    fn test_no_source_columns_still_checks_rows() {
        let op = WeightOperator::from_triplets(1, 0, vec![3], vec![0], vec![1.0]).expect("valid");
        assert!(inject_missing(&op).expect_err("row 3 >= n_out").is_shape_mismatch());
    }

    #[test]
    fn test_preserves_labels_and_is_pure() {
        let op = WeightOperator::from_triplets(2, 2, vec![1], vec![1], vec![1.0])
            .expect("valid")
            .with_dims("cell", "poly");
        let before = op.clone();
        let filled = op.with_missing_marked().expect("in range");
        assert_eq!(op, before);
        assert_eq!(filled.dims().out_dim, "cell");
        assert_eq!(filled.dims().in_dim, "poly");
    }

    #[test]
    fn test_missing_rows() {
        let op = WeightOperator::from_triplets(4, 1, vec![3, 1], vec![0, 0], vec![1.0, 1.0])
            .expect("valid");
        assert_eq!(op.missing_rows(), vec![0, 2]);
    }

    #[test]
    fn test_row_out_of_range() {
        let op = WeightOperator::from_triplets(1, 1, vec![4], vec![0], vec![1.0]).expect("valid");
        assert!(inject_missing(&op).expect_err("row 4 >= n_out").is_shape_mismatch());
    }
}
