//! Merging weights of multi-part source geometries.
//!
//! A logical source region split into several parts during weight
//! generation yields one operator column per part. Summing the columns
//! of each group recovers one column per logical region.

use crate::error::{RegridError, Result};
use crate::sparse::WeightOperator;

/// Sum the columns of `operator` by group.
///
/// `group_index[c]` is the logical source index of column `c`. The result
/// has `max(group_index) + 1` columns (0 for an empty index); a group that
/// no column maps to becomes an all-zero column. Rows with entries keep
/// entries even when their group sums to 0.0, so coverage is unchanged.
///
/// # Examples
///
/// ```
/// use regrid_weights::combine::combine_columns;
/// use regrid_weights::sparse::WeightOperator;
///
/// let op = WeightOperator::from_triplets(1, 3, vec![0, 0, 0], vec![0, 1, 2], vec![0.25, 0.25, 0.5])
///     .expect("equal lengths");
/// let merged = combine_columns(&op, &[0, 0, 1]).expect("one group per column");
/// assert_eq!(merged.shape(), (1, 2));
/// assert_eq!(merged.to_dense(), vec![0.5, 0.5]);
/// ```
///
/// # Errors
///
/// Returns [`RegridError::ShapeMismatch`] if `group_index.len() != n_in`
/// or a stored entry lies outside the operator shape.
pub fn combine_columns(operator: &WeightOperator, group_index: &[usize]) -> Result<WeightOperator> {
    let (n_out, n_in) = operator.shape();
    if group_index.len() != n_in {
        return Err(RegridError::shape_mismatch(
            "group_index length vs n_in",
            n_in,
            group_index.len(),
        ));
    }

    operator.check_bounds()?;

    let n_groups = group_index.iter().max().map_or(0, |&g| g + 1);
    let csc = operator.to_csc()?;

    // accumulate each group as a dense destination vector, remembering
    // which rows received any entry so stored zeros survive
    let mut out = WeightOperator::new(n_out, n_groups).with_labels(operator.dims().clone());
    let mut sums = vec![0.0; n_out];
    let mut touched = vec![false; n_out];
    let mut touched_rows = Vec::new();

    for (group, members) in columns_by_group(group_index, n_groups).into_iter().enumerate() {
        for col in members {
            for (r, v) in csc.column(col) {
                if !touched[r] {
                    touched[r] = true;
                    touched_rows.push(r);
                }
                sums[r] += v;
            }
        }

        touched_rows.sort_unstable();
        for &r in &touched_rows {
            out.push(r, group, sums[r]);
            sums[r] = 0.0;
            touched[r] = false;
        }
        touched_rows.clear();
    }

    tracing::debug!(
        n_in,
        n_groups,
        nnz = out.nnz(),
        "combined multi-part source columns"
    );
    Ok(out)
}

/// Member columns of each group, in ascending column order.
fn columns_by_group(group_index: &[usize], n_groups: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); n_groups];
    for (col, &g) in group_index.iter().enumerate() {
        groups[g].push(col);
    }
    groups
}

/// Stack operators side by side along the source axis.
///
/// Column `c` of the `k`-th operator becomes column `offset_k + c` where
/// `offset_k` is the total `n_in` of the operators before it. Labels are
/// taken from the first operator.
///
/// # Errors
///
/// Returns [`RegridError::Schema`] for an empty slice and
/// [`RegridError::ShapeMismatch`] if the operators disagree on `n_out` or
/// one of them stores an entry outside its own shape.
pub fn concat_columns(operators: &[WeightOperator]) -> Result<WeightOperator> {
    let Some(first) = operators.first() else {
        return Err(RegridError::schema("cannot concatenate zero operators"));
    };
    let n_out = first.n_out();
    if let Some(bad) = operators.iter().find(|op| op.n_out() != n_out) {
        return Err(RegridError::shape_mismatch(
            "n_out of concatenated operators",
            n_out,
            bad.n_out(),
        ));
    }

    let n_in: usize = operators.iter().map(WeightOperator::n_in).sum();
    let mut out = WeightOperator::new(n_out, n_in).with_labels(first.dims().clone());
    let mut offset = 0;
    for op in operators {
        op.check_bounds()?;
        for (r, c, v) in op.entries() {
            out.push(r, offset + c, v);
        }
        offset += op.n_in();
    }
    Ok(out)
}

/// Concatenate per-part operators, then sum their columns by group.
///
/// # Errors
///
/// Any error of [`concat_columns`] or [`combine_columns`].
pub fn combine_operators(
    operators: &[WeightOperator],
    group_index: &[usize],
) -> Result<WeightOperator> {
    let stacked = concat_columns(operators)?;
    combine_columns(&stacked, group_index)
}

impl WeightOperator {
    /// Method form of [`combine_columns`].
    ///
    /// # Errors
    ///
    /// See [`combine_columns`].
    pub fn combine_columns(&self, group_index: &[usize]) -> Result<Self> {
        combine_columns(self, group_index)
    }
}

#[cfg(test)]
#[path = "combine_tests.rs"]
mod tests;
