//! Sparse matrix multiplication of weights against gridded fields.
//!
//! A field of shape `(*extra_dims, ny_in, nx_in)` is viewed as a
//! `(batch, n_in)` matrix, multiplied by the transposed operator and
//! reshaped to `(*extra_dims, ny_out, nx_out)`. Leading dimensions keep
//! their order.

use crate::diagnostics::{CollectingHandler, Diagnostic, DiagnosticHandler};
use crate::error::{RegridError, Result};
use crate::field::DenseField;
use crate::sparse::WeightOperator;

/// Regridded field together with the diagnostics raised while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// Row-major result of shape `(*extra_dims, ny_out, nx_out)`
    pub field: DenseField,
    /// Non-fatal diagnostics, in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
}

impl Applied {
    /// Drop the diagnostics.
    #[must_use]
    pub fn into_field(self) -> DenseField {
        self.field
    }
}

/// Apply `operator` to `data`, returning diagnostics with the result.
///
/// # Examples
///
/// ```
/// use regrid_weights::field::DenseField;
/// use regrid_weights::smm::apply;
/// use regrid_weights::sparse::WeightOperator;
///
/// // average a 1x2 grid into a single cell
/// let op = WeightOperator::from_triplets(1, 2, vec![0, 0], vec![0, 1], vec![0.5, 0.5])
///     .expect("equal lengths");
/// let data = DenseField::new(vec![1, 2], vec![2.0, 4.0]).expect("2 elements");
/// let out = apply(&op, &data, (1, 2), (1, 1)).expect("shapes agree");
/// assert_eq!(out.field.as_slice(), &[3.0]);
/// assert!(out.diagnostics.is_empty());
/// ```
///
/// # Errors
///
/// See [`apply_with`].
pub fn apply(
    operator: &WeightOperator,
    data: &DenseField,
    shape_in: (usize, usize),
    shape_out: (usize, usize),
) -> Result<Applied> {
    let collector = CollectingHandler::new();
    let field = apply_with(operator, data, shape_in, shape_out, &collector)?;
    Ok(Applied {
        field,
        diagnostics: collector.drain(),
    })
}

/// Apply `operator` to `data`, sending diagnostics to `handler`.
///
/// Every precondition is checked before any arithmetic, so a failed call
/// produces no partial output.
///
/// # Errors
///
/// Returns [`RegridError::ShapeMismatch`] if
/// - `data` has fewer than two dimensions,
/// - its trailing two dimensions differ from `shape_in`,
/// - `shape_in` does not multiply to `n_in` or `shape_out` to `n_out`,
/// - a stored entry lies outside the operator shape.
pub fn apply_with(
    operator: &WeightOperator,
    data: &DenseField,
    shape_in: (usize, usize),
    shape_out: (usize, usize),
    handler: &dyn DiagnosticHandler,
) -> Result<DenseField> {
    let (n_out, n_in) = operator.shape();

    let Some(spatial) = data.spatial_shape() else {
        return Err(RegridError::shape_mismatch(
            "number of data dimensions (at least 2)",
            2,
            data.ndim(),
        ));
    };
    if spatial != shape_in {
        return Err(RegridError::shape_mismatch(
            "trailing data dimensions vs shape_in",
            shape_in,
            spatial,
        ));
    }
    check_grid_size("n_in vs product of shape_in", n_in, shape_in)?;
    check_grid_size("n_out vs product of shape_out", n_out, shape_out)?;
    operator.check_bounds()?;

    let converted;
    let data = if data.is_row_major() {
        data
    } else {
        handler.on_diagnostic(&Diagnostic::NonContiguousLayout {
            shape: data.shape().to_vec(),
        });
        converted = data.to_row_major();
        &converted
    };

    let uncovered = operator.coverage().iter().filter(|covered| !**covered).count();
    if uncovered > 0 {
        handler.on_diagnostic(&Diagnostic::UncoveredRows {
            count: uncovered,
            n_out,
        });
    }

    let extra = data.extra_shape();
    let batch: usize = extra.iter().product();
    tracing::debug!(batch, n_in, n_out, nnz = operator.nnz(), "applying regridding weights");

    let Some(out_len) = batch.checked_mul(n_out) else {
        return Err(RegridError::shape_mismatch(
            "output length (batch * n_out)",
            usize::MAX,
            (batch, n_out),
        ));
    };

    let input = data.as_slice();
    let mut output = vec![0.0; out_len];
    let sources = input.chunks_exact(n_in.max(1));
    let targets = output.chunks_exact_mut(n_out.max(1));
    for (src, dst) in sources.zip(targets) {
        for (r, c, w) in operator.entries() {
            dst[r] += w * src[c];
        }
    }

    let mut shape = extra.to_vec();
    shape.extend([shape_out.0, shape_out.1]);
    DenseField::new(shape, output)
}

/// `ny * nx` must equal the operator axis length; an overflowing product
/// never does.
fn check_grid_size(context: &str, expected: usize, grid: (usize, usize)) -> Result<()> {
    match grid.0.checked_mul(grid.1) {
        Some(size) if size == expected => Ok(()),
        Some(size) => Err(RegridError::shape_mismatch(context, expected, size)),
        None => Err(RegridError::shape_mismatch(context, expected, grid)),
    }
}

impl WeightOperator {
    /// Method form of [`apply`].
    ///
    /// # Errors
    ///
    /// See [`apply_with`].
    pub fn apply(
        &self,
        data: &DenseField,
        shape_in: (usize, usize),
        shape_out: (usize, usize),
    ) -> Result<Applied> {
        apply(self, data, shape_in, shape_out)
    }
}

#[cfg(test)]
#[path = "smm_tests.rs"]
mod tests;
