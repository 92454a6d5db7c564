//! Dense N-dimensional fields.
//!
//! A field has shape `(*extra_dims, ny, nx)`: the trailing two axes are
//! the horizontal grid, everything before them (time, level, member) is
//! carried through regridding unchanged.

use crate::error::{RegridError, Result};

/// Element ordering of a [`DenseField`]'s buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryOrder {
    /// Last axis varies fastest (C order)
    #[default]
    RowMajor,
    /// First axis varies fastest (Fortran order)
    ColumnMajor,
}

/// Dense `f64` array with an explicit shape and memory order.
///
/// # Examples
///
/// ```
/// use regrid_weights::field::DenseField;
///
/// let field = DenseField::new(vec![2, 3, 4], vec![0.0; 24]).expect("24 = 2 * 3 * 4");
/// assert_eq!(field.extra_shape(), &[2]);
/// assert_eq!(field.spatial_shape(), Some((3, 4)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseField {
    shape: Vec<usize>,
    data: Vec<f64>,
    order: MemoryOrder,
}

/// Element count of `shape`, `None` on overflow.
fn expected_len(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

impl DenseField {
    /// Wrap a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if `data.len()` is not the
    /// product of `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        Self::with_order(shape, data, MemoryOrder::RowMajor)
    }

    /// Wrap a column-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if `data.len()` is not the
    /// product of `shape`.
    pub fn from_column_major(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        Self::with_order(shape, data, MemoryOrder::ColumnMajor)
    }

    /// Wrap a buffer in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if `data.len()` is not the
    /// product of `shape`.
    pub fn with_order(shape: Vec<usize>, data: Vec<f64>, order: MemoryOrder) -> Result<Self> {
        let Some(expected) = expected_len(&shape) else {
            return Err(RegridError::shape_mismatch(
                "field data length (product of shape)",
                shape,
                data.len(),
            ));
        };
        if data.len() != expected {
            return Err(RegridError::shape_mismatch(
                "field data length (product of shape)",
                expected,
                data.len(),
            ));
        }
        Ok(Self { shape, data, order })
    }

    /// Row-major field of zeros.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if the product of `shape`
    /// overflows `usize`.
    pub fn zeros(shape: Vec<usize>) -> Result<Self> {
        let Some(len) = expected_len(&shape) else {
            return Err(RegridError::shape_mismatch(
                "field element count (product of shape)",
                "at most usize::MAX",
                shape,
            ));
        };
        Ok(Self {
            shape,
            data: vec![0.0; len],
            order: MemoryOrder::RowMajor,
        })
    }

    /// Full shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the field holds no element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Memory order of the buffer.
    #[must_use]
    pub fn order(&self) -> MemoryOrder {
        self.order
    }

    /// True if the buffer is row-major.
    #[must_use]
    pub fn is_row_major(&self) -> bool {
        self.order == MemoryOrder::RowMajor
    }

    /// Leading (non-spatial) dimensions.
    #[must_use]
    pub fn extra_shape(&self) -> &[usize] {
        let split = self.shape.len().saturating_sub(2);
        &self.shape[..split]
    }

    /// Trailing `(ny, nx)`, or `None` for fields with fewer than two axes.
    #[must_use]
    pub fn spatial_shape(&self) -> Option<(usize, usize)> {
        match self.shape.as_slice() {
            [.., ny, nx] => Some((*ny, *nx)),
            _ => None,
        }
    }

    /// Element at a multi-index, honoring the memory order.
    #[must_use]
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() || index.iter().zip(&self.shape).any(|(i, n)| i >= n) {
            return None;
        }
        let offset = match self.order {
            MemoryOrder::RowMajor => index
                .iter()
                .zip(&self.shape)
                .fold(0, |acc, (&i, &n)| acc * n + i),
            MemoryOrder::ColumnMajor => index
                .iter()
                .zip(&self.shape)
                .rev()
                .fold(0, |acc, (&i, &n)| acc * n + i),
        };
        self.data.get(offset).copied()
    }

    /// Row-major copy; a plain clone when already row-major.
    #[must_use]
    pub fn to_row_major(&self) -> Self {
        if self.is_row_major() {
            return self.clone();
        }

        let ndim = self.shape.len();
        // column-major strides: first axis is contiguous
        let mut strides = vec![1usize; ndim];
        for k in 1..ndim {
            strides[k] = strides[k - 1] * self.shape[k - 1];
        }

        let mut data = Vec::with_capacity(self.data.len());
        let mut index = vec![0usize; ndim];
        for _ in 0..self.data.len() {
            let offset: usize = index.iter().zip(&strides).map(|(i, s)| i * s).sum();
            data.push(self.data[offset]);
            // advance the row-major multi-index, last axis fastest
            for k in (0..ndim).rev() {
                index[k] += 1;
                if index[k] < self.shape[k] {
                    break;
                }
                index[k] = 0;
            }
        }

        Self {
            shape: self.shape.clone(),
            data,
            order: MemoryOrder::RowMajor,
        }
    }

    /// Element-wise sum; the result is row-major.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::ShapeMismatch`] if the shapes differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.shape != other.shape {
            return Err(RegridError::shape_mismatch(
                "field addition",
                &self.shape,
                &other.shape,
            ));
        }
        let lhs = self.to_row_major();
        let rhs = other.to_row_major();
        let data = lhs.data.iter().zip(&rhs.data).map(|(a, b)| a + b).collect();
        Ok(Self {
            shape: lhs.shape,
            data,
            order: MemoryOrder::RowMajor,
        })
    }

    /// Raw buffer in the field's own memory order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the field, returning its buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
