//! Error types for weight ingestion and application.
//!
//! Every failure is typed and propagated to the caller. Non-fatal
//! anomalies (such as a column-major input field) are not errors; they
//! are reported through [`crate::diagnostics`].

use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for regridding operations.
///
/// # Examples
///
/// ```
/// use regrid_weights::error::RegridError;
///
/// let err = RegridError::shape_mismatch("shape_in", (10, 20), (10, 21));
/// assert!(err.to_string().contains("shape_in"));
/// assert!(err.to_string().contains("(10, 21)"));
/// ```
#[derive(Debug, Error)]
pub enum RegridError {
    /// The referenced weight table does not exist.
    #[error("Weight table not found on disk: {}", path.display())]
    NotFound {
        /// Location that was looked up
        path: PathBuf,
    },

    /// Required fields are missing or inconsistent in a dataset or mapping.
    #[error("Weight schema error: {message}")]
    Schema {
        /// What is wrong with the source
        message: String,
    },

    /// Declared shapes disagree with the data or the operator.
    #[error("Shape mismatch for {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which quantity was compared
        context: String,
        /// Expected dimensions
        expected: String,
        /// Dimensions actually found
        actual: String,
    },

    /// Weight table file exists but cannot be decoded.
    #[error("Invalid weight table format: {message}")]
    Format {
        /// Decoder error description
        message: String,
    },

    /// Any other I/O failure while reading a table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegridError {
    /// Create a shape mismatch error from any two debug-printable shapes.
    #[must_use]
    pub fn shape_mismatch(context: &str, expected: impl Debug, actual: impl Debug) -> Self {
        Self::ShapeMismatch {
            context: context.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Create a schema error listing the fields a source lacks.
    #[must_use]
    pub fn missing_fields(source: &str, fields: &[&str]) -> Self {
        Self::Schema {
            message: format!(
                "{source} should have fields {} storing the indices and values of weights",
                fields
                    .iter()
                    .map(|f| format!("`{f}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    /// Create a schema error with a free-form message.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a format error with a free-form message.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// True for [`RegridError::ShapeMismatch`].
    #[must_use]
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, RegridError>;
