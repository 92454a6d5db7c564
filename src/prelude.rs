//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use regrid_weights::prelude::*;
//! ```

pub use crate::combine::{combine_columns, combine_operators, concat_columns};
pub use crate::config::IngestConfig;
pub use crate::diagnostics::{CollectingHandler, Diagnostic, DiagnosticHandler, TracingHandler};
pub use crate::error::{RegridError, Result};
pub use crate::field::{DenseField, MemoryOrder};
pub use crate::ingest::{ingest, ingest_with, Dataset, RawSparse, WeightDict, WeightSource};
pub use crate::missing::{inject_missing, missing_rows, MISSING_MARKER};
pub use crate::smm::{apply, apply_with, Applied};
pub use crate::sparse::WeightOperator;
