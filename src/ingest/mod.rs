//! Weight ingestion.
//!
//! Every supported representation is normalized into one
//! [`WeightOperator`] with a caller-declared shape `(n_out, n_in)`:
//!
//! | Source | Fields | Index origin |
//! |--------|--------|--------------|
//! | [`WeightSource::Path`] | `row`, `col`, `value` (or `S`) | 1 |
//! | [`WeightSource::Dataset`] | `row`, `col`, `value` (or `S`) | 1 |
//! | [`WeightSource::Mapping`] | `row_dst`, `col_src`, `weights` | 1 |
//! | [`WeightSource::Raw`] | COO / CSR / CSC | 0 |
//! | [`WeightSource::Operator`] | passed through | 0 |
//!
//! Field names and the index origin of the first three come from
//! [`IngestConfig`]. Index upper bounds are not checked here;
//! [`crate::smm::apply`] rejects entries outside the shape.

mod dataset;
pub mod table;

pub use dataset::{Column, Dataset, WeightDict};
pub use table::{decode_table, encode_table, read_table};

use std::path::PathBuf;

use crate::config::IngestConfig;
use crate::error::{RegridError, Result};
use crate::sparse::{CscMatrix, CsrMatrix, WeightOperator};

/// Raw 0-based sparse matrix in one of the recognized layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSparse {
    /// Coordinate list
    Coo {
        /// Row indices
        rows: Vec<usize>,
        /// Column indices
        cols: Vec<usize>,
        /// Values
        values: Vec<f64>,
    },
    /// Compressed sparse rows
    Csr(CsrMatrix),
    /// Compressed sparse columns
    Csc(CscMatrix),
}

/// Any input accepted by [`ingest`].
#[derive(Debug, Clone)]
pub enum WeightSource {
    /// Persisted table on disk
    Path(PathBuf),
    /// In-memory named-column dataset
    Dataset(Dataset),
    /// Plain key-value mapping
    Mapping(WeightDict),
    /// Raw sparse matrix, already 0-based
    Raw(RawSparse),
    /// Already canonical; returned unchanged
    Operator(WeightOperator),
}

impl WeightSource {
    /// Short name of the source kind, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::Dataset(_) => "dataset",
            Self::Mapping(_) => "mapping",
            Self::Raw(RawSparse::Coo { .. }) => "coo",
            Self::Raw(RawSparse::Csr(_)) => "csr",
            Self::Raw(RawSparse::Csc(_)) => "csc",
            Self::Operator(_) => "operator",
        }
    }
}

impl From<PathBuf> for WeightSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&std::path::Path> for WeightSource {
    fn from(path: &std::path::Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for WeightSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Dataset> for WeightSource {
    fn from(dataset: Dataset) -> Self {
        Self::Dataset(dataset)
    }
}

impl From<WeightDict> for WeightSource {
    fn from(dict: WeightDict) -> Self {
        Self::Mapping(dict)
    }
}

impl From<RawSparse> for WeightSource {
    fn from(raw: RawSparse) -> Self {
        Self::Raw(raw)
    }
}

impl From<CsrMatrix> for WeightSource {
    fn from(csr: CsrMatrix) -> Self {
        Self::Raw(RawSparse::Csr(csr))
    }
}

impl From<CscMatrix> for WeightSource {
    fn from(csc: CscMatrix) -> Self {
        Self::Raw(RawSparse::Csc(csc))
    }
}

impl From<WeightOperator> for WeightSource {
    fn from(operator: WeightOperator) -> Self {
        Self::Operator(operator)
    }
}

/// Ingest weights with the default ESMF configuration.
///
/// # Examples
///
/// ```
/// use regrid_weights::ingest::{ingest, Dataset};
///
/// let ds = Dataset::new()
///     .with_column("row", vec![1i64])
///     .with_column("col", vec![1i64])
///     .with_column("value", vec![5.0]);
/// let op = ingest(ds, 2, 2).expect("complete dataset");
/// assert_eq!(op.shape(), (2, 2));
/// assert_eq!(op.get(0, 0), 5.0);
/// ```
///
/// # Errors
///
/// See [`ingest_with`].
pub fn ingest(
    source: impl Into<WeightSource>,
    n_in: usize,
    n_out: usize,
) -> Result<WeightOperator> {
    ingest_with(source, n_in, n_out, &IngestConfig::default())
}

/// Ingest weights into a [`WeightOperator`] of shape `(n_out, n_in)`.
///
/// An [`WeightSource::Operator`] is returned as is, whatever `n_in` and
/// `n_out` say.
///
/// # Errors
///
/// - [`RegridError::NotFound`] if a path does not exist
/// - [`RegridError::Schema`] if required fields are missing, differ in
///   length, or hold indices below the index base
/// - [`RegridError::Format`] / [`RegridError::Io`] if a table file cannot be read
pub fn ingest_with(
    source: impl Into<WeightSource>,
    n_in: usize,
    n_out: usize,
    config: &IngestConfig,
) -> Result<WeightOperator> {
    let source = source.into();
    let kind = source.kind();

    let operator = match source {
        WeightSource::Path(path) => {
            let dataset = read_table(&path)?;
            from_dataset(&dataset, n_in, n_out, config)?
        }
        WeightSource::Dataset(dataset) => from_dataset(&dataset, n_in, n_out, config)?,
        WeightSource::Mapping(dict) => from_mapping(&dict, n_in, n_out, config)?,
        WeightSource::Raw(raw) => from_raw(raw, n_in, n_out)?,
        WeightSource::Operator(operator) => operator,
    };

    tracing::debug!(
        source = kind,
        nnz = operator.nnz(),
        n_out = operator.n_out(),
        n_in = operator.n_in(),
        "ingested regridding weights"
    );
    Ok(operator)
}

fn from_dataset(
    dataset: &Dataset,
    n_in: usize,
    n_out: usize,
    config: &IngestConfig,
) -> Result<WeightOperator> {
    let schema = &config.table;
    let value = schema.value_candidates().find_map(|name| dataset.get(name));

    match (dataset.get(&schema.row), dataset.get(&schema.col), value) {
        (Some(row), Some(col), Some(value)) => {
            let names = (schema.row.as_str(), schema.col.as_str());
            build(row, col, value, n_in, n_out, config.index_base, names)
        }
        (row, col, value) => {
            let mut missing = Vec::new();
            if row.is_none() {
                missing.push(schema.row.as_str());
            }
            if col.is_none() {
                missing.push(schema.col.as_str());
            }
            if value.is_none() {
                missing.push(schema.value.as_str());
            }
            Err(RegridError::missing_fields("Weights dataset", &missing))
        }
    }
}

fn from_mapping(
    dict: &WeightDict,
    n_in: usize,
    n_out: usize,
    config: &IngestConfig,
) -> Result<WeightOperator> {
    let schema = &config.mapping;
    match (dict.get(&schema.row), dict.get(&schema.col), dict.get(&schema.value)) {
        (Some(row), Some(col), Some(value)) => {
            let names = (schema.row.as_str(), schema.col.as_str());
            build(row, col, value, n_in, n_out, config.index_base, names)
        }
        _ => {
            let missing: Vec<&str> = [&schema.row, &schema.col, &schema.value]
                .into_iter()
                .filter(|key| !dict.contains(key))
                .map(String::as_str)
                .collect();
            Err(RegridError::missing_fields("Weights mapping", &missing))
        }
    }
}

fn build(
    row: &Column,
    col: &Column,
    value: &Column,
    n_in: usize,
    n_out: usize,
    base: usize,
    (row_name, col_name): (&str, &str),
) -> Result<WeightOperator> {
    let rows = row.to_indices(base, row_name)?;
    let cols = col.to_indices(base, col_name)?;
    WeightOperator::from_triplets(n_out, n_in, rows, cols, value.to_f64())
}

fn from_raw(raw: RawSparse, n_in: usize, n_out: usize) -> Result<WeightOperator> {
    let (rows, cols, values) = match raw {
        RawSparse::Coo { rows, cols, values } => (rows, cols, values),
        RawSparse::Csr(csr) => csr.to_triplets(),
        RawSparse::Csc(csc) => csc.to_triplets(),
    };
    WeightOperator::from_triplets(n_out, n_in, rows, cols, values)
}
