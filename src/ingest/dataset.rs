//! Named-column containers for weight tables.

use std::collections::BTreeMap;

use crate::config::TableSchema;
use crate::error::{RegridError, Result};
use crate::sparse::WeightOperator;

/// A numeric column, integer or floating point.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Integer column
    Int(Vec<i64>),
    /// Float column
    Float(Vec<f64>),
}

impl Column {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    /// True if the column has no element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name as stored in table headers.
    #[must_use]
    pub fn dtype(&self) -> &'static str {
        match self {
            Self::Int(_) => "I64",
            Self::Float(_) => "F64",
        }
    }

    /// Values as `f64`.
    #[must_use]
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Self::Int(v) => v.iter().map(|&x| x as f64).collect(),
            Self::Float(v) => v.clone(),
        }
    }

    /// Interpret the column as indices with origin `base`, shifting them to 0.
    ///
    /// Float columns are accepted when every value is finite and integral.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::Schema`] naming `field` if a value is below
    /// `base` or is not an integer.
    pub fn to_indices(&self, base: usize, field: &str) -> Result<Vec<usize>> {
        match self {
            Self::Int(v) => v.iter().map(|&x| shift_index(x, base, field)).collect(),
            Self::Float(v) => v
                .iter()
                .map(|&x| {
                    if !x.is_finite() || x.fract() != 0.0 {
                        return Err(RegridError::schema(format!(
                            "field `{field}` holds non-integral index {x}"
                        )));
                    }
                    shift_index(x as i64, base, field)
                })
                .collect(),
        }
    }
}

fn shift_index(value: i64, base: usize, field: &str) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .and_then(|v| v.checked_sub(base))
        .ok_or_else(|| {
            RegridError::schema(format!(
                "field `{field}` holds index {value} below the index base {base}"
            ))
        })
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Self::Int(values)
    }
}

impl From<Vec<i32>> for Column {
    fn from(values: Vec<i32>) -> Self {
        Self::Int(values.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Self::Float(values)
    }
}

/// In-memory dataset of named columns, mirroring a persisted weight table.
///
/// Columns may differ in length; only the weight fields are required to
/// agree, and that is checked on ingestion.
///
/// # Examples
///
/// ```
/// use regrid_weights::ingest::Dataset;
///
/// let ds = Dataset::new()
///     .with_column("row", vec![1i64, 2])
///     .with_column("col", vec![1i64, 1])
///     .with_column("S", vec![0.5, 0.5]);
/// assert_eq!(ds.column_names(), vec!["S", "col", "row"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: BTreeMap<String, Column>,
}

impl Dataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column, builder style.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.insert(name, column);
        self
    }

    /// Add or replace a column, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Option<Column> {
        self.columns.insert(name.into(), column.into())
    }

    /// Column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Whether a column exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Remove a column.
    pub fn remove(&mut self, name: &str) -> Option<Column> {
        self.columns.remove(name)
    }

    /// Column names, sorted.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the dataset has no column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate `(name, column)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Export an operator in the persisted layout.
    ///
    /// Indices are written as integers shifted to origin `index_base`;
    /// values go under `schema.value`.
    #[must_use]
    pub fn from_operator(
        operator: &WeightOperator,
        schema: &TableSchema,
        index_base: usize,
    ) -> Self {
        let base = index_base as i64;
        let mut rows = Vec::with_capacity(operator.nnz());
        let mut cols = Vec::with_capacity(operator.nnz());
        let mut values = Vec::with_capacity(operator.nnz());
        for (r, c, v) in operator.entries() {
            rows.push(r as i64 + base);
            cols.push(c as i64 + base);
            values.push(v);
        }

        Self::new()
            .with_column(schema.row.clone(), rows)
            .with_column(schema.col.clone(), cols)
            .with_column(schema.value.clone(), values)
    }
}

impl WeightOperator {
    /// Export to a [`Dataset`] with the default 1-based `row`/`col`/`value` layout.
    #[must_use]
    pub fn to_dataset(&self) -> Dataset {
        Dataset::from_operator(self, &TableSchema::default(), 1)
    }
}

/// Plain key-value weight mapping (`row_dst`, `col_src`, `weights`).
///
/// # Examples
///
/// ```
/// use regrid_weights::ingest::WeightDict;
///
/// let dict = WeightDict::new()
///     .with_entry("row_dst", vec![1i64])
///     .with_entry("col_src", vec![2i64])
///     .with_entry("weights", vec![1.0]);
/// assert!(dict.contains("weights"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightDict {
    entries: BTreeMap<String, Column>,
}

impl WeightDict {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, builder style.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, values: impl Into<Column>) -> Self {
        self.insert(key, values);
        self
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, values: impl Into<Column>) -> Option<Column> {
        self.entries.insert(key.into(), values.into())
    }

    /// Entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Column> {
        self.entries.get(key)
    }

    /// Whether a key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl<K: Into<String>, V: Into<Column>> FromIterator<(K, V)> for WeightDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
