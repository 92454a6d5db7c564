//! Ingestion configuration: field names and index base.
//!
//! Defaults match the ESMF conventions: persisted tables carry `row`,
//! `col` and `value` (or the native `S`), in-memory mappings carry
//! `row_dst`, `col_src` and `weights`, and all indices are 1-based.

use serde::{Deserialize, Serialize};

/// Field names looked up in persisted tables and in-memory datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    /// Destination (row) index field
    pub row: String,
    /// Source (column) index field
    pub col: String,
    /// Weight value field
    pub value: String,
    /// Accepted alternatives for `value`, tried in order
    pub value_aliases: Vec<String>,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            row: "row".to_string(),
            col: "col".to_string(),
            value: "value".to_string(),
            value_aliases: vec!["S".to_string()],
        }
    }
}

impl TableSchema {
    /// Names that may hold the weight values, primary name first.
    pub fn value_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.value.as_str()).chain(self.value_aliases.iter().map(String::as_str))
    }
}

/// Key names looked up in plain weight mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingSchema {
    /// Destination index key
    pub row: String,
    /// Source index key
    pub col: String,
    /// Weight value key
    pub value: String,
}

impl Default for MappingSchema {
    fn default() -> Self {
        Self {
            row: "row_dst".to_string(),
            col: "col_src".to_string(),
            value: "weights".to_string(),
        }
    }
}

/// Configuration for [`crate::ingest::ingest_with`].
///
/// # Examples
///
/// ```
/// use regrid_weights::config::IngestConfig;
///
/// let config = IngestConfig::default().with_value_field("frac");
/// assert_eq!(config.table.value, "frac");
/// assert_eq!(config.index_base, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Schema for paths and datasets
    pub table: TableSchema,
    /// Schema for mappings
    pub mapping: MappingSchema,
    /// Origin of stored indices; subtracted on ingestion
    pub index_base: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            table: TableSchema::default(),
            mapping: MappingSchema::default(),
            index_base: 1,
        }
    }
}

impl IngestConfig {
    /// Create the default ESMF-compatible configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index origin (1 for ESMF tables, 0 for pre-shifted data).
    #[must_use]
    pub fn with_index_base(mut self, base: usize) -> Self {
        self.index_base = base;
        self
    }

    /// Set the table field holding weight values.
    #[must_use]
    pub fn with_value_field(mut self, name: impl Into<String>) -> Self {
        self.table.value = name.into();
        self
    }

    /// Replace the table schema.
    #[must_use]
    pub fn with_table_schema(mut self, schema: TableSchema) -> Self {
        self.table = schema;
        self
    }

    /// Replace the mapping schema.
    #[must_use]
    pub fn with_mapping_schema(mut self, schema: MappingSchema) -> Self {
        self.mapping = schema;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_names() {
        let config = IngestConfig::default();
        assert_eq!(config.table.row, "row");
        assert_eq!(config.table.col, "col");
        assert_eq!(config.table.value, "value");
        assert_eq!(config.mapping.row, "row_dst");
        assert_eq!(config.mapping.col, "col_src");
        assert_eq!(config.mapping.value, "weights");
    }

    #[test]
    fn test_value_candidates_order() {
        let schema = TableSchema::default();
        let names: Vec<&str> = schema.value_candidates().collect();
        assert_eq!(names, vec!["value", "S"]);
    }

    #[test]
    fn test_builders() {
        let config = IngestConfig::new()
            .with_index_base(0)
            .with_value_field("frac");
        assert_eq!(config.index_base, 0);
        assert_eq!(config.table.value, "frac");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: IngestConfig =
            serde_json::from_str(r#"{"table": {"value": "S"}}"#).expect("valid config json");
        assert_eq!(config.index_base, 1);
        assert_eq!(config.table.value, "S");
        assert_eq!(config.table.row, "row");
        assert_eq!(config.mapping, MappingSchema::default());
    }
}
