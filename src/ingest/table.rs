//! Persisted weight tables.
//!
//! Two on-disk layouts are understood:
//!
//! - **Tensor container** (any extension except `.json`):
//!
//!   ```text
//!   [8-byte LE header length][JSON header][raw little-endian data]
//!   ```
//!
//!   The header maps each column name to `{dtype, shape, data_offsets}`,
//!   offsets being relative to the start of the data section. Supported
//!   dtypes are `I32`, `I64`, `F32` and `F64`. Keys starting with `__`
//!   (such as `__metadata__`) are skipped.
//!
//! - **JSON table** (`.json`): an object whose numeric arrays become
//!   columns. Arrays holding only integers become integer columns; other
//!   values are ignored.
//!
//! Container files are read through a read-only memory map.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::dataset::{Column, Dataset};
use crate::error::{RegridError, Result};

/// Header entry of one column in a tensor container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Element type (`I32`, `I64`, `F32`, `F64`)
    pub dtype: String,
    /// Shape; weight columns are one-dimensional
    pub shape: Vec<usize>,
    /// `[start, end)` byte range in the data section
    pub data_offsets: [usize; 2],
}

/// Parsed container header, sorted by column name.
pub type TableHeader = BTreeMap<String, ColumnMetadata>;

/// Read-only memory map of a table file.
#[derive(Debug)]
struct MappedTable {
    mmap: memmap2::Mmap,
}

#[allow(unsafe_code)]
impl MappedTable {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the file is opened read-only and the map never outlives
        // this call's decoding; concurrent truncation by another process
        // is outside what a reader can guard against.
        let mmap = unsafe { memmap2::MmapOptions::new().map(&file)? };
        Ok(Self { mmap })
    }

    fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

/// Read a weight table from disk.
///
/// # Errors
///
/// - [`RegridError::NotFound`] if `path` does not exist
/// - [`RegridError::Format`] if the file cannot be decoded
/// - [`RegridError::Io`] for other read failures
pub fn read_table(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RegridError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let bytes = std::fs::read(path)?;
        decode_json(&bytes)
    } else if std::fs::metadata(path)?.len() == 0 {
        // mapping an empty file fails on some platforms
        Err(RegridError::format("table file is empty"))
    } else {
        let mapped = MappedTable::open(path)?;
        decode_table(mapped.as_slice())
    }
}

/// Split a container into its header and data section.
fn split_header(bytes: &[u8]) -> Result<(TableHeader, &[u8])> {
    let Some(len_bytes) = bytes.get(..8) else {
        return Err(RegridError::format(format!(
            "file is {} bytes, need at least 8 bytes for header",
            bytes.len()
        )));
    };
    let mut raw_len = [0u8; 8];
    raw_len.copy_from_slice(len_bytes);
    let header_len = usize::try_from(u64::from_le_bytes(raw_len))
        .map_err(|_| RegridError::format("header length does not fit in memory"))?;

    if header_len == 0 {
        return Err(RegridError::format("header length is 0"));
    }
    let data_start = header_len
        .checked_add(8)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            RegridError::format(format!("header length {header_len} exceeds file size"))
        })?;

    let raw: serde_json::Value = serde_json::from_slice(&bytes[8..data_start])
        .map_err(|e| RegridError::format(format!("header JSON parsing failed: {e}")))?;
    let serde_json::Value::Object(map) = raw else {
        return Err(RegridError::format("header is not a JSON object"));
    };

    let mut header = TableHeader::new();
    for (key, value) in map {
        if key.starts_with("__") {
            continue;
        }
        let meta: ColumnMetadata = serde_json::from_value(value)
            .map_err(|e| RegridError::format(format!("bad header entry `{key}`: {e}")))?;
        header.insert(key, meta);
    }

    Ok((header, &bytes[data_start..]))
}

/// Decode a tensor container held in memory.
///
/// # Errors
///
/// Returns [`RegridError::Format`] on a malformed header, out-of-range
/// offsets, or an unsupported dtype.
pub fn decode_table(bytes: &[u8]) -> Result<Dataset> {
    let (header, data) = split_header(bytes)?;
    let mut dataset = Dataset::new();
    for (name, meta) in header {
        let column = extract_column(data, &name, &meta)?;
        dataset.insert(name, column);
    }
    Ok(dataset)
}

fn extract_column(data: &[u8], name: &str, meta: &ColumnMetadata) -> Result<Column> {
    let [start, end] = meta.data_offsets;
    if start > end || end > data.len() {
        return Err(RegridError::format(format!(
            "column `{name}` has invalid data offsets [{start}, {end}) for {} data bytes",
            data.len()
        )));
    }
    let bytes = &data[start..end];

    let column = match meta.dtype.as_str() {
        "I32" => Column::Int(
            chunks::<4>(bytes, name)?
                .map(|b| i64::from(i32::from_le_bytes(b)))
                .collect(),
        ),
        "I64" => Column::Int(chunks::<8>(bytes, name)?.map(i64::from_le_bytes).collect()),
        "F32" => Column::Float(
            chunks::<4>(bytes, name)?
                .map(|b| f64::from(f32::from_le_bytes(b)))
                .collect(),
        ),
        "F64" => Column::Float(chunks::<8>(bytes, name)?.map(f64::from_le_bytes).collect()),
        other => {
            return Err(RegridError::format(format!(
                "column `{name}` has unsupported dtype {other}. Supported: I32, I64, F32, F64"
            )))
        }
    };

    let expected: usize = meta.shape.iter().product();
    if column.len() != expected {
        return Err(RegridError::format(format!(
            "column `{name}` declares shape {:?} but holds {} elements",
            meta.shape,
            column.len()
        )));
    }
    Ok(column)
}

/// Iterate fixed-size little-endian words.
fn chunks<'a, const N: usize>(
    bytes: &'a [u8],
    name: &str,
) -> Result<impl Iterator<Item = [u8; N]> + 'a> {
    if bytes.len() % N != 0 {
        return Err(RegridError::format(format!(
            "column `{name}` byte size {} is not a multiple of {N}",
            bytes.len()
        )));
    }
    Ok(bytes.chunks_exact(N).map(|chunk| {
        let mut word = [0u8; N];
        word.copy_from_slice(chunk);
        word
    }))
}

fn decode_json(bytes: &[u8]) -> Result<Dataset> {
    let raw: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| RegridError::format(format!("JSON table parsing failed: {e}")))?;
    let serde_json::Value::Object(map) = raw else {
        return Err(RegridError::format("JSON table must be an object of arrays"));
    };

    let mut dataset = Dataset::new();
    for (name, value) in map {
        let Some(items) = value.as_array() else {
            tracing::debug!(field = %name, "skipping non-array field in JSON table");
            continue;
        };
        let ints: Option<Vec<i64>> = items.iter().map(serde_json::Value::as_i64).collect();
        if let Some(ints) = ints {
            dataset.insert(name, Column::Int(ints));
        } else if let Some(floats) =
            items.iter().map(serde_json::Value::as_f64).collect::<Option<Vec<_>>>()
        {
            dataset.insert(name, Column::Float(floats));
        } else {
            tracing::debug!(field = %name, "skipping non-numeric field in JSON table");
        }
    }
    Ok(dataset)
}

/// Encode a dataset as a tensor container.
///
/// Integer columns are written as `I64`, float columns as `F64`.
///
/// # Errors
///
/// Returns [`RegridError::Format`] if the header cannot be serialized.
pub fn encode_table(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut header = TableHeader::new();
    let mut data = Vec::new();

    for (name, column) in dataset.iter() {
        let start = data.len();
        match column {
            Column::Int(values) => {
                for v in values {
                    data.extend_from_slice(&v.to_le_bytes());
                }
            }
            Column::Float(values) => {
                for v in values {
                    data.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
        header.insert(
            name.to_string(),
            ColumnMetadata {
                dtype: column.dtype().to_string(),
                shape: vec![column.len()],
                data_offsets: [start, data.len()],
            },
        );
    }

    let header_json = serde_json::to_vec(&header)
        .map_err(|e| RegridError::format(format!("header serialization failed: {e}")))?;

    let mut output = Vec::with_capacity(8 + header_json.len() + data.len());
    output.extend_from_slice(&(header_json.len() as u64).to_le_bytes());
    output.extend_from_slice(&header_json);
    output.extend_from_slice(&data);
    Ok(output)
}
