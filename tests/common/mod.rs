//! Shared fixtures for integration tests.

#![allow(dead_code)]

use regrid_weights::prelude::*;

/// Conservative-style weights from a 2x3 source grid to a 1x2 destination:
/// each destination cell averages one source row, stored 1-based.
pub fn row_average_table() -> Dataset {
    Dataset::new()
        .with_column("row", vec![1i64, 1, 1, 2, 2, 2])
        .with_column("col", vec![1i64, 2, 3, 4, 5, 6])
        .with_column("S", vec![1.0 / 3.0; 6])
}

/// Field of shape `shape` holding `0, 1, 2, ...` in row-major order.
pub fn ramp(shape: Vec<usize>) -> DenseField {
    let n: usize = shape.iter().product();
    DenseField::new(shape, (0..n).map(|i| i as f64).collect()).expect("ramp matches shape")
}

/// Write container bytes to a temp file with the given suffix.
pub fn write_table(dataset: &Dataset, suffix: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let bytes = regrid_weights::ingest::encode_table(dataset).expect("encode table");
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(&bytes).expect("write table");
    file.flush().expect("flush table");
    file
}

pub fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length differs");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < 1e-9, "element {i}: {a} != {e}");
    }
}
