//! Regrid-weights: sparse regridding weights for gridded fields.
//!
//! A regridding engine (ESMF, for instance) computes, for every
//! destination cell, which source cells contribute and with what weight.
//! This crate takes those weights from wherever they live, applies them to
//! N-dimensional fields, and handles the two situations that plain sparse
//! multiplication gets wrong: destination cells nobody covers, and source
//! regions that were split into several parts.
//!
//! # Quick Start
//!
//! ```
//! use regrid_weights::prelude::*;
//!
//! // ESMF-style 1-based weight table: 2x2 source grid -> 1x2 destination
//! let table = Dataset::new()
//!     .with_column("row", vec![1i64, 1, 2, 2])
//!     .with_column("col", vec![1i64, 2, 3, 4])
//!     .with_column("S", vec![0.5, 0.5, 0.5, 0.5]);
//! let weights = ingest(table, 4, 2).expect("complete weight table");
//!
//! // (time=2, ny=2, nx=2)
//! let data = DenseField::new(vec![2, 2, 2], vec![1.0, 3.0, 5.0, 7.0, 0.0, 2.0, 4.0, 6.0])
//!     .expect("8 elements");
//! let out = apply(&weights, &data, (2, 2), (1, 2)).expect("shapes agree");
//! assert_eq!(out.field.shape(), &[2, 1, 2]);
//! assert_eq!(out.field.as_slice(), &[2.0, 6.0, 1.0, 5.0]);
//! ```
//!
//! # Modules
//!
//! - [`ingest`]: Normalize paths, datasets, mappings and raw matrices into one operator
//! - [`smm`]: Sparse matrix multiplication against dense fields
//! - [`missing`]: NaN markers for destination cells without weights
//! - [`combine`]: Merge columns of multi-part source geometries
//! - [`sparse`]: The canonical COO operator and its LIL/CSR/CSC layouts
//! - [`field`]: Dense N-dimensional fields
//! - [`diagnostics`]: Non-fatal diagnostics and their handlers
//! - [`config`]: Field names and index base for ingestion

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod combine;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod ingest;
pub mod missing;
pub mod prelude;
pub mod smm;
pub mod sparse;

pub use combine::combine_columns;
pub use error::{RegridError, Result};
pub use field::DenseField;
pub use ingest::{ingest, ingest_with, WeightSource};
pub use missing::{inject_missing, MISSING_MARKER};
pub use smm::apply;
pub use sparse::WeightOperator;
