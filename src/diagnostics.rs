//! Non-fatal diagnostics raised while applying weights.
//!
//! Diagnostics never abort an operation. They are either returned next
//! to the result ([`crate::smm::Applied`]) or pushed to an injected
//! [`DiagnosticHandler`]; there is no global sink.

use std::sync::{Mutex, PoisonError};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Informational.
    Info,
    /// Result is correct but the caller should look at the input.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
        }
    }
}

/// A non-fatal observation about the inputs of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Input field was not row-major and had to be copied.
    NonContiguousLayout {
        /// Shape of the offending field.
        shape: Vec<usize>,
    },
    /// Some destination rows have no weight and will read as zero.
    UncoveredRows {
        /// Number of rows without any stored entry.
        count: usize,
        /// Total number of destination rows.
        n_out: usize,
    },
}

impl Diagnostic {
    /// Severity of this diagnostic.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::NonContiguousLayout { .. } => Severity::Warning,
            Self::UncoveredRows { .. } => Severity::Info,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonContiguousLayout { shape } => write!(
                f,
                "input array with shape {shape:?} is not C-contiguous, \
                 it was copied to row-major order before regridding"
            ),
            Self::UncoveredRows { count, n_out } => write!(
                f,
                "{count} of {n_out} destination cells have no weights and regrid to zero"
            ),
        }
    }
}

/// Receiver for diagnostics.
///
/// # Example
///
/// ```
/// use regrid_weights::diagnostics::{Diagnostic, DiagnosticHandler};
///
/// struct Stderr;
///
/// impl DiagnosticHandler for Stderr {
///     fn on_diagnostic(&self, diagnostic: &Diagnostic) {
///         eprintln!("[{}] {}", diagnostic.severity(), diagnostic);
///     }
/// }
/// ```
pub trait DiagnosticHandler: Send + Sync {
    /// Called once per diagnostic, in the order they are raised.
    fn on_diagnostic(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing` at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

impl DiagnosticHandler for TracingHandler {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!(%diagnostic, "regrid diagnostic"),
            Severity::Info => tracing::info!(%diagnostic, "regrid diagnostic"),
        }
    }
}

/// Collects diagnostics for later inspection.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingHandler {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of diagnostics with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics()
            .iter()
            .filter(|d| d.severity() == severity)
            .count()
    }

    /// Take everything received so far, leaving the collector empty.
    pub fn drain(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *diagnostics)
    }
}

impl DiagnosticHandler for CollectingHandler {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}
