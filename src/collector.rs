//! Deferred error collection.
//!
//! Errors are kept in insertion order and never deduplicated. Adding one
//! collector to another flattens it: the receiver grows by the other
//! collector's elements, never by a nested collector value.

use std::fmt;

use crate::error::ReleaseError;

/// Append-only aggregate of errors.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<ReleaseError>,
}

impl ErrorCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        ErrorCollector { errors: Vec::new() }
    }

    /// Add an error to the collector.
    ///
    /// An aggregate error is flattened into this collector rather than being
    /// stored as a single nested element.
    pub fn add(&mut self, err: ReleaseError) {
        match err {
            ReleaseError::Aggregate(other) => self.merge(other),
            err => self.errors.push(err),
        }
    }

    /// Move every error held by `other` into this collector, preserving order.
    pub fn merge(&mut self, other: ErrorCollector) {
        self.errors.extend(other.errors);
    }

    /// Number of errors collected
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// Whether any errors have been collected
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Collected errors in insertion order
    pub fn errors(&self) -> &[ReleaseError] {
        &self.errors
    }

    /// Convert into a result: `Ok` when empty, an aggregate error otherwise.
    pub fn into_result(self) -> crate::error::Result<()> {
        if self.has_errors() {
            Err(ReleaseError::Aggregate(self))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for ErrorCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return Ok(());
        }
        write!(f, "\nErrors:\n")?;
        for err in &self.errors {
            writeln!(f, " • {}", err)?;
        }
        writeln!(f)
    }
}
