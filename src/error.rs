//! Error types shared by the loader and the analyzer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for battery analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while loading unit records or running statistics.
#[derive(Error, Debug)]
pub enum Error {
    /// The record store holds no record for this unit.
    #[error("record not found: {unit}")]
    NotFound {
        /// Record identifier, e.g. `B0003`.
        unit: String,
    },

    /// A required column is absent from the record.
    #[error("record {unit} has no '{field}' column")]
    MissingField {
        /// Column name.
        field: String,
        /// Record identifier.
        unit: String,
    },

    /// The record exists but cannot form a valid unit record.
    #[error("malformed record {unit}: {reason}")]
    Malformed {
        /// Record identifier.
        unit: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The sample cannot be fitted.
    #[error("fit error: {0}")]
    Fit(String),

    /// An argument lies outside the domain of the computation.
    #[error("domain error: {0}")]
    Domain(String),

    /// Filesystem failure other than a missing record.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Configuration text could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    /// Builds a [`Error::Domain`] from any message.
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Error::Domain(message.into())
    }

    /// Builds a [`Error::Malformed`] for the given record.
    pub(crate) fn malformed(unit: &str, reason: impl Into<String>) -> Self {
        Error::Malformed {
            unit: unit.to_string(),
            reason: reason.into(),
        }
    }

    /// True if this is a missing-record error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected() {
        let e = Error::NotFound {
            unit: "B0003".to_string(),
        };
        assert!(e.is_not_found());
        assert_eq!(e.to_string(), "record not found: B0003");
    }

    #[test]
    fn other_errors_are_not_not_found() {
        assert!(!Error::domain("p0 must be in (0, 1)").is_not_found());
        assert!(!Error::Fit("empty".to_string()).is_not_found());
        let e = Error::MissingField {
            field: "capacity".to_string(),
            unit: "B0001".to_string(),
        };
        assert!(!e.is_not_found());
        assert_eq!(e.to_string(), "record B0001 has no 'capacity' column");
    }
}
