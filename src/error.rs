//! Error types for fixture generation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fixture operations
pub type Result<T> = std::result::Result<T, FixtureError>;

/// Error type for fixture operations
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Unknown placeholder or malformed path template
    #[error("Invalid template '{template}': {reason}")]
    Template {
        /// The offending template string
        template: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Sample list arity mismatch, missing sample name or ambiguous alias
    #[error("Sample configuration error: {0}")]
    Sample(String),

    /// A backing data file could not be located
    #[error("Source file '{}' not found", path.display())]
    SourceNotFound {
        /// The resolved (absolute) path that was looked up
        path: PathBuf,
    },

    /// Reference layout label outside the known set
    #[error("Unknown reference layout label '{label}' (expected one of: {expected})")]
    UnknownLabel {
        /// The label that was requested
        label: String,
        /// Comma-separated list of valid labels
        expected: String,
    },

    /// Application output request that does not match the catalog
    #[error("Invalid application output request: {0}")]
    UnknownApplication(String),

    /// Mismatched source/destination lists for a fileset
    #[error("Invalid fileset: {0}")]
    InvalidFileset(String),

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration '{}': {reason}", path.display())]
    Config {
        /// Path of the configuration file
        path: PathBuf,
        /// Explanation of the problem
        reason: String,
    },

    /// Filesystem operation failed
    #[error("{context}: {source}")]
    Io {
        /// What was being done when the error occurred
        context: String,
        /// The underlying error
        #[source]
        source: io::Error,
    },
}

impl FixtureError {
    pub(crate) fn template(template: &str, reason: impl Into<String>) -> Self {
        FixtureError::Template {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        FixtureError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Attach a description of the failed filesystem operation to an `io::Error`.
pub(crate) trait IoContext<T> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| FixtureError::io(f(), e))
    }
}
