//! Error types for sieve-coref.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for sieve-coref operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sieve-coref operations.
///
/// Only construction-time surfaces (resource loading, configuration, CLI
/// input) produce errors. Resolving a document never fails.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A resource table could not be read or parsed.
    #[error("Resource error ({}): {message}", path.display())]
    Resource {
        /// File that failed to load.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Invalid resolver configuration (unknown sieve, bad option).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed bracketed parse tree.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a resource error for the given file.
    #[must_use]
    pub fn resource(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Error::Resource {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for errors that must stop the process before any document is
    /// processed.
    #[must_use]
    pub fn is_fatal_config(&self) -> bool {
        matches!(self, Error::Resource { .. } | Error::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_error_names_path() {
        let err = Error::resource("/tmp/male.txt", "file not found");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/male.txt"));
        assert!(msg.contains("file not found"));
        assert!(err.is_fatal_config());
    }

    #[test]
    fn test_parse_error_is_not_fatal() {
        assert!(!Error::parse("unbalanced").is_fatal_config());
    }
}
