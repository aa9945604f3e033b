//! Error types for the catalog search engine.
//!
//! Only caller mistakes surface as errors: an empty keyword or an unsupported
//! locale. Storage and timing problems are recovered inside the engine and
//! reported as [`Advisory`](crate::advisory::Advisory) values instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the catalog library.
#[derive(Debug, Error)]
pub enum CatalogError {
    // Caller errors
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("{code} is not a defined locale")]
    UnsupportedLocale { code: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl CatalogError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        CatalogError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Shorthand for an empty or missing keyword.
    pub fn empty_keyword() -> Self {
        CatalogError::InvalidQuery {
            reason: "keyword can not be empty".to_string(),
        }
    }

    /// True when the error was caused by what the caller passed in rather
    /// than by the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidQuery { .. }
                | CatalogError::UnsupportedLocale { .. }
                | CatalogError::Config { .. }
        )
    }

    /// Process exit code for command-line front ends.
    ///
    /// - 2: usage error (bad keyword, locale or configuration)
    /// - 1: anything else
    pub fn exit_code(&self) -> i32 {
        if self.is_caller_error() {
            2
        } else {
            1
        }
    }
}
