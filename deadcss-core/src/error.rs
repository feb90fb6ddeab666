//! Typed error handling for deadcss.
//!
//! Fatal errors (bad arguments, unreadable stylesheets) abort a run before any
//! scanning happens. Per-file scan errors are recoverable: the file contributes
//! zero usages and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadcss operations.
#[derive(Error, Debug)]
pub enum DeadcssError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Stylesheet could not be read or parsed; no selector universe exists
    #[error("Stylesheet error in {path}: {message}")]
    Stylesheet { path: PathBuf, message: String },

    /// A single target file failed to read or analyze
    #[error("Scan error in {path}: {message}")]
    Scan { path: PathBuf, message: String },

    /// Invalid argument or input path combination
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Cache-related errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Report could not be written
    #[error("Report error at {path}: {message}")]
    Report { path: PathBuf, message: String },
}

impl DeadcssError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a stylesheet error.
    pub fn stylesheet(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Stylesheet {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a per-file scan error.
    pub fn scan(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Scan {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a report error.
    pub fn report(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Report {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the run can continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Scan { .. } | Self::Cache { .. } | Self::Config { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Stylesheet { path, .. } => Some(path),
            Self::Scan { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Report { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadcss results.
pub type DeadcssResult<T> = Result<T, DeadcssError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadcssResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadcssResult<T> {
        self.map_err(|e| DeadcssError::io(path, e))
    }
}
