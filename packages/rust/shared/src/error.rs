//! Error types for BlockBuilder.
//!
//! Library crates use [`BlockBuilderError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all BlockBuilder operations.
#[derive(Debug, thiserror::Error)]
pub enum BlockBuilderError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// HTML input could not be turned into an analyzable document.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A section analyzer could not build its block from the given subtree.
    #[error("classification error in {analyzer} analyzer: {message}")]
    Classification {
        analyzer: &'static str,
        message: String,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed block JSON, out-of-range values, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlockBuilderError>;

impl BlockBuilderError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a classification error for the named analyzer.
    pub fn classification(analyzer: &'static str, msg: impl Into<String>) -> Self {
        Self::Classification {
            analyzer,
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
