//! Central error types for cognity.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic
//! `Display` and `From` implementations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum CognityError {
    /// IO operation failed (without path context - prefer IoWithPath when path is available)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO operation failed with path context for better error messages
    #[error("IO error at {path}: {error}")]
    IoWithPath {
        error: std::io::Error,
        path: PathBuf,
    },

    /// Failed to parse source file
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    /// Requested language is not supported
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    /// Tree-sitter grammar loading/version error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// Invalid argument provided to a function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error (e.g., malformed cognity.toml)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using CognityError.
pub type Result<T> = std::result::Result<T, CognityError>;

impl CognityError {
    /// Create an IO error with path context.
    ///
    /// Use this when reading/writing files to provide actionable error messages
    /// that include the file path that failed.
    #[inline]
    pub fn io_with_path(error: std::io::Error, path: impl AsRef<Path>) -> Self {
        CognityError::IoWithPath {
            error,
            path: path.as_ref().to_path_buf(),
        }
    }
}
