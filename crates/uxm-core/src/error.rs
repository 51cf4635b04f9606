//! # Error Types
//!
//! Errors raised while loading and interpreting component documents.
//! Parse errors keep the underlying `serde_json::Error` so callers can
//! report the line and column of the syntax error.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for component handling.
#[derive(Error, Debug)]
pub enum UxmError {
    /// The file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// Path of the malformed document.
        path: PathBuf,
        /// Underlying parser error, carrying line and column.
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but does not have the shape of a component.
    #[error("malformed component: {0}")]
    Malformed(String),

    /// Any other IO failure while reading.
    #[error("io error reading {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl UxmError {
    /// For a JSON syntax error, the parser message with its position as
    /// `"<message> at line L, column C"`.
    pub fn json_syntax_message(&self) -> Option<String> {
        let UxmError::Json { source, .. } = self else {
            return None;
        };
        let (line, column) = (source.line(), source.column());
        let full = source.to_string();
        let message = full
            .strip_suffix(&format!(" at line {line} column {column}"))
            .unwrap_or(&full);
        Some(format!("{message} at line {line}, column {column}"))
    }
}
