//! Centralized error types for mailpred.
//!
//! These errors never cross the predicate boundary: the evaluators
//! collapse every failure to a boolean `false` (see [`crate::predicate`]).

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailpred library.
#[derive(Error, Debug)]
pub enum MailError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// An `.mbox`-named archive produced no messages.
    #[error("Empty or unrecognized mbox: {0}")]
    EmptyMbox(PathBuf),

    /// The file content carries no message headers at all.
    #[error("Not an RFC 5322 message: {0}")]
    NotAMessage(PathBuf),
}

/// Convenience alias for `Result<T, MailError>`.
pub type Result<T> = std::result::Result<T, MailError>;

impl MailError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
