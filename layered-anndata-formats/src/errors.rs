//! Error types for reading and writing annotation files.

use std::io;

use layered_anndata::AnnDataError;
use thiserror::Error;

/// Errors raised by the format plugins and the registry.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file content doesn't follow the format.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// No plugin handles the file, or the plugin can't do the operation.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The content read is not a valid transcription.
    #[error(transparent)]
    Data(#[from] AnnDataError),
}

impl FormatError {
    pub(crate) fn parse(path: &std::path::Path, message: impl ToString) -> Self {
        FormatError::Parse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;
