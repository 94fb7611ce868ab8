//! Error types for the filter engine.

use layered_anndata::AnnDataError;
use thiserror::Error;

/// Errors raised while loading or running a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Error reading a filter definition file.
    #[error("failed to load filter: {path}: {message}")]
    Load { path: String, message: String },

    /// Error parsing a filter definition.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A tier named by a filter definition is not in the transcription.
    #[error("no tier named {name:?}")]
    UnknownTier { name: String },

    /// Unknown comparator, bad value or failed tier operation.
    #[error(transparent)]
    Data(#[from] AnnDataError),
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
