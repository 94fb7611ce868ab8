//! Error types for the annotation data model.
//!
//! Every public operation of this crate either returns normally or fails
//! with one of the kinds below. Mutations that fail leave the structure
//! they touched exactly as it was before the call.

use thiserror::Error;

/// Errors raised by the annotation data model and the tier algorithms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnDataError {
    /// An argument is of the wrong kind.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    /// An index is outside `[0, len)`.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// An interval's begin is strictly greater than its end.
    #[error("invalid interval bounds: begin {begin} > end {end}")]
    IntervalBounds { begin: f64, end: f64 },

    /// `append` would break the sort order or the point-uniqueness.
    #[error("can't append annotation to tier {tier:?}: {reason}")]
    TierAppend { tier: String, reason: String },

    /// `add` was called with a location that already exists in the tier.
    #[error("can't add annotation to tier {tier:?}: {reason}")]
    TierAdd { tier: String, reason: String },

    /// An object with the same identifier is already in the transcription.
    #[error("transcription already contains an object with identifier {id:?}")]
    TrsAdd { id: String },

    /// A tag is not admitted by the controlled vocabulary bound to a tier.
    #[error("tag {tag:?} is not in controlled vocabulary {vocab:?}")]
    CtrlVocabViolation { tag: String, vocab: String },

    /// A link would introduce a cycle or a mutation invalidates a link.
    #[error("hierarchy violation: {reason}")]
    HierarchyViolation { reason: String },

    /// A comparator name is not declared by the comparator.
    #[error("unknown function {name:?} for {comparator}")]
    UnknownFunction { name: String, comparator: String },

    /// A value can't be cast to the expected tag type.
    #[error("can't cast {value:?} to {target}")]
    ValueCast { value: String, target: String },

    /// The `id` metadata key is immutable.
    #[error("the identifier of {id:?} can't be modified")]
    ImmutableId { id: String },
}

impl AnnDataError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        AnnDataError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn hierarchy(reason: impl Into<String>) -> Self {
        AnnDataError::HierarchyViolation {
            reason: reason.into(),
        }
    }
}

/// Result type for annotation data operations.
pub type AnnDataResult<T> = Result<T, AnnDataError>;
