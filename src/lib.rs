#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Time-aligned annotation data for speech corpora.
//!
//! ## Data model
//!
//! - [`Tag`] - a typed value (string, integer, float or boolean)
//! - [`Label`] - scored alternative tags
//! - [`Point`], [`Interval`], [`Disjoint`] - placements in time, with vagueness
//! - [`Location`] - scored alternative placements of one kind
//! - [`Annotation`] - a location with its labels and metadata
//! - [`CtrlVocab`], [`Media`] - shared references of a tier
//!
//! ## Containers
//!
//! - [`Tier`] - annotations sorted in time, with bisection queries and the
//!   structural operations (split, merge, fit, exports)
//! - [`Hierarchy`] - time-association and time-alignment links between tiers
//! - [`Transcription`] - tiers, media, vocabularies and hierarchy
//!
//! Alternatives are carried in a [`Scored<T>`] wrapper; the best one is the
//! highest scored, the first one on ties.
//!
//! ## Example
//!
//! ```
//! use layered_anndata::{Annotation, Interval, Label, Tier};
//!
//! let mut tier = Tier::new("words");
//! tier.append(Annotation::with_labels(
//!     Interval::from_secs(0.0, 0.4).unwrap(),
//!     vec![Label::from("hello")],
//! ))
//! .unwrap();
//! assert_eq!(tier.len(), 1);
//! ```

mod annotation;
mod config;
mod ctrl_vocab;
mod error;
mod hierarchy;
mod interval;
mod label;
mod location;
mod media;
mod metadata;
mod point;
mod scored;
mod tag;
mod tier;
mod transcription;

pub use annotation::Annotation;
pub use config::{ExportConfig, SilenceConfig};
pub use ctrl_vocab::CtrlVocab;
pub use error::{AnnDataError, AnnDataResult};
pub use hierarchy::{Hierarchy, HierarchyKind};
pub use interval::{Disjoint, Interval};
pub use label::Label;
pub use location::{LocKind, Localization, Location};
pub use media::{Media, DEFAULT_MIME};
pub use metadata::{MetaObject, Metadata, MetadataMut, ID_KEY};
pub use point::{Duration, Point, TIME_EPSILON};
pub use scored::Scored;
pub use tag::{Tag, TagType};
pub use tier::{BoundMode, Direction, Tier};
pub use transcription::Transcription;

#[cfg(test)]
mod tests {
    mod scenarios;
    mod tier;
    mod transcription;
}
