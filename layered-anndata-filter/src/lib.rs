#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Select annotations of `layered-anndata` tiers.
//!
//! - [`SingleFilter`] keeps the annotations of one tier matching tag,
//!   localization, duration or label-count predicates.
//! - [`RelationFilter`] keeps the annotations of one tier in a given time
//!   relation (Allen's) with the annotations of another.
//! - [`FilterDefinition`] describes either in a TOML file.
//!
//! Both filters produce an [`AnnSet`]: references to the selected
//! annotations with the reasons they were selected. The input tiers are
//! never modified.

pub mod comparator;

mod annset;
mod definition;
mod errors;
mod predicate;
mod relation;
mod single;

pub use annset::AnnSet;
pub use comparator::{Comparator, RelationOptions};
pub use definition::{FilterDefinition, RelationDefinition};
pub use errors::{FilterError, FilterResult};
pub use predicate::{FilterValue, LabelLogic, PredicateKind, PredicateSpec};
pub use relation::RelationFilter;
pub use single::SingleFilter;

#[cfg(test)]
mod tests {
    mod definition;
    mod scenarios;
}
