//! Named predicates, looked up by the filter engine through dispatch tables.
//!
//! Each comparator declares the names it supports and maps them to plain
//! function pointers. Negation (`not_` prefix) is applied by the engine,
//! not by the functions.

mod duration;
mod interval;
mod list;
mod localization;
mod tag;

pub use duration::{DurationCompare, DurationFn};
pub use interval::{IntervalCompare, IntervalFn, RelationOptions};
pub use list::{ListCompare, ListFn};
pub use localization::{LocalizationCompare, LocalizationFn};
pub use tag::{TagCompare, TagFn, TagOperand};

use layered_anndata::{AnnDataError, AnnDataResult};

/// A dispatch table from names to functions.
pub trait Comparator {
    type Function: Copy + 'static;

    /// Name used in error messages.
    const NAME: &'static str;

    fn table() -> &'static [(&'static str, Self::Function)];

    /// The function registered under `name`.
    fn get(name: &str) -> AnnDataResult<Self::Function> {
        Self::table()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| *f)
            .ok_or_else(|| AnnDataError::UnknownFunction {
                name: name.to_string(),
                comparator: Self::NAME.to_string(),
            })
    }

    fn contains(name: &str) -> bool {
        Self::table().iter().any(|(n, _)| *n == name)
    }

    fn names() -> Vec<&'static str> {
        Self::table().iter().map(|(n, _)| *n).collect()
    }
}
