use layered_anndata::{Localization, Point};

use super::Comparator;

pub type LocalizationFn = fn(&Localization, &Point) -> bool;

/// Position of a localization relative to a time value.
pub struct LocalizationCompare;

impl Comparator for LocalizationCompare {
    type Function = LocalizationFn;
    const NAME: &'static str = "LocalizationCompare";

    fn table() -> &'static [(&'static str, LocalizationFn)] {
        const TABLE: &[(&str, LocalizationFn)] = &[
            ("rangefrom", |loc, p| loc.lowest() >= *p),
            ("rangeto", |loc, p| loc.highest() <= *p),
        ];
        TABLE
    }
}
