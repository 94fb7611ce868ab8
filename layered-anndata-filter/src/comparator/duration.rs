use layered_anndata::Duration;

use super::Comparator;

pub type DurationFn = fn(&Duration, &Duration) -> bool;

/// Comparisons of an annotation's duration with a value, within the
/// duration's margin.
pub struct DurationCompare;

impl Comparator for DurationCompare {
    type Function = DurationFn;
    const NAME: &'static str = "DurationCompare";

    fn table() -> &'static [(&'static str, DurationFn)] {
        const TABLE: &[(&str, DurationFn)] = &[
            ("eq", |d, v| d == v),
            ("ne", |d, v| d != v),
            ("gt", |d, v| d > v),
            ("lt", |d, v| d < v),
            ("ge", |d, v| d >= v),
            ("le", |d, v| d <= v),
        ];
        TABLE
    }
}
