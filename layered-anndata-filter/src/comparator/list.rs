use super::Comparator;

pub type ListFn = fn(usize, usize) -> bool;

/// Comparisons of the number of labels of an annotation.
pub struct ListCompare;

impl Comparator for ListCompare {
    type Function = ListFn;
    const NAME: &'static str = "ListCompare";

    fn table() -> &'static [(&'static str, ListFn)] {
        const TABLE: &[(&str, ListFn)] = &[
            ("leq", |n, v| n == v),
            ("lne", |n, v| n != v),
            ("lgt", |n, v| n > v),
            ("llt", |n, v| n < v),
            ("lge", |n, v| n >= v),
            ("lle", |n, v| n <= v),
        ];
        TABLE
    }
}
