//! Allen's relations between two intervals.
//!
//! `x` is the interval under test and `y` the reference one. Points are
//! passed as degenerate intervals.

use layered_anndata::{Interval, Point};
use serde::{Deserialize, Serialize};

use super::Comparator;

/// Parameters of the relations that accept them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationOptions {
    /// Longest gap accepted by `before` and `after`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay: Option<f64>,
    /// Shortest overlap accepted by `overlaps`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap_min: Option<f64>,
    /// Shortest overlap accepted by `overlappedby`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlapped_min: Option<f64>,
    /// Read `overlap_min` and `overlapped_min` as a percentage of the
    /// reference interval's duration.
    #[serde(default)]
    pub percent: bool,
}

impl RelationOptions {
    fn overlap_reaches(&self, amount: f64, minimum: Option<f64>, y: &Interval) -> bool {
        match minimum {
            None => true,
            Some(min) if self.percent => {
                let reference = y.duration().value();
                reference > 0.0 && amount / reference * 100.0 >= min
            }
            Some(min) => amount >= min,
        }
    }
}

pub type IntervalFn = fn(&Interval, &Interval, &RelationOptions) -> bool;

pub struct IntervalCompare;

impl Comparator for IntervalCompare {
    type Function = IntervalFn;
    const NAME: &'static str = "IntervalCompare";

    fn table() -> &'static [(&'static str, IntervalFn)] {
        const TABLE: &[(&str, IntervalFn)] = &[
            ("equals", equals),
            ("before", before),
            ("after", after),
            ("meets", meets),
            ("metby", metby),
            ("overlaps", overlaps),
            ("overlappedby", overlappedby),
            ("starts", starts),
            ("startedby", startedby),
            ("finishes", finishes),
            ("finishedby", finishedby),
            ("contains", contains),
            ("during", during),
        ];
        TABLE
    }
}

fn gap(from: Point, to: Point) -> f64 {
    to.midpoint() - from.midpoint()
}

fn equals(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    x.begin() == y.begin() && x.end() == y.end()
}

fn before(x: &Interval, y: &Interval, options: &RelationOptions) -> bool {
    x.end() < y.begin() && options.max_delay.map_or(true, |d| gap(x.end(), y.begin()) <= d)
}

fn after(x: &Interval, y: &Interval, options: &RelationOptions) -> bool {
    y.end() < x.begin() && options.max_delay.map_or(true, |d| gap(y.end(), x.begin()) <= d)
}

fn meets(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    x.end() == y.begin()
}

fn metby(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    y.end() == x.begin()
}

/// `x` starts first and `y` starts inside `x`.
fn overlaps(x: &Interval, y: &Interval, options: &RelationOptions) -> bool {
    if !(x.begin() < y.begin() && y.begin() < x.end()) {
        return false;
    }
    let end = x.end().midpoint().min(y.end().midpoint());
    options.overlap_reaches(end - y.begin().midpoint(), options.overlap_min, y)
}

/// `y` starts first and `x` starts inside `y`.
fn overlappedby(x: &Interval, y: &Interval, options: &RelationOptions) -> bool {
    if !(y.begin() < x.begin() && x.begin() < y.end()) {
        return false;
    }
    let end = x.end().midpoint().min(y.end().midpoint());
    options.overlap_reaches(end - x.begin().midpoint(), options.overlapped_min, y)
}

fn starts(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    x.begin() == y.begin() && x.end() < y.end()
}

fn startedby(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    x.begin() == y.begin() && y.end() < x.end()
}

fn finishes(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    x.end() == y.end() && y.begin() < x.begin()
}

fn finishedby(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    x.end() == y.end() && x.begin() < y.begin()
}

fn contains(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    x.begin() < y.begin() && y.end() < x.end()
}

fn during(x: &Interval, y: &Interval, _: &RelationOptions) -> bool {
    y.begin() < x.begin() && x.end() < y.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(b: f64, e: f64) -> Interval {
        Interval::from_secs(b, e).unwrap()
    }

    fn holds(name: &str, x: Interval, y: Interval, options: &RelationOptions) -> bool {
        IntervalCompare::get(name).unwrap()(&x, &y, options)
    }

    #[test]
    fn test_allen_relations() {
        let none = RelationOptions::default();
        assert!(holds("equals", iv(1., 2.), iv(1., 2.), &none));
        assert!(holds("before", iv(1., 2.), iv(3., 4.), &none));
        assert!(holds("after", iv(3., 4.), iv(1., 2.), &none));
        assert!(holds("meets", iv(1., 2.), iv(2., 4.), &none));
        assert!(holds("metby", iv(2., 4.), iv(1., 2.), &none));
        assert!(holds("starts", iv(1., 2.), iv(1., 4.), &none));
        assert!(holds("startedby", iv(1., 4.), iv(1., 2.), &none));
        assert!(holds("finishes", iv(3., 4.), iv(1., 4.), &none));
        assert!(holds("finishedby", iv(1., 4.), iv(3., 4.), &none));
        assert!(holds("contains", iv(1., 4.), iv(2., 3.), &none));
        assert!(holds("during", iv(2., 3.), iv(1., 4.), &none));
        assert!(!holds("meets", iv(1., 2.), iv(3., 4.), &none));
    }

    #[test]
    fn test_overlap_thresholds() {
        let none = RelationOptions::default();
        assert!(holds("overlaps", iv(1., 3.), iv(2., 5.), &none));
        assert!(holds("overlappedby", iv(4., 6.), iv(2., 5.), &none));
        assert!(!holds("overlaps", iv(4., 6.), iv(2., 5.), &none));

        let absolute = RelationOptions {
            overlap_min: Some(1.5),
            ..Default::default()
        };
        assert!(!holds("overlaps", iv(1., 3.), iv(2., 5.), &absolute));

        let percent = RelationOptions {
            overlap_min: Some(30.),
            percent: true,
            ..Default::default()
        };
        // one second of a three-second reference
        assert!(holds("overlaps", iv(1., 3.), iv(2., 5.), &percent));

        let delay = RelationOptions {
            max_delay: Some(0.5),
            ..Default::default()
        };
        assert!(!holds("before", iv(1., 2.), iv(3., 4.), &delay));
        assert!(holds("before", iv(1., 2.), iv(2.4, 4.), &delay));
    }
}
