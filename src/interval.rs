//! Closed intervals of points, and disjoint lists of intervals.

use std::fmt;

use crate::{AnnDataError, AnnDataResult, Duration, Point};

/// A closed interval `[begin, end]` with `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    begin: Point,
    end: Point,
}

impl Interval {
    pub fn new(begin: Point, end: Point) -> AnnDataResult<Self> {
        if begin > end {
            return Err(AnnDataError::IntervalBounds {
                begin: begin.midpoint(),
                end: end.midpoint(),
            });
        }
        Ok(Self { begin, end })
    }

    /// Shorthand for an interval of exact points, in seconds.
    pub fn from_secs(begin: f64, end: f64) -> AnnDataResult<Self> {
        Self::new(Point::new(begin), Point::new(end))
    }

    /// Interval from bounds already known to be ordered.
    pub(crate) fn from_ordered(begin: Point, end: Point) -> Self {
        Self { begin, end }
    }

    pub fn begin(&self) -> Point {
        self.begin
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn duration(&self) -> Duration {
        Duration::with_margin(
            self.end.midpoint() - self.begin.midpoint(),
            self.begin.radius_or_zero() + self.end.radius_or_zero(),
        )
    }

    /// Point halfway between begin and end.
    pub fn middle(&self) -> Point {
        let midpoint = (self.begin.midpoint() + self.end.midpoint()) / 2.0;
        match (self.begin.radius(), self.end.radius()) {
            (None, None) => Point::new(midpoint),
            (b, e) => Point::with_radius(midpoint, b.unwrap_or(0.0).max(e.unwrap_or(0.0))),
        }
    }

    pub fn is_bound(&self, point: &Point) -> bool {
        self.begin == *point || self.end == *point
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.begin <= *point && *point <= self.end
    }

    /// True when the two intervals share more than a boundary.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Length of the common part, zero when they don't overlap.
    pub fn overlap_duration(&self, other: &Interval) -> f64 {
        let begin = self.begin.midpoint().max(other.begin.midpoint());
        let end = self.end.midpoint().min(other.end.midpoint());
        (end - begin).max(0.0)
    }

    pub fn shift(&self, delay: f64) -> AnnDataResult<Self> {
        Ok(Self {
            begin: self.begin.shift(delay)?,
            end: self.end.shift(delay)?,
        })
    }

    /// Cut the interval at `point` into `[begin, point]` and `[point, end]`.
    pub fn split_at(&self, point: Point) -> AnnDataResult<(Interval, Interval)> {
        Ok((Interval::new(self.begin, point)?, Interval::new(point, self.end)?))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}

/// An ordered list of non-overlapping intervals acting as one placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjoint {
    intervals: Vec<Interval>,
}

impl Disjoint {
    /// Sorts the intervals by begin and checks that they don't overlap.
    pub fn new(mut intervals: Vec<Interval>) -> AnnDataResult<Self> {
        if intervals.is_empty() {
            return Err(AnnDataError::type_mismatch("at least one interval", "empty list"));
        }
        intervals.sort_by(|a, b| {
            a.begin()
                .midpoint()
                .partial_cmp(&b.begin().midpoint())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for pair in intervals.windows(2) {
            if pair[0].end() > pair[1].begin() {
                return Err(AnnDataError::IntervalBounds {
                    begin: pair[1].begin().midpoint(),
                    end: pair[0].end().midpoint(),
                });
            }
        }
        Ok(Self { intervals })
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn begin(&self) -> Point {
        self.intervals[0].begin()
    }

    pub fn end(&self) -> Point {
        self.intervals[self.intervals.len() - 1].end()
    }

    /// Sum of the sub-interval durations.
    pub fn duration(&self) -> Duration {
        self.intervals
            .iter()
            .map(Interval::duration)
            .fold(Duration::new(0.0), |acc, d| acc + d)
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.intervals.iter().any(|i| i.contains(point))
    }

    pub fn shift(&self, delay: f64) -> AnnDataResult<Self> {
        let intervals = self
            .intervals
            .iter()
            .map(|i| i.shift(delay))
            .collect::<AnnDataResult<Vec<_>>>()?;
        Ok(Self { intervals })
    }

    /// Cut at `point`. Intervals before the point go left, after it go
    /// right, and an interval containing it is split in two.
    pub fn split_at(&self, point: Point) -> AnnDataResult<(Disjoint, Disjoint)> {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for interval in &self.intervals {
            if interval.end() <= point {
                left.push(*interval);
            } else if interval.begin() >= point {
                right.push(*interval);
            } else {
                let (l, r) = interval.split_at(point)?;
                left.push(l);
                right.push(r);
            }
        }
        Ok((Disjoint::new(left)?, Disjoint::new(right)?))
    }

    /// Concatenate two disjoints, joining intervals that touch.
    pub fn merge(&self, other: &Disjoint) -> AnnDataResult<Disjoint> {
        let all = Disjoint::new(
            self.intervals
                .iter()
                .chain(other.intervals.iter())
                .copied()
                .collect(),
        )?;
        let mut joined: Vec<Interval> = Vec::with_capacity(all.len());
        for interval in all.intervals {
            match joined.last_mut() {
                Some(last) if last.end() == interval.begin() => {
                    *last = Interval::new(last.begin(), interval.end())?;
                }
                _ => joined.push(interval),
            }
        }
        Ok(Disjoint { intervals: joined })
    }
}

impl fmt::Display for Disjoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.intervals.iter().map(|i| i.to_string()).collect();
        write!(f, "{{{}}}", parts.join(" "))
    }
}
