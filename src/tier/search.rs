//! Bisection queries over the sorted annotation list.

use crate::{Annotation, Location, Point, Tier};

/// Which ends of an annotation count as "containing" a point in
/// [`Tier::mindex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundMode {
    /// `begin <= p < end`
    IncludeBegin,
    /// `begin < p <= end`
    IncludeEnd,
    /// `begin < p < end`
    Exclusive,
    /// `begin <= p <= end`
    Inclusive,
    /// `begin < p < end` on raw midpoints, ignoring vagueness
    StrictMidpoint,
}

impl From<i32> for BoundMode {
    /// `-1`, `1`, `0` and `2` as in the historical numeric codes; anything
    /// else is [`BoundMode::StrictMidpoint`].
    fn from(code: i32) -> Self {
        match code {
            -1 => BoundMode::IncludeBegin,
            1 => BoundMode::IncludeEnd,
            0 => BoundMode::Exclusive,
            2 => BoundMode::Inclusive,
            _ => BoundMode::StrictMidpoint,
        }
    }
}

impl BoundMode {
    fn accepts(&self, begin: &Point, end: &Point, p: &Point) -> bool {
        match self {
            BoundMode::IncludeBegin => begin <= p && p < end,
            BoundMode::IncludeEnd => begin < p && p <= end,
            BoundMode::Exclusive => begin < p && p < end,
            BoundMode::Inclusive => begin <= p && p <= end,
            BoundMode::StrictMidpoint => {
                begin.midpoint() < p.midpoint() && p.midpoint() < end.midpoint()
            }
        }
    }
}

/// Search direction for [`Tier::near`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Nearest,
    Forward,
}

impl From<i32> for Direction {
    fn from(code: i32) -> Self {
        match code {
            c if c < 0 => Direction::Backward,
            0 => Direction::Nearest,
            _ => Direction::Forward,
        }
    }
}

impl Tier {
    /// Index of the first annotation whose `key` is not before `p`.
    ///
    /// Most queries below go through this primitive; it relies on the
    /// list being sorted by `key`.
    pub(crate) fn bisect_by<F>(&self, p: &Point, key: F) -> usize
    where
        F: Fn(&Annotation) -> Point,
    {
        self.annotations().partition_point(|a| key(a) < *p)
    }

    /// Index of the first annotation that can reach `p`: every annotation
    /// before it ends before `p`, even when annotations overlap.
    fn reaching(&self, p: &Point) -> usize {
        self.reach.partition_point(|r| r < p)
    }

    /// One past the last annotation starting at or before `p`.
    fn started_by(&self, p: &Point) -> usize {
        self.annotations().partition_point(|a| a.lowest() <= *p)
    }

    /// Index of the annotation at point `p` in a point tier.
    pub fn index(&self, p: Point) -> Option<usize> {
        if !self.is_point() {
            return None;
        }
        let i = self.bisect_by(&p, Annotation::lowest);
        (i < self.len() && self[i].lowest() == p).then(|| i)
    }

    /// Index of the first annotation starting at `p`.
    pub fn lindex(&self, p: Point) -> Option<usize> {
        if self.is_point() {
            return None;
        }
        let i = self.bisect_by(&p, Annotation::lowest);
        (i < self.len() && self[i].lowest() == p).then(|| i)
    }

    /// Index of the last annotation ending at `p`.
    pub fn rindex(&self, p: Point) -> Option<usize> {
        if self.is_point() {
            return None;
        }
        (self.reaching(&p)..self.started_by(&p))
            .rev()
            .find(|&i| self[i].highest() == p)
    }

    /// Index of the first annotation containing `p` according to `bound`.
    pub fn mindex(&self, p: Point, bound: BoundMode) -> Option<usize> {
        (self.reaching(&p)..self.started_by(&p)).find(|&i| {
            let a = &self[i];
            bound.accepts(&a.lowest(), &a.highest(), &p)
        })
    }

    /// Index of the annotation closest to `p`.
    ///
    /// * `Forward`: first annotation starting at or after `p`;
    /// * `Backward`: last annotation ending at or before `p`;
    /// * `Nearest`: smallest distance, zero when `p` is inside. Ties go to
    ///   the earlier annotation.
    ///
    /// A tier with a single annotation always answers `0`.
    pub fn near(&self, p: Point, direction: Direction) -> Option<usize> {
        match self.len() {
            0 => return None,
            1 => return Some(0),
            _ => {}
        }
        let i = self.bisect_by(&p, Annotation::lowest);
        match direction {
            Direction::Forward => (i < self.len()).then(|| i),
            Direction::Backward => (0..self.started_by(&p))
                .rev()
                .find(|&j| self[j].highest() <= p),
            Direction::Nearest => {
                let distance = |a: &Annotation| {
                    if a.lowest() <= p && p <= a.highest() {
                        0.0
                    } else {
                        a.lowest().distance(&p).min(a.highest().distance(&p))
                    }
                };
                // the latest end before p, everything that can reach p
                // and the first start after it
                let reaching = self.reaching(&p);
                let latest_before = reaching
                    .checked_sub(1)
                    .map(|r| self.reach.partition_point(|x| *x < self.reach[r]));
                let candidates = latest_before
                    .into_iter()
                    .chain(reaching..i)
                    .chain((i < self.len()).then(|| i));
                candidates.fold(None, |best: Option<(usize, f64)>, j| {
                    let d = distance(&self[j]);
                    match best {
                        Some((_, best_d)) if best_d <= d => best,
                        _ => Some((j, d)),
                    }
                })
                .map(|(j, _)| j)
            }
        }
    }

    /// Indexes of the annotations in `[begin, end]`.
    ///
    /// Point tiers: points lying in the range. Other tiers: annotations
    /// fully inside the range, or intersecting it when `overlaps` is set.
    pub fn find_indexes(&self, begin: Point, end: Point, overlaps: bool) -> Vec<usize> {
        let mut found = Vec::new();
        if self.is_empty() || begin > end {
            return found;
        }
        let mut i = self.bisect_by(&begin, Annotation::lowest);

        if self.is_point() {
            while i < self.len() && self[i].lowest() <= end {
                found.push(i);
                i += 1;
            }
            return found;
        }

        if overlaps {
            i = i.min(self.reaching(&begin));
        }
        while i < self.len() && self[i].lowest() < end {
            let a = &self[i];
            let keep = if overlaps {
                a.highest() > begin
            } else {
                a.lowest() >= begin && a.highest() <= end
            };
            if keep {
                found.push(i);
            }
            i += 1;
        }
        found
    }

    /// Annotations in `[begin, end]`, see [`Tier::find_indexes`].
    pub fn find(&self, begin: Point, end: Point, overlaps: bool) -> Vec<&Annotation> {
        self.find_indexes(begin, end, overlaps)
            .into_iter()
            .map(|i| &self[i])
            .collect()
    }

    /// Every boundary point of the tier, sorted, without duplicates.
    pub fn get_all_points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.iter().flat_map(Annotation::points).collect();
        points.sort_by(|a, b| {
            a.midpoint()
                .partial_cmp(&b.midpoint())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        points.dedup_by(|a, b| a == b);
        points
    }

    pub fn get_first_point(&self) -> Option<Point> {
        self.first().map(Annotation::lowest)
    }

    pub fn get_last_point(&self) -> Option<Point> {
        self.iter().map(Annotation::highest).fold(None, |acc, p| match acc {
            Some(best) if best.midpoint() >= p.midpoint() => Some(best),
            _ => Some(p),
        })
    }

    /// True if `p` is a boundary point of one of the annotations.
    pub fn has_point(&self, p: Point) -> bool {
        if self.index(p).is_some() || self.lindex(p).is_some() || self.rindex(p).is_some() {
            return true;
        }
        let upper = self.annotations().partition_point(|a| a.lowest() <= p);
        self.annotations()[..upper]
            .iter()
            .filter(|a| p <= a.highest())
            .any(|a| a.points().iter().any(|q| *q == p))
    }

    /// True if an annotation has exactly this location.
    pub fn has_location(&self, location: &Location) -> bool {
        let lowest = location.lowest();
        let start = self.bisect_by(&lowest, Annotation::lowest);
        self.annotations()[start..]
            .iter()
            .take_while(|a| a.lowest() == lowest)
            .any(|a| a.location() == location)
    }

    /// True if every point of `other` is a point of this tier.
    pub fn is_superset(&self, other: &Tier) -> bool {
        other.get_all_points().into_iter().all(|p| self.has_point(p))
    }

    /// `(begin, end)` midpoints of every annotation.
    pub fn get_midpoint_intervals(&self) -> Vec<(f64, f64)> {
        self.iter()
            .map(|a| (a.lowest().midpoint(), a.highest().midpoint()))
            .collect()
    }

    /// Midpoints of every boundary point, sorted.
    pub fn get_midpoint_points(&self) -> Vec<f64> {
        self.get_all_points().iter().map(Point::midpoint).collect()
    }
}
