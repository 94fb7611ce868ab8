//! Placements of an annotation in time.

use std::fmt;

use crate::scored::best_index;
use crate::{AnnDataError, AnnDataResult, Disjoint, Duration, Interval, Point, Scored};

/// Kind of placement shared by every alternative of a location, and by
/// every annotation of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocKind {
    Point,
    Interval,
    Disjoint,
}

impl LocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocKind::Point => "point",
            LocKind::Interval => "interval",
            LocKind::Disjoint => "disjoint",
        }
    }
}

impl fmt::Display for LocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One placement: a point, an interval or a disjoint list of intervals.
#[derive(Debug, Clone, PartialEq)]
pub enum Localization {
    Point(Point),
    Interval(Interval),
    Disjoint(Disjoint),
}

impl Localization {
    pub fn kind(&self) -> LocKind {
        match self {
            Localization::Point(_) => LocKind::Point,
            Localization::Interval(_) => LocKind::Interval,
            Localization::Disjoint(_) => LocKind::Disjoint,
        }
    }

    pub fn lowest(&self) -> Point {
        match self {
            Localization::Point(p) => *p,
            Localization::Interval(i) => i.begin(),
            Localization::Disjoint(d) => d.begin(),
        }
    }

    pub fn highest(&self) -> Point {
        match self {
            Localization::Point(p) => *p,
            Localization::Interval(i) => i.end(),
            Localization::Disjoint(d) => d.end(),
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Localization::Point(p) => p.duration(),
            Localization::Interval(i) => i.duration(),
            Localization::Disjoint(d) => d.duration(),
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        match self {
            Localization::Point(p) => p == point,
            Localization::Interval(i) => i.contains(point),
            Localization::Disjoint(d) => d.contains(point),
        }
    }

    /// Boundary points: the point itself, or every begin and end.
    pub fn points(&self) -> Vec<Point> {
        match self {
            Localization::Point(p) => vec![*p],
            Localization::Interval(i) => vec![i.begin(), i.end()],
            Localization::Disjoint(d) => d
                .intervals()
                .iter()
                .flat_map(|i| [i.begin(), i.end()])
                .collect(),
        }
    }

    /// Overall span as an interval; a point gives a degenerate interval.
    pub fn span(&self) -> Interval {
        match self {
            Localization::Interval(i) => *i,
            other => Interval::from_ordered(other.lowest(), other.highest()),
        }
    }

    pub fn shift(&self, delay: f64) -> AnnDataResult<Self> {
        Ok(match self {
            Localization::Point(p) => Localization::Point(p.shift(delay)?),
            Localization::Interval(i) => Localization::Interval(i.shift(delay)?),
            Localization::Disjoint(d) => Localization::Disjoint(d.shift(delay)?),
        })
    }
}

impl fmt::Display for Localization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Localization::Point(p) => write!(f, "{}", p),
            Localization::Interval(i) => write!(f, "{}", i),
            Localization::Disjoint(d) => write!(f, "{}", d),
        }
    }
}

impl From<Point> for Localization {
    fn from(p: Point) -> Self {
        Localization::Point(p)
    }
}

impl From<Interval> for Localization {
    fn from(i: Interval) -> Self {
        Localization::Interval(i)
    }
}

impl From<Disjoint> for Localization {
    fn from(d: Disjoint) -> Self {
        Localization::Disjoint(d)
    }
}

/// One or several alternative placements of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    alternatives: Vec<Scored<Localization>>,
}

impl Location {
    pub fn new(localization: impl Into<Localization>) -> Self {
        Self {
            alternatives: vec![Scored::unscored(localization.into())],
        }
    }

    /// A location made of an exact point, in seconds.
    pub fn point(midpoint: f64) -> Self {
        Self::new(Point::new(midpoint))
    }

    /// A location made of an interval of exact points, in seconds.
    pub fn interval(begin: f64, end: f64) -> AnnDataResult<Self> {
        Ok(Self::new(Interval::from_secs(begin, end)?))
    }

    pub fn with_alternatives(alternatives: Vec<Scored<Localization>>) -> AnnDataResult<Self> {
        let mut iter = alternatives.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| AnnDataError::type_mismatch("at least one localization", "none"))?;
        let mut location = Self {
            alternatives: vec![first],
        };
        for alt in iter {
            location.append(alt.value, alt.score)?;
        }
        Ok(location)
    }

    /// Add an alternative, which must be of the same kind as the others.
    pub fn append(&mut self, localization: impl Into<Localization>, score: Option<f64>) -> AnnDataResult<()> {
        let localization = localization.into();
        if localization.kind() != self.kind() {
            return Err(AnnDataError::type_mismatch(
                self.kind().as_str(),
                localization.kind().as_str(),
            ));
        }
        self.alternatives.push(Scored::new(localization, score));
        Ok(())
    }

    pub fn kind(&self) -> LocKind {
        self.alternatives[0].value.kind()
    }

    pub fn is_point(&self) -> bool {
        self.kind() == LocKind::Point
    }

    pub fn is_interval(&self) -> bool {
        self.kind() == LocKind::Interval
    }

    pub fn is_disjoint(&self) -> bool {
        self.kind() == LocKind::Disjoint
    }

    pub fn alternatives(&self) -> &[Scored<Localization>] {
        &self.alternatives
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// The alternative with the highest score, first one on ties.
    pub fn best(&self) -> &Localization {
        let idx = best_index(&self.alternatives).unwrap_or(0);
        &self.alternatives[idx].value
    }

    /// Lowest point across every alternative.
    pub fn lowest(&self) -> Point {
        self.alternatives
            .iter()
            .map(|a| a.value.lowest())
            .fold(self.alternatives[0].value.lowest(), |acc, p| {
                if p.midpoint() < acc.midpoint() {
                    p
                } else {
                    acc
                }
            })
    }

    /// Highest point across every alternative.
    pub fn highest(&self) -> Point {
        self.alternatives
            .iter()
            .map(|a| a.value.highest())
            .fold(self.alternatives[0].value.highest(), |acc, p| {
                if p.midpoint() > acc.midpoint() {
                    p
                } else {
                    acc
                }
            })
    }

    /// Duration of the best alternative.
    pub fn duration(&self) -> Duration {
        self.best().duration()
    }

    /// Boundary points of every alternative.
    pub fn points(&self) -> Vec<Point> {
        self.alternatives.iter().flat_map(|a| a.value.points()).collect()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.alternatives.iter().any(|a| a.value.contains(point))
    }

    pub fn shift(&self, delay: f64) -> AnnDataResult<Self> {
        let alternatives = self
            .alternatives
            .iter()
            .map(|a| Ok(Scored::new(a.value.shift(delay)?, a.score)))
            .collect::<AnnDataResult<Vec<_>>>()?;
        Ok(Self { alternatives })
    }
}

impl From<Localization> for Location {
    fn from(localization: Localization) -> Self {
        Location::new(localization)
    }
}

impl From<Point> for Location {
    fn from(p: Point) -> Self {
        Location::new(p)
    }
}

impl From<Interval> for Location {
    fn from(i: Interval) -> Self {
        Location::new(i)
    }
}

impl From<Disjoint> for Location {
    fn from(d: Disjoint) -> Self {
        Location::new(d)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alternatives.len() == 1 {
            return write!(f, "{}", self.alternatives[0].value);
        }
        let parts: Vec<String> = self.alternatives.iter().map(|a| a.value.to_string()).collect();
        write!(f, "{}", parts.join("|"))
    }
}
