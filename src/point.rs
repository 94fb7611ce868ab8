//! Time instants with vagueness, and durations.

use std::cmp::Ordering;
use std::fmt;

use crate::{AnnDataError, AnnDataResult};

/// Absolute tolerance applied to every time comparison.
pub const TIME_EPSILON: f64 = 1e-9;

/// A time instant: a midpoint and a symmetric radius.
///
/// A point stands for the closed range `[midpoint - radius, midpoint + radius]`.
/// Two points are equal when one midpoint lies within the other's
/// uncertainty; otherwise they are ordered by midpoint. Equality is
/// therefore not transitive, and `Point` only implements `PartialEq` and
/// `PartialOrd`.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    midpoint: f64,
    radius: Option<f64>,
}

impl Point {
    pub fn new(midpoint: f64) -> Self {
        Self {
            midpoint,
            radius: None,
        }
    }

    /// A point with a vagueness. The radius is clamped so that the point
    /// never starts before zero.
    pub fn with_radius(midpoint: f64, radius: f64) -> Self {
        let radius = radius.max(0.0).min(midpoint.max(0.0));
        Self {
            midpoint,
            radius: Some(radius),
        }
    }

    pub fn midpoint(&self) -> f64 {
        self.midpoint
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn radius_or_zero(&self) -> f64 {
        self.radius.unwrap_or(0.0)
    }

    /// Lower bound of the uncertainty range.
    pub fn lower(&self) -> f64 {
        self.midpoint - self.radius_or_zero()
    }

    /// Upper bound of the uncertainty range.
    pub fn upper(&self) -> f64 {
        self.midpoint + self.radius_or_zero()
    }

    /// Move the point in time. Fails if it would land before zero.
    pub fn shift(&self, delay: f64) -> AnnDataResult<Self> {
        let midpoint = self.midpoint + delay;
        if midpoint < -TIME_EPSILON {
            return Err(AnnDataError::IntervalBounds {
                begin: midpoint,
                end: self.midpoint,
            });
        }
        Ok(Self {
            midpoint: midpoint.max(0.0),
            radius: self.radius,
        })
    }

    /// A point has no extent: its duration is zero with the full width of
    /// its uncertainty as margin.
    pub fn duration(&self) -> Duration {
        Duration::with_margin(0.0, 2.0 * self.radius_or_zero())
    }

    /// Absolute distance between the two midpoints.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.midpoint - other.midpoint).abs()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        let radius = self.radius_or_zero().max(other.radius_or_zero());
        self.distance(other) <= radius + TIME_EPSILON
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        self.midpoint.partial_cmp(&other.midpoint)
    }
}

impl From<f64> for Point {
    fn from(midpoint: f64) -> Self {
        Point::new(midpoint)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radius {
            Some(r) if r > 0.0 => write!(f, "{}~{}", self.midpoint, r),
            _ => write!(f, "{}", self.midpoint),
        }
    }
}

/// A duration with a margin of uncertainty.
///
/// Two durations are equal when their difference is within the sum of
/// their margins.
#[derive(Debug, Clone, Copy)]
pub struct Duration {
    value: f64,
    margin: f64,
}

impl Duration {
    pub fn new(value: f64) -> Self {
        Self { value, margin: 0.0 }
    }

    pub fn with_margin(value: f64, margin: f64) -> Self {
        Self {
            value,
            margin: margin.abs(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::with_margin(self.value + rhs.value, self.margin + rhs.margin)
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        (self.value - other.value).abs() <= self.margin + other.margin + TIME_EPSILON
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        self.value.partial_cmp(&other.value)
    }
}

impl From<f64> for Duration {
    fn from(value: f64) -> Self {
        Duration::new(value)
    }
}
