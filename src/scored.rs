//! `Scored<T>` alternatives for locations and labels.
//!
//! Both a [`Location`](crate::Location) and a [`Label`](crate::Label) hold
//! one or several alternatives, each with an optional score. The best
//! alternative is the one with the highest score, the first one on ties.

use std::fmt;

/// A value with an optional score.
#[derive(Clone)]
pub struct Scored<T> {
    /// The actual value
    pub value: T,
    /// Score of this alternative; `None` ranks below any score
    pub score: Option<f64>,
}

impl<T> Scored<T> {
    pub fn new(value: T, score: Option<f64>) -> Self {
        Self { value, score }
    }

    /// An alternative without a score.
    pub fn unscored(value: T) -> Self {
        Self { value, score: None }
    }

    pub fn with_score(value: T, score: f64) -> Self {
        Self {
            value,
            score: Some(score),
        }
    }

    /// Map the inner value while preserving the score.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Scored<U> {
        Scored {
            value: f(self.value),
            score: self.score,
        }
    }

    pub fn as_ref(&self) -> Scored<&T> {
        Scored {
            value: &self.value,
            score: self.score,
        }
    }
}

/// Index of the best alternative: highest score, first one on ties.
pub(crate) fn best_index<T>(alternatives: &[Scored<T>]) -> Option<usize> {
    let mut best: Option<(usize, Option<f64>)> = None;
    for (idx, alt) in alternatives.iter().enumerate() {
        match best {
            None => best = Some((idx, alt.score)),
            Some((_, best_score)) => {
                let better = match (alt.score, best_score) {
                    (Some(s), Some(b)) => s > b,
                    (Some(_), None) => true,
                    _ => false,
                };
                if better {
                    best = Some((idx, alt.score));
                }
            }
        }
    }
    best.map(|(idx, _)| idx)
}

impl<T: fmt::Debug> fmt::Debug for Scored<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.score {
            Some(score) => write!(f, "Scored({:?}, score: {:.2})", self.value, score),
            None => write!(f, "Scored({:?})", self.value),
        }
    }
}

impl<T: PartialEq> PartialEq for Scored<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && match (self.score, other.score) {
                (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                (None, None) => true,
                _ => false,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_index() {
        let alts = vec![
            Scored::unscored("a"),
            Scored::with_score("b", 0.4),
            Scored::with_score("c", 0.8),
            Scored::with_score("d", 0.8),
        ];
        assert_eq!(best_index(&alts), Some(2));
        assert_eq!(best_index::<&str>(&[]), None);
        assert_eq!(best_index(&[Scored::unscored(1), Scored::unscored(2)]), Some(0));
    }

    #[test]
    fn test_map() {
        let scored = Scored::with_score(42, 0.8);
        let mapped = scored.map(|x| x.to_string());
        assert_eq!(mapped.value, "42");
        assert_eq!(mapped.score, Some(0.8));
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Scored::with_score("a", 0.85)), r#"Scored("a", score: 0.85)"#);
        assert_eq!(format!("{:?}", Scored::unscored(1)), "Scored(1)");
    }
}
