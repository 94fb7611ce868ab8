//! Sets of annotations with the reasons they were selected.

use std::collections::HashMap;
use std::fmt;

use layered_anndata::{AnnDataResult, Annotation, Label, MetaObject, Tag, Tier};

/// Annotations borrowed from a tier, each with its provenance strings.
///
/// Membership is by annotation identifier. Entries keep their insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct AnnSet<'a> {
    entries: Vec<(&'a Annotation, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl<'a> AnnSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, annotation: &Annotation) -> bool {
        self.positions.contains_key(annotation.id())
    }

    pub fn provenance(&self, annotation: &Annotation) -> Option<&[String]> {
        self.positions
            .get(annotation.id())
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a Annotation, &[String])> + '_ {
        self.entries.iter().map(|(a, p)| (*a, p.as_slice()))
    }

    /// Add `annotation`, or record one more provenance for it.
    pub fn append(&mut self, annotation: &'a Annotation, provenance: impl Into<String>) {
        self.extend_with(annotation, std::iter::once(provenance.into()));
    }

    fn extend_with<I>(&mut self, annotation: &'a Annotation, provenance: I)
    where
        I: IntoIterator<Item = String>,
    {
        let index = match self.positions.get(annotation.id()) {
            Some(&i) => i,
            None => {
                self.positions
                    .insert(annotation.id().to_string(), self.entries.len());
                self.entries.push((annotation, Vec::new()));
                self.entries.len() - 1
            }
        };
        let known = &mut self.entries[index].1;
        for p in provenance {
            if !known.contains(&p) {
                known.push(p);
            }
        }
    }

    /// Annotations of either set; provenances are merged.
    pub fn union(&self, other: &AnnSet<'a>) -> AnnSet<'a> {
        let mut result = self.clone();
        for (annotation, provenance) in &other.entries {
            result.extend_with(*annotation, provenance.iter().cloned());
        }
        result
    }

    /// Annotations of both sets; provenances are concatenated.
    pub fn intersection(&self, other: &AnnSet<'a>) -> AnnSet<'a> {
        let mut result = AnnSet::new();
        for (annotation, provenance) in &self.entries {
            if let Some(theirs) = other.provenance(annotation) {
                result.extend_with(*annotation, provenance.iter().chain(theirs).cloned());
            }
        }
        result
    }

    /// Annotations of this set that are not in `other`.
    pub fn difference(&self, other: &AnnSet<'a>) -> AnnSet<'a> {
        let mut result = AnnSet::new();
        for (annotation, provenance) in &self.entries {
            if !other.contains(annotation) {
                result.extend_with(*annotation, provenance.iter().cloned());
            }
        }
        result
    }

    /// Copy the annotations into a new tier.
    ///
    /// With `annot_value`, each annotation gets one label per provenance
    /// string instead of its own labels.
    pub fn to_tier(&self, name: &str, annot_value: bool) -> AnnDataResult<Tier> {
        let mut tier = Tier::new(name);
        for (annotation, provenance) in &self.entries {
            let mut copy = annotation.duplicate();
            if annot_value {
                copy.set_labels(
                    provenance
                        .iter()
                        .map(|p| Label::new(Tag::new_str(p)))
                        .collect(),
                );
            }
            tier.add(copy)?;
        }
        Ok(tier)
    }
}

impl fmt::Display for AnnSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(a, p)| format!("{} ({})", a.location(), p.join(", ")))
            .collect();
        f.write_str(&parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_anndata::Interval;

    fn tier() -> Tier {
        let mut tier = Tier::new("words");
        for (b, e) in [(0., 1.), (1., 2.), (2., 3.), (3., 4.)] {
            tier.append(Annotation::new(Interval::from_secs(b, e).unwrap()))
                .unwrap();
        }
        tier
    }

    fn set<'a>(tier: &'a Tier, indexes: &[usize], why: &str) -> AnnSet<'a> {
        let mut set = AnnSet::new();
        for &i in indexes {
            set.append(&tier[i], why);
        }
        set
    }

    fn ids(set: &AnnSet<'_>) -> Vec<String> {
        let mut ids: Vec<String> = set.iter().map(|(a, _)| a.id().to_string()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_union_and_intersection() {
        let tier = tier();
        let a = set(&tier, &[0, 1], "a");
        let b = set(&tier, &[1, 2], "b");

        insta::assert_snapshot!(a.union(&b).to_string(), @"[0, 1] (a) | [1, 2] (a, b) | [2, 3] (b)");
        insta::assert_snapshot!(a.intersection(&b).to_string(), @"[1, 2] (a, b)");
        insta::assert_snapshot!(a.difference(&b).to_string(), @"[0, 1] (a)");
    }

    #[test]
    fn test_algebra_laws() {
        let tier = tier();
        let a = set(&tier, &[0, 1, 3], "a");
        let b = set(&tier, &[1, 2], "b");
        let c = set(&tier, &[2, 3], "c");

        assert_eq!(ids(&a.union(&b)), ids(&b.union(&a)));
        assert_eq!(ids(&a.union(&b).union(&c)), ids(&a.union(&b.union(&c))));
        assert_eq!(
            ids(&a.intersection(&b.union(&c))),
            ids(&a.intersection(&b).union(&a.intersection(&c)))
        );
    }

    #[test]
    fn test_to_tier() {
        let tier = tier();
        let mut all = AnnSet::new();
        for annotation in &tier {
            all.append(annotation, "all");
        }
        all.append(&tier[2], "third");

        let copy = all.to_tier("copy", false).unwrap();
        assert_eq!(copy.len(), tier.len());
        for (a, b) in copy.iter().zip(tier.iter()) {
            assert_eq!(a.location(), b.location());
        }

        let described = all.to_tier("described", true).unwrap();
        insta::assert_snapshot!(described.to_string(), @"described: [0, 1] all | [1, 2] all | [2, 3] all third | [3, 4] all");
    }
}
