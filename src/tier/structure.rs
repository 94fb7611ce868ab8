//! Structural operations: split, merge, hole filling, exports and fitting.

use std::sync::Arc;

use tracing::{debug, warn};

use super::Direction;
use crate::{
    AnnDataError, AnnDataResult, Annotation, CtrlVocab, Disjoint, ExportConfig, Interval, LocKind,
    Localization, Location, Point, Scored, Tier,
};

fn later(a: Point, b: Point) -> Point {
    if b.midpoint() > a.midpoint() {
        b
    } else {
        a
    }
}

fn earlier(a: Point, b: Point) -> Point {
    if b.midpoint() < a.midpoint() {
        b
    } else {
        a
    }
}

fn split_localization(localization: &Localization) -> AnnDataResult<(Localization, Localization)> {
    match localization {
        Localization::Point(_) => Err(AnnDataError::type_mismatch("interval or disjoint", "point")),
        Localization::Interval(i) => {
            let (left, right) = i.split_at(i.middle())?;
            Ok((left.into(), right.into()))
        }
        Localization::Disjoint(d) => {
            let (left, right) = d.split_at(localization.span().middle())?;
            Ok((left.into(), right.into()))
        }
    }
}

fn merge_localizations(first: &Localization, second: &Localization) -> AnnDataResult<Localization> {
    match (first, second) {
        (Localization::Disjoint(a), Localization::Disjoint(b)) => Ok(a.merge(b)?.into()),
        (Localization::Point(_), _) | (_, Localization::Point(_)) => {
            Err(AnnDataError::type_mismatch("interval or disjoint", "point"))
        }
        (a, b) => Ok(Interval::new(earlier(a.lowest(), b.lowest()), later(a.highest(), b.highest()))?.into()),
    }
}

impl Tier {
    fn check_index(&self, index: usize) -> AnnDataResult<()> {
        if index >= self.len() {
            return Err(AnnDataError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn check_not_point(&self) -> AnnDataResult<()> {
        if self.is_point() {
            return Err(AnnDataError::type_mismatch("interval or disjoint tier", "point tier"));
        }
        Ok(())
    }

    /// Location of the tier's kind covering `interval`.
    fn location_of_kind(&self, interval: Interval) -> AnnDataResult<Location> {
        Ok(match self.kind() {
            Some(LocKind::Disjoint) => Location::new(Disjoint::new(vec![interval])?),
            _ => Location::new(interval),
        })
    }

    /// Split the annotation at `index` at its middle.
    ///
    /// The annotation keeps the first half and its labels; a new
    /// annotation without labels covers the second half and is returned.
    pub fn split(&mut self, index: usize) -> AnnDataResult<&Annotation> {
        self.check_index(index)?;
        self.check_not_point()?;

        let mut left = Vec::new();
        let mut right = Vec::new();
        for alt in self[index].location().alternatives() {
            let (l, r) = split_localization(&alt.value)?;
            left.push(Scored::new(l, alt.score));
            right.push(Scored::new(r, alt.score));
        }
        let left = Location::with_alternatives(left)?;
        let right = Annotation::new(Location::with_alternatives(right)?);

        let mut original = self.annotations.remove(index);
        let previous = original.replace_location(left);
        let placed = self.insertion_index(&original).and_then(|i| {
            self.annotations.insert(i, original.clone());
            match self.insertion_index(&right) {
                Ok(j) => Ok(j),
                Err(err) => {
                    self.annotations.remove(i);
                    Err(err)
                }
            }
        });
        match placed {
            Ok(j) => {
                let right = self.adopt(right);
                self.annotations.insert(j, right);
                self.reindex(0);
                debug!(tier = %self.name, index, "split annotation");
                Ok(&self.annotations[j])
            }
            Err(err) => {
                warn!(tier = %self.name, index, error = %err, "split rolled back");
                original.replace_location(previous);
                self.annotations.insert(index, original);
                Err(err)
            }
        }
    }

    /// Merge the annotation at `index` with its predecessor (`Backward`)
    /// or successor (`Forward`).
    ///
    /// The merged location spans both, labels are concatenated in time
    /// order and the earlier annotation is kept. Returns `false` when
    /// there is no neighbour in that direction.
    pub fn merge(&mut self, index: usize, direction: Direction) -> AnnDataResult<bool> {
        self.check_index(index)?;
        self.check_not_point()?;
        let other = match direction {
            Direction::Backward if index == 0 => return Ok(false),
            Direction::Backward => index - 1,
            Direction::Forward if index + 1 >= self.len() => return Ok(false),
            Direction::Forward => index + 1,
            Direction::Nearest => {
                return Err(AnnDataError::type_mismatch("backward or forward", "nearest"))
            }
        };
        let (first, second) = (index.min(other), index.max(other));

        let merged = merge_localizations(self[first].location().best(), self[second].location().best())?;
        let labels: Vec<_> = self[first]
            .labels()
            .iter()
            .chain(self[second].labels())
            .cloned()
            .collect();

        let second_ann = self.annotations.remove(second);
        let mut first_ann = self.annotations.remove(first);
        let previous_location = first_ann.replace_location(Location::new(merged));
        let previous_labels = first_ann.replace_labels(labels);
        match self.insertion_index(&first_ann) {
            Ok(i) => {
                self.annotations.insert(i, first_ann);
                self.reindex(first.min(i));
                debug!(tier = %self.name, first, second, "merged annotations");
                Ok(true)
            }
            Err(err) => {
                warn!(tier = %self.name, index, error = %err, "merge rolled back");
                first_ann.replace_location(previous_location);
                first_ann.replace_labels(previous_labels);
                self.annotations.insert(first, first_ann);
                self.annotations.insert(second, second_ann);
                Err(err)
            }
        }
    }

    /// Fill the hole before the annotation at `index`, up to the previous
    /// annotation or time zero. Returns the index of the new annotation.
    pub fn create_annotation_before(&mut self, index: usize) -> AnnDataResult<usize> {
        self.check_index(index)?;
        self.check_not_point()?;
        let end = self[index].lowest();
        let begin = if index > 0 {
            self[index - 1].highest()
        } else {
            Point::new(0.0)
        };
        self.fill_hole(begin, end)
    }

    /// Fill the hole after the annotation at `index`, up to the next
    /// annotation or, for the last one, up to `end`.
    pub fn create_annotation_after(&mut self, index: usize, end: Option<Point>) -> AnnDataResult<usize> {
        self.check_index(index)?;
        self.check_not_point()?;
        let begin = self[index].highest();
        let end = match self.get(index + 1) {
            Some(next) => next.lowest(),
            None => end.ok_or_else(|| AnnDataError::TierAdd {
                tier: self.name.clone(),
                reason: "no end given after the last annotation".to_string(),
            })?,
        };
        self.fill_hole(begin, end)
    }

    fn fill_hole(&mut self, begin: Point, end: Point) -> AnnDataResult<usize> {
        if begin >= end {
            return Err(AnnDataError::TierAdd {
                tier: self.name.clone(),
                reason: format!("no hole between {} and {}", begin, end),
            });
        }
        let location = self.location_of_kind(Interval::new(begin, end)?)?;
        self.add(Annotation::new(location))
    }

    /// Maximal runs of adjacent annotations, as a tier of unlabelled
    /// intervals.
    ///
    /// A run is broken by a hole or by an annotation whose best tag is one
    /// of the separators; separators are not part of any run. A point tier
    /// gives an empty tier.
    pub fn export_to_intervals(&self, config: &ExportConfig) -> AnnDataResult<Tier> {
        let mut tier = Tier::new(self.name.clone());
        if self.is_point() {
            return Ok(tier);
        }
        let mut run: Option<(Point, Point)> = None;
        for annotation in self.iter() {
            let content = annotation
                .labels()
                .first()
                .map(|l| l.best().content())
                .unwrap_or_default();
            if config.is_separator(&content) {
                if let Some((begin, end)) = run.take() {
                    tier.append(Annotation::new(Interval::new(begin, end)?))?;
                }
                continue;
            }
            run = match run {
                Some((begin, end)) if annotation.lowest() == end => Some((begin, annotation.highest())),
                Some((begin, end)) => {
                    tier.append(Annotation::new(Interval::new(begin, end)?))?;
                    Some((annotation.lowest(), annotation.highest()))
                }
                None => Some((annotation.lowest(), annotation.highest())),
            };
        }
        if let Some((begin, end)) = run {
            tier.append(Annotation::new(Interval::new(begin, end)?))?;
        }
        debug!(tier = %self.name, runs = tier.len(), "exported intervals");
        Ok(tier)
    }

    /// The holes between the first and the last point of the tier, as a
    /// tier of unlabelled intervals.
    pub fn export_unfilled(&self) -> AnnDataResult<Tier> {
        let filled = self.export_to_intervals(&ExportConfig::default())?;
        let mut tier = Tier::new(self.name.clone());
        for pair in filled.annotations().windows(2) {
            let (begin, end) = (pair[0].highest(), pair[1].lowest());
            if begin < end {
                tier.append(Annotation::new(Interval::new(begin, end)?))?;
            }
        }
        Ok(tier)
    }

    /// Clip this tier to the annotations of `other`.
    ///
    /// For every annotation of `other`, each overlapping annotation of this
    /// tier is copied with its labels and its location cut to the common
    /// part. The result is named `"<self>-inter-<other>"`.
    pub fn fit(&self, other: &Tier) -> AnnDataResult<Tier> {
        if self.is_point() || other.is_point() {
            return Err(AnnDataError::type_mismatch("interval or disjoint tier", "point tier"));
        }
        let mut tier = Tier::new(format!("{}-inter-{}", self.name, other.name));
        for a_y in other.iter() {
            for a_x in self.find(a_y.lowest(), a_y.highest(), true) {
                let begin = later(a_x.lowest(), a_y.lowest());
                let end = earlier(a_x.highest(), a_y.highest());
                if begin >= end {
                    continue;
                }
                let mut piece = a_x.duplicate();
                piece.replace_location(Location::new(Interval::new(begin, end)?));
                match tier.add(piece) {
                    Ok(_) | Err(AnnDataError::TierAdd { .. }) => {}
                    Err(err) => return Err(err),
                }
            }
        }
        debug!(tier = %tier.name, len = tier.len(), "fitted tier");
        Ok(tier)
    }

    /// Replace the controlled vocabulary by one made of every non-empty
    /// tag of the tier.
    pub fn create_ctrl_vocab(&mut self, name: Option<&str>) -> AnnDataResult<Arc<CtrlVocab>> {
        let mut vocab = CtrlVocab::new(name.unwrap_or(&self.name));
        for tag in self.iter().flat_map(Annotation::tags) {
            if !tag.is_empty() {
                vocab.add(tag.clone(), "")?;
            }
        }
        let vocab = Arc::new(vocab);
        self.ctrl_vocab = Some(Arc::clone(&vocab));
        Ok(vocab)
    }
}
