//! Tiers: ordered containers of annotations.
//!
//! A tier keeps its annotations sorted by lowest localization, with a
//! tie-break on highest localization. Every annotation of a tier shares one
//! localization kind, and when a controlled vocabulary is bound every
//! non-empty tag belongs to it.
//!
//! Mutations validate before they touch the list, or restore the previous
//! state before returning an error: a failing call leaves the tier as it
//! was.

mod search;
mod structure;

pub use search::{BoundMode, Direction};

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::{
    AnnDataError, AnnDataResult, Annotation, CtrlVocab, Label, LocKind, Location, Media, MetaObject,
    Metadata, MetadataMut, Point, SilenceConfig, TagType,
};

/// Ordered container of annotations of one localization kind.
///
/// `Clone` is a deep copy: annotations keep their identifiers, and the
/// tier keeps its identifier, metadata and parent.
#[derive(Debug, Clone)]
pub struct Tier {
    name: String,
    metadata: Metadata,
    annotations: Vec<Annotation>,
    /// `reach[i]` is the latest end among `annotations[..=i]`
    reach: Vec<Point>,
    ctrl_vocab: Option<Arc<CtrlVocab>>,
    media: Option<Arc<Media>>,
    parent: Option<String>,
}

impl Tier {
    /// A blank name is replaced by the tier's identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_metadata(name, Metadata::new())
    }

    pub fn with_metadata(name: impl Into<String>, metadata: Metadata) -> Self {
        let name = name.into().trim().to_string();
        let name = if name.is_empty() {
            metadata.id().to_string()
        } else {
            name
        };
        Self {
            name,
            metadata,
            annotations: Vec::new(),
            reach: Vec::new(),
            ctrl_vocab: None,
            media: None,
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into().trim().to_string();
        self.name = if name.is_empty() {
            self.metadata.id().to_string()
        } else {
            name
        };
    }

    /// Deep copy with the same identifier, metadata and parent.
    pub fn copy(&self) -> Tier {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    pub fn first(&self) -> Option<&Annotation> {
        self.annotations.first()
    }

    pub fn last(&self) -> Option<&Annotation> {
        self.annotations.last()
    }

    /// Localization kind of the annotations, `None` while empty.
    pub fn kind(&self) -> Option<LocKind> {
        self.annotations.first().map(|a| a.location().kind())
    }

    pub fn is_point(&self) -> bool {
        self.kind() == Some(LocKind::Point)
    }

    pub fn is_interval(&self) -> bool {
        self.kind() == Some(LocKind::Interval)
    }

    pub fn is_disjoint(&self) -> bool {
        self.kind() == Some(LocKind::Disjoint)
    }

    /// Identifier of the transcription holding this tier.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub(crate) fn set_parent(&mut self, trs_id: Option<String>) {
        self.parent = trs_id;
    }

    pub fn ctrl_vocab(&self) -> Option<&Arc<CtrlVocab>> {
        self.ctrl_vocab.as_ref()
    }

    /// Bind (or unbind) a controlled vocabulary. Every tag already in the
    /// tier must be admitted by the new vocabulary.
    pub fn set_ctrl_vocab(&mut self, vocab: Option<Arc<CtrlVocab>>) -> AnnDataResult<()> {
        if let Some(vocab) = &vocab {
            for tag in self.annotations.iter().flat_map(Annotation::tags) {
                vocab.validate_tag(tag)?;
            }
        }
        self.ctrl_vocab = vocab;
        Ok(())
    }

    pub fn media(&self) -> Option<&Arc<Media>> {
        self.media.as_ref()
    }

    pub fn set_media(&mut self, media: Option<Arc<Media>>) {
        self.media = media;
    }

    /// Type of the non-empty tags of the tier, or of its vocabulary.
    pub fn tag_type(&self) -> Option<TagType> {
        self.annotations
            .iter()
            .flat_map(Annotation::tags)
            .find_map(|t| t.tag_type())
            .or_else(|| self.ctrl_vocab.as_ref().and_then(|v| v.tag_type()))
    }

    pub fn is_string(&self) -> bool {
        self.tag_type() == Some(TagType::Str)
    }

    pub fn is_int(&self) -> bool {
        self.tag_type() == Some(TagType::Int)
    }

    pub fn is_float(&self) -> bool {
        self.tag_type() == Some(TagType::Float)
    }

    pub fn is_bool(&self) -> bool {
        self.tag_type() == Some(TagType::Bool)
    }

    /// Number of annotations with at least one non-empty tag.
    pub fn get_nb_filled_labels(&self) -> usize {
        self.annotations.iter().filter(|a| a.is_labelled()).count()
    }

    /// True if the best tag of the first label is a silence marker.
    pub fn is_silence(&self, index: usize, silences: &SilenceConfig) -> bool {
        self.annotations
            .get(index)
            .and_then(|a| a.labels().first())
            .map_or(false, |l| silences.is_silence(&l.best().content()))
    }

    fn check_kind(&self, location: &Location) -> AnnDataResult<()> {
        match self.kind() {
            Some(kind) if kind != location.kind() => {
                Err(AnnDataError::type_mismatch(kind.as_str(), location.kind().as_str()))
            }
            _ => Ok(()),
        }
    }

    fn check_labels(&self, labels: &[Label]) -> AnnDataResult<()> {
        if let Some(vocab) = &self.ctrl_vocab {
            for tag in labels.iter().flat_map(Label::tags) {
                vocab.validate_tag(tag)?;
            }
        }
        Ok(())
    }

    /// Check an annotation against the tier's kind and vocabulary.
    pub fn validate_annotation(&self, annotation: &Annotation) -> AnnDataResult<()> {
        self.check_kind(annotation.location())?;
        self.check_labels(annotation.labels())
    }

    /// Rebuild the running latest end from `from` onwards.
    fn reindex(&mut self, from: usize) {
        let from = from.min(self.reach.len()).min(self.annotations.len());
        self.reach.truncate(from);
        let mut latest = from.checked_sub(1).map(|i| self.reach[i]);
        for annotation in &self.annotations[from..] {
            let highest = annotation.highest();
            let next = match latest {
                Some(p) if p.midpoint() >= highest.midpoint() => p,
                _ => highest,
            };
            self.reach.push(next);
            latest = Some(next);
        }
    }

    fn adopt(&self, mut annotation: Annotation) -> Annotation {
        annotation.set_parent(Some(self.metadata.id().to_string()));
        annotation
    }

    /// Add an annotation at the end.
    ///
    /// Fails if it starts before the end of the last annotation, or, in a
    /// point tier, if it is at the same point as the last one.
    pub fn append(&mut self, annotation: Annotation) -> AnnDataResult<usize> {
        self.validate_annotation(&annotation)?;
        if let Some(last) = self.annotations.last() {
            if annotation.lowest() < last.highest() {
                return Err(AnnDataError::TierAppend {
                    tier: self.name.clone(),
                    reason: format!(
                        "{} starts before the end of the last annotation ({})",
                        annotation.location(),
                        last.highest()
                    ),
                });
            }
            if self.is_point() && annotation.lowest() == last.lowest() {
                return Err(AnnDataError::TierAppend {
                    tier: self.name.clone(),
                    reason: format!("point {} already exists", annotation.lowest()),
                });
            }
        }
        let annotation = self.adopt(annotation);
        self.annotations.push(annotation);
        self.reindex(self.annotations.len() - 1);
        trace!(tier = %self.name, len = self.annotations.len(), "appended annotation");
        Ok(self.annotations.len() - 1)
    }

    /// Insert an annotation at its sorted position and return its index.
    ///
    /// Fails if an annotation with the same location (the same point for
    /// a point tier) already exists.
    pub fn add(&mut self, annotation: Annotation) -> AnnDataResult<usize> {
        self.validate_annotation(&annotation)?;
        let index = self.insertion_index(&annotation)?;
        let annotation = self.adopt(annotation);
        self.annotations.insert(index, annotation);
        self.reindex(index);
        trace!(tier = %self.name, index, "inserted annotation");
        Ok(index)
    }

    /// Sorted position of `annotation`, checking that its location is new.
    fn insertion_index(&self, annotation: &Annotation) -> AnnDataResult<usize> {
        let lowest = annotation.lowest();
        let highest = annotation.highest();
        let start = self.bisect_by(&lowest, Annotation::lowest);
        let point_tier = self.is_point();

        let mut index = start;
        while index < self.annotations.len() && self.annotations[index].lowest() == lowest {
            let other = &self.annotations[index];
            if point_tier || other.location() == annotation.location() {
                return Err(AnnDataError::TierAdd {
                    tier: self.name.clone(),
                    reason: format!("location {} already exists", annotation.location()),
                });
            }
            if other.highest() > highest {
                break;
            }
            index += 1;
        }
        // everything after `index` with the same lowest ends later: check
        // for a duplicate location among them too
        let duplicate = self.annotations[index..]
            .iter()
            .take_while(|a| a.lowest() == lowest)
            .any(|a| a.location() == annotation.location());
        if duplicate {
            return Err(AnnDataError::TierAdd {
                tier: self.name.clone(),
                reason: format!("location {} already exists", annotation.location()),
            });
        }
        Ok(index)
    }

    /// Remove and return the annotation at `index`.
    pub fn pop(&mut self, index: usize) -> AnnDataResult<Annotation> {
        if index >= self.annotations.len() {
            return Err(AnnDataError::IndexOutOfRange {
                index,
                len: self.annotations.len(),
            });
        }
        let mut annotation = self.annotations.remove(index);
        self.reindex(index);
        annotation.set_parent(None);
        Ok(annotation)
    }

    /// Remove the annotations inside `[begin, end]`, or overlapping it if
    /// `overlaps` is set, and return them in tier order.
    pub fn remove(
        &mut self,
        begin: Point,
        end: Point,
        overlaps: bool,
    ) -> AnnDataResult<Vec<Annotation>> {
        if begin > end {
            return Err(AnnDataError::IntervalBounds {
                begin: begin.midpoint(),
                end: end.midpoint(),
            });
        }
        let indexes = self.find_indexes(begin, end, overlaps);
        let mut removed: Vec<Annotation> = indexes
            .iter()
            .rev()
            .map(|&index| {
                let mut annotation = self.annotations.remove(index);
                annotation.set_parent(None);
                annotation
            })
            .collect();
        removed.reverse();
        if let Some(&first) = indexes.first() {
            self.reindex(first);
        }
        trace!(tier = %self.name, removed = removed.len(), "removed annotations");
        Ok(removed)
    }

    /// Replace the labels of the annotation at `index`, returning the old
    /// ones.
    pub fn set_labels(&mut self, index: usize, labels: Vec<Label>) -> AnnDataResult<Vec<Label>> {
        let len = self.annotations.len();
        if index >= len {
            return Err(AnnDataError::IndexOutOfRange { index, len });
        }
        self.check_labels(&labels)?;
        Ok(self.annotations[index].replace_labels(labels))
    }

    /// Move the annotation at `index` to a new location and return its new
    /// index. On failure the annotation is put back where it was.
    pub fn set_location(&mut self, index: usize, location: Location) -> AnnDataResult<usize> {
        let len = self.annotations.len();
        if index >= len {
            return Err(AnnDataError::IndexOutOfRange { index, len });
        }
        if len > 1 {
            self.check_kind(&location)?;
        }
        let mut annotation = self.annotations.remove(index);
        let previous = annotation.replace_location(location);
        match self.insertion_index(&annotation) {
            Ok(new_index) => {
                self.annotations.insert(new_index, annotation);
                self.reindex(index.min(new_index));
                Ok(new_index)
            }
            Err(err) => {
                warn!(tier = %self.name, index, error = %err, "location change rolled back");
                annotation.replace_location(previous);
                self.annotations.insert(index, annotation);
                Err(err)
            }
        }
    }

    /// Index of `annotation` in this tier, compared by identifier.
    pub fn get_annotation_index(&self, annotation: &Annotation) -> Option<usize> {
        let lowest = annotation.lowest();
        let start = self.bisect_by(&lowest, Annotation::lowest);
        self.annotations[start..]
            .iter()
            .take_while(|a| a.lowest() == lowest)
            .position(|a| a.id() == annotation.id())
            .map(|offset| start + offset)
            .or_else(|| self.annotations.iter().position(|a| a.id() == annotation.id()))
    }

    /// Move every annotation in time.
    pub fn shift(&mut self, delay: f64) -> AnnDataResult<()> {
        let shifted = self
            .annotations
            .iter()
            .map(|a| a.location().shift(delay))
            .collect::<AnnDataResult<Vec<_>>>()?;
        for (annotation, location) in self.annotations.iter_mut().zip(shifted) {
            annotation.replace_location(location);
        }
        self.reindex(0);
        Ok(())
    }
}

impl MetaObject for Tier {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> MetadataMut<'_> {
        MetadataMut::new(&mut self.metadata)
    }
}

impl Index<usize> for Tier {
    type Output = Annotation;

    fn index(&self, index: usize) -> &Annotation {
        &self.annotations[index]
    }
}

impl<'a> IntoIterator for &'a Tier {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.annotations.iter().map(|a| a.to_string()).collect();
        write!(f, "{}: {}", self.name, parts.join(" | "))
    }
}
