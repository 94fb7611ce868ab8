//! Annotations: a location, labels and metadata.

use std::fmt;

use crate::{Duration, Label, Location, MetaObject, Metadata, MetadataMut, Point, Tag};

/// One labelled placement.
///
/// An annotation owns its location and labels. Once appended to a
/// [`Tier`](crate::Tier) it remembers the identifier of that tier; the tier
/// is the only way to mutate it from then on, so every change goes
/// through the tier's validation.
#[derive(Debug, Clone)]
pub struct Annotation {
    location: Location,
    labels: Vec<Label>,
    metadata: Metadata,
    parent: Option<String>,
}

impl Annotation {
    pub fn new(location: impl Into<Location>) -> Self {
        Self {
            location: location.into(),
            labels: Vec::new(),
            metadata: Metadata::new(),
            parent: None,
        }
    }

    pub fn with_labels(location: impl Into<Location>, labels: Vec<Label>) -> Self {
        Self {
            labels,
            ..Self::new(location)
        }
    }

    /// Builder-style: set the metadata, identifier included.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// A copy with the same location, labels and metadata but a fresh
    /// identifier and no parent.
    pub fn duplicate(&self) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in self.metadata.iter() {
            // keys other than `id` are always accepted
            let _ = metadata.set(key, value);
        }
        Self {
            location: self.location.clone(),
            labels: self.labels.clone(),
            metadata,
            parent: None,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Identifier of the tier holding this annotation.
    pub fn parent_tier(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub(crate) fn set_parent(&mut self, tier_id: Option<String>) {
        self.parent = tier_id;
    }

    /// Replace the location. Only checked by the holding tier.
    pub(crate) fn replace_location(&mut self, location: Location) -> Location {
        std::mem::replace(&mut self.location, location)
    }

    /// Replace the labels. Only checked by the holding tier.
    pub(crate) fn replace_labels(&mut self, labels: Vec<Label>) -> Vec<Label> {
        std::mem::replace(&mut self.labels, labels)
    }

    /// Set the labels of an annotation that doesn't belong to a tier yet.
    pub fn set_labels(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    pub fn append_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// True if at least one label has a non-empty tag.
    pub fn is_labelled(&self) -> bool {
        self.labels.iter().any(Label::is_tagged)
    }

    pub fn lowest(&self) -> Point {
        self.location.lowest()
    }

    pub fn highest(&self) -> Point {
        self.location.highest()
    }

    /// Boundary points of every location alternative.
    pub fn points(&self) -> Vec<Point> {
        self.location.points()
    }

    pub fn duration(&self) -> Duration {
        self.location.duration()
    }

    /// Every tag of every label.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.labels.iter().flat_map(|l| l.tags())
    }

    /// Best tag of each label.
    pub fn best_tags(&self) -> Vec<&Tag> {
        self.labels.iter().map(Label::best).collect()
    }

    pub fn contains_tag(&self, tag: &Tag) -> bool {
        self.labels.iter().any(|l| l.contains(tag))
    }

    /// Labels joined by `separator`, see [`Label::serialize`].
    pub fn serialize_labels(&self, separator: &str, empty: &str, alt: bool) -> String {
        self.labels
            .iter()
            .map(|l| l.serialize(empty, alt))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl MetaObject for Annotation {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> MetadataMut<'_> {
        MetadataMut::new(&mut self.metadata)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)?;
        if !self.labels.is_empty() {
            write!(f, " {}", self.serialize_labels(" ", "", true))?;
        }
        Ok(())
    }
}
