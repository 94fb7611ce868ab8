//! Labels: scored alternative tags.

use std::fmt;

use crate::scored::best_index;
use crate::{AnnDataError, AnnDataResult, Scored, Tag, TagType};

/// One or several alternative tags, all of the same declared type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    alternatives: Vec<Scored<Tag>>,
}

impl Label {
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            alternatives: vec![Scored::unscored(tag.into())],
        }
    }

    pub fn with_alternatives(alternatives: Vec<Scored<Tag>>) -> AnnDataResult<Self> {
        let mut label = Self::default();
        for alt in alternatives {
            label.append(alt.value, alt.score)?;
        }
        Ok(label)
    }

    /// Add an alternative tag. Non-empty tags must share one type.
    pub fn append(&mut self, tag: impl Into<Tag>, score: Option<f64>) -> AnnDataResult<()> {
        let tag = tag.into();
        if let (Some(expected), Some(found)) = (self.tag_type(), tag.tag_type()) {
            if expected != found {
                return Err(AnnDataError::type_mismatch(expected.as_str(), found.as_str()));
            }
        }
        self.alternatives.push(Scored::new(tag, score));
        Ok(())
    }

    /// Remove every alternative equal to `tag`.
    pub fn remove(&mut self, tag: &Tag) {
        self.alternatives.retain(|a| &a.value != tag);
    }

    pub fn alternatives(&self) -> &[Scored<Tag>] {
        &self.alternatives
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.alternatives.iter().map(|a| &a.value)
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Type of the non-empty tags, if any.
    pub fn tag_type(&self) -> Option<TagType> {
        self.tags().find_map(Tag::tag_type)
    }

    /// True if at least one tag is non-empty.
    pub fn is_tagged(&self) -> bool {
        self.tags().any(|t| !t.is_empty())
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags().any(|t| t == tag)
    }

    /// The tag with the highest score, first one on ties.
    pub fn best(&self) -> &Tag {
        static EMPTY: Tag = Tag::Empty;
        match best_index(&self.alternatives) {
            Some(idx) => &self.alternatives[idx].value,
            None => &EMPTY,
        }
    }

    /// Text form of the label.
    ///
    /// Without `alt`, the content of the best tag (or `empty` if it has no
    /// value). With `alt` and several alternatives, `{a|b|c}`.
    pub fn serialize(&self, empty: &str, alt: bool) -> String {
        if alt && self.alternatives.len() > 1 {
            let parts: Vec<String> = self
                .tags()
                .map(|t| if t.is_empty() { empty.to_string() } else { t.content() })
                .collect();
            return format!("{{{}}}", parts.join("|"));
        }
        let best = self.best();
        if best.is_empty() {
            empty.to_string()
        } else {
            best.content()
        }
    }
}

impl From<Tag> for Label {
    fn from(tag: Tag) -> Self {
        Label::new(tag)
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::new(Tag::new_str(text))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize("", true))
    }
}
