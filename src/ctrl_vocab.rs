//! Controlled vocabularies.

use crate::{AnnDataError, AnnDataResult, MetaObject, Metadata, MetadataMut, Tag, TagType};

/// A closed set of admissible tags, each with an optional description.
#[derive(Debug, Clone, PartialEq)]
pub struct CtrlVocab {
    name: String,
    description: String,
    entries: Vec<(Tag, String)>,
    metadata: Metadata,
}

impl CtrlVocab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            entries: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Builder-style: set the metadata, identifier included.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build a vocabulary from a list of string tags.
    pub fn from_strs<'a>(name: impl Into<String>, tags: impl IntoIterator<Item = &'a str>) -> AnnDataResult<Self> {
        let mut vocab = Self::new(name);
        for tag in tags {
            vocab.add(Tag::new_str(tag), "")?;
        }
        Ok(vocab)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Type shared by every entry.
    pub fn tag_type(&self) -> Option<TagType> {
        self.entries.first().and_then(|(t, _)| t.tag_type())
    }

    /// Add an entry. Returns `false` if the tag was already there.
    pub fn add(&mut self, tag: Tag, description: &str) -> AnnDataResult<bool> {
        let found = tag
            .tag_type()
            .ok_or_else(|| AnnDataError::type_mismatch("non-empty tag", "empty tag"))?;
        if let Some(expected) = self.tag_type() {
            if expected != found {
                return Err(AnnDataError::type_mismatch(expected.as_str(), found.as_str()));
            }
        }
        if self.contains(&tag) {
            return Ok(false);
        }
        self.entries.push((tag, description.to_string()));
        Ok(true)
    }

    /// Remove an entry. Returns `false` if the tag wasn't there.
    pub fn remove(&mut self, tag: &Tag) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| t != tag);
        before != self.entries.len()
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.entries.iter().any(|(t, _)| t == tag)
    }

    /// Check a tag against the vocabulary. The empty tag is always admitted.
    pub fn validate_tag(&self, tag: &Tag) -> AnnDataResult<()> {
        if tag.is_empty() || self.contains(tag) {
            Ok(())
        } else {
            Err(AnnDataError::CtrlVocabViolation {
                tag: tag.content(),
                vocab: self.name.clone(),
            })
        }
    }

    pub fn get_tag_description(&self, tag: &Tag) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, d)| d.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &str)> {
        self.entries.iter().map(|(t, d)| (t, d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetaObject for CtrlVocab {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> MetadataMut<'_> {
        MetadataMut::new(&mut self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_validate() {
        let mut vocab = CtrlVocab::from_strs("pos", ["def", "ex", "comp"]).unwrap();
        assert_eq!(vocab.len(), 3);
        assert!(!vocab.add(Tag::from("ex"), "").unwrap());
        assert!(vocab.add(Tag::from("biz"), "business").unwrap());
        assert_eq!(vocab.get_tag_description(&Tag::from("biz")), Some("business"));
        assert!(vocab.validate_tag(&Tag::Empty).is_ok());
        assert!(vocab.remove(&Tag::from("biz")));
        assert!(matches!(
            vocab.validate_tag(&Tag::from("biz")),
            Err(AnnDataError::CtrlVocabViolation { .. })
        ));
    }

    #[test]
    fn test_single_tag_type() {
        let mut vocab = CtrlVocab::new("numbers");
        vocab.add(Tag::Int(1), "").unwrap();
        assert!(matches!(
            vocab.add(Tag::from("one"), ""),
            Err(AnnDataError::TypeMismatch { .. })
        ));
        assert!(vocab.add(Tag::Empty, "").is_err());
        assert_eq!(vocab.tag_type(), Some(TagType::Int));
    }
}
