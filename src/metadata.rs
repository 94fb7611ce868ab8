//! Key/value metadata with a stable identifier.

use std::collections::BTreeMap;
use std::ops::Deref;

use crate::{AnnDataError, AnnDataResult};

/// Reserved metadata key holding the identifier.
pub const ID_KEY: &str = "id";

/// String metadata attached to an entity.
///
/// The identifier is generated on creation and can't be changed afterwards.
/// It is exposed through [`Metadata::get`] under the `id` key like any other
/// entry, but [`Metadata::set`] refuses to overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    id: String,
    entries: BTreeMap<String, String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl Metadata {
    /// Create metadata with a freshly generated identifier.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Create metadata with a known identifier, e.g. one read from a file.
    ///
    /// An empty identifier is replaced by a generated one.
    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.is_empty() {
            return Self::new();
        }
        Self {
            id,
            entries: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if key == ID_KEY {
            return Some(&self.id);
        }
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        key == ID_KEY || self.entries.contains_key(key)
    }

    /// Set a value, returning the previous one.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> AnnDataResult<Option<String>> {
        let key = key.into();
        if key == ID_KEY {
            return Err(AnnDataError::ImmutableId { id: self.id.clone() });
        }
        Ok(self.entries.insert(key, value.into()))
    }

    /// Remove a key. The identifier can't be removed.
    pub fn pop(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Keys other than the identifier, in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries other than the identifier, in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries, not counting the identifier.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Write access to the metadata of an entity.
///
/// Entries can be set and removed, but the metadata as a whole can't be
/// replaced, so the identifier stays the one the entity was created with.
#[derive(Debug)]
pub struct MetadataMut<'a>(&'a mut Metadata);

impl<'a> MetadataMut<'a> {
    pub(crate) fn new(metadata: &'a mut Metadata) -> Self {
        Self(metadata)
    }

    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> AnnDataResult<Option<String>> {
        self.0.set(key, value)
    }

    pub fn pop(&mut self, key: &str) -> Option<String> {
        self.0.pop(key)
    }
}

impl Deref for MetadataMut<'_> {
    type Target = Metadata;

    fn deref(&self) -> &Metadata {
        self.0
    }
}

/// Entities carrying [`Metadata`].
pub trait MetaObject {
    fn metadata(&self) -> &Metadata;

    fn metadata_mut(&mut self) -> MetadataMut<'_>;

    fn id(&self) -> &str {
        self.metadata().id()
    }

    fn get_meta(&self, key: &str) -> Option<&str> {
        self.metadata().get(key)
    }

    fn set_meta(&mut self, key: &str, value: &str) -> AnnDataResult<Option<String>> {
        self.metadata_mut().set(key, value)
    }

    fn pop_meta(&mut self, key: &str) -> Option<String> {
        self.metadata_mut().pop(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Metadata::new();
        let b = Metadata::new();
        assert!(!a.id().is_empty());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_id_is_immutable() {
        let mut meta = Metadata::with_id("tier-1");
        assert_eq!(meta.get("id"), Some("tier-1"));
        assert!(matches!(meta.set("id", "other"), Err(AnnDataError::ImmutableId { .. })));
        assert_eq!(meta.pop("id"), None);
        assert_eq!(meta.id(), "tier-1");
    }

    #[test]
    fn test_set_and_pop() {
        let mut meta = Metadata::with_id("");
        assert!(!meta.id().is_empty());
        assert_eq!(meta.set("language", "fra").unwrap(), None);
        assert_eq!(meta.set("language", "eng").unwrap(), Some("fra".to_string()));
        assert_eq!(meta.keys().collect::<Vec<_>>(), vec!["language"]);
        assert_eq!(meta.pop("language"), Some("eng".to_string()));
        assert!(meta.is_empty());
        assert!(meta.contains("id"));
    }

    struct Entity(Metadata);

    impl MetaObject for Entity {
        fn metadata(&self) -> &Metadata {
            &self.0
        }

        fn metadata_mut(&mut self) -> MetadataMut<'_> {
            MetadataMut::new(&mut self.0)
        }
    }

    #[test]
    fn test_meta_object_keeps_its_id() {
        let mut entity = Entity(Metadata::with_id("e-1"));
        entity.set_meta("speaker", "A").unwrap();
        assert!(entity.set_meta("id", "e-2").is_err());
        let meta = entity.metadata_mut();
        assert_eq!(meta.get("speaker"), Some("A"));
        assert_eq!(entity.pop_meta("speaker"), Some("A".to_string()));
        assert_eq!(entity.pop_meta("id"), None);
        assert_eq!(entity.id(), "e-1");
    }
}
