//! The top-level container: tiers, media, vocabularies and hierarchy.
//!
//! A transcription hands out shared references to its tiers only. Every
//! mutation of a tier it owns goes through [`Transcription::edit_tier`],
//! which checks the hierarchy and registers the media and vocabulary the
//! tier refers to, or puts the tier back as it was.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    AnnDataError, AnnDataResult, CtrlVocab, Hierarchy, HierarchyKind, Media, MetaObject, Metadata,
    MetadataMut, Point, Tier,
};

#[derive(Debug, Clone)]
pub struct Transcription {
    name: String,
    metadata: Metadata,
    tiers: Vec<Tier>,
    media: Vec<Arc<Media>>,
    ctrl_vocabs: Vec<Arc<CtrlVocab>>,
    hierarchy: Hierarchy,
}

impl Transcription {
    /// A blank name is replaced by the identifier.
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
            tiers: Vec::new(),
            media: Vec::new(),
            ctrl_vocabs: Vec::new(),
            hierarchy: Hierarchy::new(),
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

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tier> {
        self.tiers.iter()
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn get(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(index)
    }

    pub fn media(&self) -> &[Arc<Media>] {
        &self.media
    }

    pub fn ctrl_vocabs(&self) -> &[Arc<CtrlVocab>] {
        &self.ctrl_vocabs
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    fn check_index(&self, index: usize) -> AnnDataResult<()> {
        if index >= self.tiers.len() {
            return Err(AnnDataError::IndexOutOfRange {
                index,
                len: self.tiers.len(),
            });
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Tiers
    // ---------------------------------------------------------------

    /// Create an empty tier and return its index.
    pub fn create_tier(
        &mut self,
        name: &str,
        media: Option<Arc<Media>>,
        ctrl_vocab: Option<Arc<CtrlVocab>>,
    ) -> AnnDataResult<usize> {
        let mut tier = Tier::new(name);
        tier.set_media(media);
        tier.set_ctrl_vocab(ctrl_vocab)?;
        self.append_tier(tier)
    }

    /// Take ownership of `tier` and return its index.
    ///
    /// The media and vocabulary of the tier are registered; an identifier
    /// already used by another tier, media or vocabulary is refused.
    pub fn append_tier(&mut self, mut tier: Tier) -> AnnDataResult<usize> {
        if self.tiers.iter().any(|t| t.id() == tier.id()) {
            return Err(AnnDataError::TrsAdd {
                id: tier.id().to_string(),
            });
        }
        self.register(tier.media().cloned(), tier.ctrl_vocab().cloned())?;
        tier.set_parent(Some(self.metadata.id().to_string()));
        debug!(trs = %self.name, tier = %tier.name(), "appended tier");
        self.tiers.push(tier);
        Ok(self.tiers.len() - 1)
    }

    /// Remove the tier at `index` together with its hierarchy links.
    pub fn pop_tier(&mut self, index: usize) -> AnnDataResult<Tier> {
        self.check_index(index)?;
        let mut tier = self.tiers.remove(index);
        let removed = self.hierarchy.remove_tier(tier.id());
        tier.set_parent(None);
        debug!(trs = %self.name, tier = %tier.name(), links = removed, "popped tier");
        Ok(tier)
    }

    pub fn get_tier_index(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        self.tiers.iter().position(|t| {
            if case_sensitive {
                t.name() == name
            } else {
                t.name().to_lowercase() == name.to_lowercase()
            }
        })
    }

    /// First tier named `name`.
    pub fn find(&self, name: &str, case_sensitive: bool) -> Option<&Tier> {
        self.get_tier_index(name, case_sensitive).map(|i| &self.tiers[i])
    }

    pub fn find_id(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id() == id)
    }

    /// Rename the tier at `index`. A name already used by another tier gets
    /// a `(n)` suffix; the name actually given is returned.
    pub fn rename_tier(&mut self, index: usize, name: &str) -> AnnDataResult<String> {
        self.check_index(index)?;
        let taken = |candidate: &str| {
            self.tiers
                .iter()
                .enumerate()
                .any(|(i, t)| i != index && t.name() == candidate)
        };
        let base = name.trim();
        let mut candidate = base.to_string();
        let mut n = 2;
        while taken(&candidate) {
            candidate = format!("{}({})", base, n);
            n += 1;
        }
        self.tiers[index].set_name(candidate);
        Ok(self.tiers[index].name().to_string())
    }

    // ---------------------------------------------------------------
    // Media and controlled vocabularies
    // ---------------------------------------------------------------

    fn check_media(&self, media: &Arc<Media>) -> AnnDataResult<bool> {
        match self.media.iter().find(|m| m.id() == media.id()) {
            Some(known) if Arc::ptr_eq(known, media) => Ok(false),
            Some(_) => Err(AnnDataError::TrsAdd {
                id: media.id().to_string(),
            }),
            None => Ok(true),
        }
    }

    fn check_ctrl_vocab(&self, vocab: &Arc<CtrlVocab>) -> AnnDataResult<bool> {
        match self.ctrl_vocabs.iter().find(|v| v.id() == vocab.id()) {
            Some(known) if Arc::ptr_eq(known, vocab) => Ok(false),
            Some(_) => Err(AnnDataError::TrsAdd {
                id: vocab.id().to_string(),
            }),
            None => Ok(true),
        }
    }

    /// Check both references before registering either.
    fn register(&mut self, media: Option<Arc<Media>>, vocab: Option<Arc<CtrlVocab>>) -> AnnDataResult<()> {
        let new_media = match &media {
            Some(m) => self.check_media(m)?,
            None => false,
        };
        let new_vocab = match &vocab {
            Some(v) => self.check_ctrl_vocab(v)?,
            None => false,
        };
        if new_media {
            self.media.extend(media);
        }
        if new_vocab {
            self.ctrl_vocabs.extend(vocab);
        }
        Ok(())
    }

    /// Register a media. Adding the same object twice does nothing.
    pub fn add_media(&mut self, media: Arc<Media>) -> AnnDataResult<()> {
        if self.check_media(&media)? {
            self.media.push(media);
        }
        Ok(())
    }

    /// Unregister a media; tiers referring to it lose their media.
    pub fn remove_media(&mut self, id: &str) -> Option<Arc<Media>> {
        let index = self.media.iter().position(|m| m.id() == id)?;
        let media = self.media.remove(index);
        for tier in self.tiers.iter_mut() {
            if tier.media().map_or(false, |m| m.id() == id) {
                tier.set_media(None);
            }
        }
        Some(media)
    }

    /// Register a controlled vocabulary. Adding the same object twice does
    /// nothing.
    pub fn add_ctrl_vocab(&mut self, vocab: Arc<CtrlVocab>) -> AnnDataResult<()> {
        if self.check_ctrl_vocab(&vocab)? {
            self.ctrl_vocabs.push(vocab);
        }
        Ok(())
    }

    /// Unregister a vocabulary; tiers bound to it are unbound.
    pub fn remove_ctrl_vocab(&mut self, id: &str) -> Option<Arc<CtrlVocab>> {
        let index = self.ctrl_vocabs.iter().position(|v| v.id() == id)?;
        let vocab = self.ctrl_vocabs.remove(index);
        for tier in self.tiers.iter_mut() {
            if tier.ctrl_vocab().map_or(false, |v| v.id() == id) {
                // unbinding never fails
                let _ = tier.set_ctrl_vocab(None);
            }
        }
        Some(vocab)
    }

    pub fn get_ctrl_vocab_from_name(&self, name: &str) -> Option<&Arc<CtrlVocab>> {
        self.ctrl_vocabs.iter().find(|v| v.name() == name)
    }

    pub fn get_media_from_id(&self, id: &str) -> Option<&Arc<Media>> {
        self.media.iter().find(|m| m.id() == id)
    }

    pub fn set_tier_media(&mut self, index: usize, media: Option<Arc<Media>>) -> AnnDataResult<()> {
        self.edit_tier(index, |tier| {
            tier.set_media(media);
            Ok(())
        })
    }

    pub fn set_tier_ctrl_vocab(&mut self, index: usize, vocab: Option<Arc<CtrlVocab>>) -> AnnDataResult<()> {
        self.edit_tier(index, |tier| tier.set_ctrl_vocab(vocab))
    }

    // ---------------------------------------------------------------
    // Hierarchy and validated edits
    // ---------------------------------------------------------------

    pub fn add_hierarchy_link(&mut self, kind: HierarchyKind, parent: usize, child: usize) -> AnnDataResult<()> {
        self.check_index(parent)?;
        self.check_index(child)?;
        self.hierarchy.add_link(kind, &self.tiers[parent], &self.tiers[child])
    }

    /// Remove the link above the tier at `child`. Returns false if it had
    /// no parent.
    pub fn remove_hierarchy_link(&mut self, child: usize) -> AnnDataResult<bool> {
        self.check_index(child)?;
        Ok(self.hierarchy.remove_link(self.tiers[child].id()).is_some())
    }

    /// Check every link the tier at `index` takes part in.
    pub fn validate_hierarchy(&self, index: usize) -> AnnDataResult<()> {
        self.check_index(index)?;
        self.hierarchy.validate_tier(&self.tiers[index], &self.tiers)
    }

    /// Run `edit` on the tier at `index`.
    ///
    /// Afterwards the hierarchy is validated and the media and vocabulary
    /// of the tier are registered. If `edit` or any of these checks fails,
    /// the tier is restored and the error returned.
    pub fn edit_tier<F, R>(&mut self, index: usize, edit: F) -> AnnDataResult<R>
    where
        F: FnOnce(&mut Tier) -> AnnDataResult<R>,
    {
        self.check_index(index)?;
        let snapshot = self.tiers[index].clone();
        let result = edit(&mut self.tiers[index]).and_then(|value| {
            self.hierarchy.validate_tier(&self.tiers[index], &self.tiers)?;
            let (media, vocab) = (
                self.tiers[index].media().cloned(),
                self.tiers[index].ctrl_vocab().cloned(),
            );
            self.register(media, vocab)?;
            Ok(value)
        });
        if let Err(err) = &result {
            warn!(trs = %self.name, tier = %snapshot.name(), error = %err, "tier edit rolled back");
            self.tiers[index] = snapshot;
        } else {
            self.tiers[index].set_parent(Some(self.metadata.id().to_string()));
        }
        result
    }

    // ---------------------------------------------------------------
    // Time
    // ---------------------------------------------------------------

    /// Lowest point among all the tiers.
    pub fn get_min_point(&self) -> Option<Point> {
        self.tiers
            .iter()
            .filter_map(Tier::get_first_point)
            .fold(None, |acc: Option<Point>, p| match acc {
                Some(min) if min.midpoint() <= p.midpoint() => Some(min),
                _ => Some(p),
            })
    }

    /// Highest point among all the tiers.
    pub fn get_max_point(&self) -> Option<Point> {
        self.tiers
            .iter()
            .filter_map(Tier::get_last_point)
            .fold(None, |acc: Option<Point>, p| match acc {
                Some(max) if max.midpoint() >= p.midpoint() => Some(max),
                _ => Some(p),
            })
    }

    /// Move every tier in time. Nothing moves if one tier can't.
    pub fn shift(&mut self, delay: f64) -> AnnDataResult<()> {
        let mut shifted = self.tiers.clone();
        for tier in shifted.iter_mut() {
            tier.shift(delay)?;
        }
        self.tiers = shifted;
        Ok(())
    }
}

impl MetaObject for Transcription {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> MetadataMut<'_> {
        MetadataMut::new(&mut self.metadata)
    }
}

impl Index<usize> for Transcription {
    type Output = Tier;

    fn index(&self, index: usize) -> &Tier {
        &self.tiers[index]
    }
}

impl<'a> IntoIterator for &'a Transcription {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

impl fmt::Display for Transcription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} tiers)", self.name, self.tiers.len())?;
        for tier in &self.tiers {
            writeln!(f, "  {}", tier)?;
        }
        Ok(())
    }
}
