//! Parent/child links between the tiers of a transcription.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AnnDataError, AnnDataResult, MetaObject, Tier};

/// How the points of a child tier relate to the points of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HierarchyKind {
    /// Parent and child share the same boundary points.
    TimeAssociation,
    /// Every point of the child is a point of the parent.
    TimeAlignment,
}

impl HierarchyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyKind::TimeAssociation => "TimeAssociation",
            HierarchyKind::TimeAlignment => "TimeAlignment",
        }
    }

    /// Check that `child` may be linked under `parent` with this kind.
    pub fn validate(&self, parent: &Tier, child: &Tier) -> AnnDataResult<()> {
        match self {
            HierarchyKind::TimeAssociation => Hierarchy::validate_time_association(parent, child),
            HierarchyKind::TimeAlignment => Hierarchy::validate_time_alignment(parent, child),
        }
    }
}

impl fmt::Display for HierarchyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HierarchyKind {
    type Err = AnnDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TimeAssociation" => Ok(HierarchyKind::TimeAssociation),
            "TimeAlignment" => Ok(HierarchyKind::TimeAlignment),
            other => Err(AnnDataError::type_mismatch("TimeAssociation or TimeAlignment", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Link {
    kind: HierarchyKind,
    parent: String,
    child: String,
}

/// Links between tiers, stored by tier identifier.
///
/// A tier has at most one parent and the links never form a cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    links: Vec<Link>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Every link as `(kind, parent id, child id)`.
    pub fn iter(&self) -> impl Iterator<Item = (HierarchyKind, &str, &str)> {
        self.links
            .iter()
            .map(|l| (l.kind, l.parent.as_str(), l.child.as_str()))
    }

    fn link_of(&self, child_id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.child == child_id)
    }

    pub fn get_parent(&self, child_id: &str) -> Option<&str> {
        self.link_of(child_id).map(|l| l.parent.as_str())
    }

    pub fn get_link_kind(&self, child_id: &str) -> Option<HierarchyKind> {
        self.link_of(child_id).map(|l| l.kind)
    }

    /// Children of `parent_id`, optionally restricted to one link kind.
    pub fn get_children(&self, parent_id: &str, kind: Option<HierarchyKind>) -> Vec<&str> {
        self.links
            .iter()
            .filter(|l| l.parent == parent_id && kind.map_or(true, |k| k == l.kind))
            .map(|l| l.child.as_str())
            .collect()
    }

    /// Parent, grand-parent, and so on up to the root.
    pub fn get_ancestors(&self, child_id: &str) -> Vec<&str> {
        let mut ancestors: Vec<&str> = Vec::new();
        let mut current = child_id;
        while let Some(parent) = self.get_parent(current) {
            if ancestors.contains(&parent) {
                break;
            }
            ancestors.push(parent);
            current = parent;
        }
        ancestors
    }

    /// Link `child` under `parent`.
    ///
    /// Fails with a hierarchy violation if the link would create a cycle,
    /// if the child already has a parent, if both tiers do not belong to
    /// the same transcription, or if their points do not satisfy `kind`.
    pub fn add_link(&mut self, kind: HierarchyKind, parent: &Tier, child: &Tier) -> AnnDataResult<()> {
        let (parent_id, child_id) = (parent.id(), child.id());
        if parent_id == child_id {
            return Err(AnnDataError::hierarchy(format!(
                "tier {} can't be linked to itself",
                parent.name()
            )));
        }
        if parent.parent() != child.parent() {
            return Err(AnnDataError::hierarchy(format!(
                "tiers {} and {} belong to different transcriptions",
                parent.name(),
                child.name()
            )));
        }
        if let Some(existing) = self.get_parent(child_id) {
            return Err(AnnDataError::hierarchy(format!(
                "tier {} already has a parent ({})",
                child.name(),
                existing
            )));
        }
        if self.get_ancestors(parent_id).contains(&child_id) {
            return Err(AnnDataError::hierarchy(format!(
                "linking {} under {} would create a cycle",
                child.name(),
                parent.name()
            )));
        }
        kind.validate(parent, child)?;

        self.links.push(Link {
            kind,
            parent: parent_id.to_string(),
            child: child_id.to_string(),
        });
        debug!(%kind, parent = %parent.name(), child = %child.name(), "added hierarchy link");
        Ok(())
    }

    /// Remove the link above `child_id`, returning its kind and parent id.
    pub fn remove_link(&mut self, child_id: &str) -> Option<(HierarchyKind, String)> {
        let index = self.links.iter().position(|l| l.child == child_id)?;
        let link = self.links.remove(index);
        Some((link.kind, link.parent))
    }

    /// Remove every link in which `tier_id` takes part. Returns how many
    /// links were removed.
    pub fn remove_tier(&mut self, tier_id: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|l| l.parent != tier_id && l.child != tier_id);
        before - self.links.len()
    }

    /// Parent and child have the same points.
    pub fn validate_time_association(parent: &Tier, child: &Tier) -> AnnDataResult<()> {
        if parent.is_superset(child) && child.is_superset(parent) {
            Ok(())
        } else {
            Err(AnnDataError::hierarchy(format!(
                "tiers {} and {} can't be time-associated",
                parent.name(),
                child.name()
            )))
        }
    }

    /// Every point of the child is a point of the parent.
    pub fn validate_time_alignment(parent: &Tier, child: &Tier) -> AnnDataResult<()> {
        if parent.is_superset(child) {
            Ok(())
        } else {
            Err(AnnDataError::hierarchy(format!(
                "tier {} can't be time-aligned with {}",
                child.name(),
                parent.name()
            )))
        }
    }

    /// Check every link `tier` takes part in.
    ///
    /// `tier` stands for the tier with the same identifier in `tiers`, so a
    /// modified copy can be validated before it replaces the original.
    pub fn validate_tier(&self, tier: &Tier, tiers: &[Tier]) -> AnnDataResult<()> {
        for link in self
            .links
            .iter()
            .filter(|l| l.parent == tier.id() || l.child == tier.id())
        {
            let parent = lookup(tier, tiers, &link.parent);
            let child = lookup(tier, tiers, &link.child);
            if let (Some(parent), Some(child)) = (parent, child) {
                link.kind.validate(parent, child)?;
            }
        }
        Ok(())
    }
}

fn lookup<'a>(tier: &'a Tier, tiers: &'a [Tier], id: &str) -> Option<&'a Tier> {
    if id == tier.id() {
        Some(tier)
    } else {
        tiers.iter().find(|t| t.id() == id)
    }
}
