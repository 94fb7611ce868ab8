//! Filters described in TOML files.
//!
//! ```toml
//! tier = "phones"
//! tier_name = "long-silences"
//! match_all = true
//!
//! [[predicate]]
//! kind = "tag"
//! function = "exact"
//! values = ["#"]
//!
//! [[predicate]]
//! kind = "dur"
//! function = "gt"
//! values = [0.2]
//! ```

use std::fs;
use std::path::Path;

use layered_anndata::{Tier, Transcription};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comparator::RelationOptions;
use crate::{FilterError, FilterResult, PredicateSpec, RelationFilter, SingleFilter};

/// A filter on one tier of a transcription.
///
/// The predicates are applied first; the relation, if any, is then applied
/// to the annotations they selected, or to the whole tier when there are
/// no predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Name of the filtered tier.
    pub tier: String,
    /// Name of the resulting tier; defaults to `"<tier>-filtered"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_name: Option<String>,
    #[serde(default)]
    pub match_all: bool,
    /// Replace labels by the descriptions of what matched.
    #[serde(default)]
    pub annot_format: bool,
    #[serde(default, rename = "predicate")]
    pub predicates: Vec<PredicateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationDefinition>,
}

/// The `[relation]` table of a filter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDefinition {
    /// Name of the reference tier.
    pub other: String,
    pub functions: Vec<String>,
    /// Clip the result to the annotations of the reference tier.
    #[serde(default)]
    pub fit: bool,
    #[serde(flatten)]
    pub options: RelationOptions,
}

impl FilterDefinition {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> FilterResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| FilterError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a TOML document and check the function names of its
    /// predicates.
    pub fn from_toml_str(content: &str) -> FilterResult<Self> {
        let mut definition: FilterDefinition =
            toml::from_str(content).map_err(|e| FilterError::Parse {
                message: e.to_string(),
            })?;
        definition.predicates = definition
            .predicates
            .into_iter()
            .map(PredicateSpec::normalized)
            .collect::<Result<_, _>>()?;
        Ok(definition)
    }

    pub fn to_toml_string(&self) -> FilterResult<String> {
        toml::to_string(self).map_err(|e| FilterError::Parse {
            message: e.to_string(),
        })
    }

    pub fn output_name(&self) -> String {
        self.tier_name
            .clone()
            .unwrap_or_else(|| format!("{}-filtered", self.tier))
    }

    /// Apply the filter to the tiers of `trs`.
    pub fn run(&self, trs: &Transcription) -> FilterResult<Tier> {
        let tier = lookup(trs, &self.tier)?;
        let name = self.output_name();

        let selected = if self.predicates.is_empty() {
            None
        } else {
            Some(
                SingleFilter::new(tier)
                    .predicates(self.predicates.iter().cloned())
                    .match_all(self.match_all)
                    .to_tier(&name, self.annot_format)?,
            )
        };

        let result = match (&self.relation, selected) {
            (None, None) => Tier::new(name.as_str()),
            (None, Some(selected)) => selected,
            (Some(relation), selected) => {
                let source = selected.as_ref().unwrap_or(tier);
                let other = lookup(trs, &relation.other)?;
                RelationFilter::new(source, other)
                    .functions(relation.functions.iter().cloned())
                    .options(relation.options.clone())
                    .to_tier(&name, self.annot_format, relation.fit)?
            }
        };
        debug!(tier = %self.tier, result = %name, len = result.len(), "filter definition applied");
        Ok(result)
    }
}

fn lookup<'a>(trs: &'a Transcription, name: &str) -> FilterResult<&'a Tier> {
    trs.find(name, true).ok_or_else(|| FilterError::UnknownTier {
        name: name.to_string(),
    })
}
