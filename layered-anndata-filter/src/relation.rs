//! Filters on the time relations between the annotations of two tiers.

use layered_anndata::{AnnDataResult, Tier};
use tracing::{debug, trace};

use crate::comparator::{Comparator, IntervalCompare, IntervalFn, RelationOptions};
use crate::AnnSet;

const NEGATION: &str = "not_";

/// Select the annotations of `x` in relation with annotations of `y`.
///
/// Every localization alternative of an annotation of `x` is compared with
/// every alternative of every annotation of `y`; an annotation is kept as
/// soon as one of the functions holds, and the names of the functions that
/// held are its provenance.
#[derive(Debug, Clone)]
pub struct RelationFilter<'t> {
    x: &'t Tier,
    y: &'t Tier,
    functions: Vec<String>,
    options: RelationOptions,
}

impl<'t> RelationFilter<'t> {
    pub fn new(x: &'t Tier, y: &'t Tier) -> Self {
        Self {
            x,
            y,
            functions: Vec::new(),
            options: RelationOptions::default(),
        }
    }

    /// Add a relation, optionally prefixed by `not_`.
    pub fn function(mut self, name: impl Into<String>) -> Self {
        self.functions.push(name.into());
        self
    }

    pub fn functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn options(mut self, options: RelationOptions) -> Self {
        self.options = options;
        self
    }

    fn resolve(&self) -> AnnDataResult<Vec<(&str, IntervalFn, bool)>> {
        self.functions
            .iter()
            .map(|name| -> AnnDataResult<(&str, IntervalFn, bool)> {
                let (base, negate) = match name.strip_prefix(NEGATION) {
                    Some(base) => (base, true),
                    None => (name.as_str(), false),
                };
                Ok((name.as_str(), IntervalCompare::get(base)?, negate))
            })
            .collect()
    }

    pub fn run(&self) -> AnnDataResult<AnnSet<'t>> {
        let functions = self.resolve()?;
        let mut result = AnnSet::new();
        for a_x in self.x.iter() {
            for loc_x in a_x.location().alternatives() {
                let span_x = loc_x.value.span();
                for a_y in self.y.iter() {
                    for loc_y in a_y.location().alternatives() {
                        let span_y = loc_y.value.span();
                        for (name, f, negate) in &functions {
                            if f(&span_x, &span_y, &self.options) != *negate {
                                trace!(x = %span_x, y = %span_y, relation = *name, "match");
                                result.append(a_x, *name);
                            }
                        }
                    }
                }
            }
        }
        debug!(
            x = self.x.name(),
            y = self.y.name(),
            len = result.len(),
            "relation filter done"
        );
        Ok(result)
    }

    /// Run the filter and copy the selection into a tier called `name`.
    ///
    /// With `annot_value`, the labels of each copy are the relations that
    /// held. With `fit`, the copies are clipped to the annotations of `y`.
    pub fn to_tier(&self, name: &str, annot_value: bool, fit: bool) -> AnnDataResult<Tier> {
        let tier = self.run()?.to_tier(name, annot_value)?;
        if !fit {
            return Ok(tier);
        }
        let mut fitted = tier.fit(self.y)?;
        fitted.set_name(name);
        Ok(fitted)
    }
}
