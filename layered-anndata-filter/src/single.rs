//! Filters over the annotations of one tier.

use layered_anndata::{AnnDataError, AnnDataResult, Annotation, Duration, Label, Point, Tier};
use tracing::{debug, trace};

use crate::comparator::{
    Comparator, DurationCompare, DurationFn, ListCompare, ListFn, LocalizationCompare,
    LocalizationFn, TagCompare, TagFn, TagOperand,
};
use crate::{AnnSet, FilterValue, LabelLogic, PredicateKind, PredicateSpec};

/// Select annotations of a tier with a list of predicates.
///
/// ```
/// use layered_anndata::{Annotation, Interval, Label, Tier};
/// use layered_anndata_filter::{PredicateKind, PredicateSpec, SingleFilter};
///
/// let mut tier = Tier::new("phones");
/// for (b, e, tag) in [(0., 1., "#"), (1., 2., "a"), (2., 3., "#")] {
///     let interval = Interval::from_secs(b, e).unwrap();
///     tier.append(Annotation::with_labels(interval, vec![Label::new(tag)])).unwrap();
/// }
///
/// let silences = SingleFilter::new(&tier)
///     .predicate(PredicateSpec::parse(PredicateKind::Tag, "exact", vec!["#".into()]).unwrap())
///     .to_tier("silences", false)
///     .unwrap();
/// assert_eq!(silences.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SingleFilter<'t> {
    tier: &'t Tier,
    predicates: Vec<PredicateSpec>,
    match_all: bool,
}

impl<'t> SingleFilter<'t> {
    pub fn new(tier: &'t Tier) -> Self {
        Self {
            tier,
            predicates: Vec::new(),
            match_all: false,
        }
    }

    pub fn predicate(mut self, spec: PredicateSpec) -> Self {
        self.predicates.push(spec);
        self
    }

    pub fn predicates(mut self, specs: impl IntoIterator<Item = PredicateSpec>) -> Self {
        self.predicates.extend(specs);
        self
    }

    /// Keep annotations matching every predicate instead of any of them.
    pub fn match_all(mut self, match_all: bool) -> Self {
        self.match_all = match_all;
        self
    }

    /// Annotations selected by the predicates, each with the description
    /// of the predicate values it matched.
    pub fn run(&self) -> AnnDataResult<AnnSet<'t>> {
        let mut result: Option<AnnSet<'t>> = None;
        for spec in &self.predicates {
            let spec = spec.clone().normalized()?;
            let mut selected = AnnSet::new();
            for value in &spec.values {
                selected = selected.union(&self.select(&spec, value)?);
            }
            debug!(
                tier = self.tier.name(),
                predicate = %spec.name(),
                len = selected.len(),
                "predicate applied"
            );
            result = Some(match result {
                None => selected,
                Some(previous) if self.match_all => previous.intersection(&selected),
                Some(previous) => previous.union(&selected),
            });
        }
        Ok(result.unwrap_or_default())
    }

    /// Run the filter and copy the selection into a new tier.
    ///
    /// With `annot_format`, the labels of each copy are the descriptions
    /// of the predicates it matched.
    pub fn to_tier(&self, name: &str, annot_format: bool) -> AnnDataResult<Tier> {
        let tier = self.run()?.to_tier(name, annot_format)?;
        debug!(tier = name, len = tier.len(), "single filter done");
        Ok(tier)
    }

    fn select(&self, spec: &PredicateSpec, value: &FilterValue) -> AnnDataResult<AnnSet<'t>> {
        let description = spec.describe(value);
        let matcher = Matcher::new(self.tier, spec, value)?;
        let mut selected = AnnSet::new();
        for annotation in self.tier.iter() {
            if matcher.matches(annotation, spec) {
                trace!(annotation = %annotation, predicate = %description, "match");
                selected.append(annotation, description.clone());
            }
        }
        Ok(selected)
    }
}

/// A predicate function with its value already cast.
enum Matcher {
    Tag(TagFn, TagOperand),
    Loc(LocalizationFn, Point),
    Dur(DurationFn, Duration),
    Nlab(ListFn, usize),
}

impl Matcher {
    fn new(tier: &Tier, spec: &PredicateSpec, value: &FilterValue) -> AnnDataResult<Self> {
        Ok(match spec.kind {
            PredicateKind::Tag => {
                let function = TagCompare::get(&spec.function)?;
                let operand = match tier.tag_type() {
                    Some(tag_type) => TagCompare::prepare_for(&spec.function, value, tag_type)?,
                    None => TagCompare::prepare(&spec.function, value)?,
                };
                Matcher::Tag(function, operand)
            }
            PredicateKind::Loc => Matcher::Loc(
                LocalizationCompare::get(&spec.function)?,
                Point::new(value.as_f64().ok_or_else(|| cast_error(value, "float"))?),
            ),
            PredicateKind::Dur => Matcher::Dur(
                DurationCompare::get(&spec.function)?,
                Duration::new(value.as_f64().ok_or_else(|| cast_error(value, "float"))?),
            ),
            PredicateKind::Nlab => Matcher::Nlab(
                ListCompare::get(&spec.function)?,
                value.as_count().ok_or_else(|| cast_error(value, "int"))?,
            ),
        })
    }

    fn matches(&self, annotation: &Annotation, spec: &PredicateSpec) -> bool {
        let negate = spec.negate;
        match self {
            Matcher::Tag(f, operand) => {
                let label_matches =
                    |label: &Label| label.tags().any(|tag| f(tag, operand) != negate);
                let labels = annotation.labels();
                match spec.logic_bool_labels {
                    LabelLogic::Any => labels.iter().any(label_matches),
                    LabelLogic::All => !labels.is_empty() && labels.iter().all(label_matches),
                }
            }
            Matcher::Loc(f, point) => annotation
                .location()
                .alternatives()
                .iter()
                .any(|alt| f(&alt.value, point) != negate),
            Matcher::Dur(f, duration) => f(&annotation.duration(), duration) != negate,
            Matcher::Nlab(f, count) => f(annotation.labels().len(), *count) != negate,
        }
    }
}

fn cast_error(value: &FilterValue, target: &str) -> AnnDataError {
    AnnDataError::ValueCast {
        value: value.to_string(),
        target: target.to_string(),
    }
}
