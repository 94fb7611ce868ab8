//! Predicate records built by the caller or read from a filter file.

use std::fmt;

use layered_anndata::{AnnDataError, AnnDataResult};
use serde::{Deserialize, Serialize};

use crate::comparator::{
    Comparator, DurationCompare, ListCompare, LocalizationCompare, TagCompare,
};

const NEGATION: &str = "not_";

/// What a predicate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    /// The tags of the labels.
    Tag,
    /// The localizations.
    Loc,
    /// The duration.
    Dur,
    /// The number of labels.
    Nlab,
}

impl PredicateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateKind::Tag => "tag",
            PredicateKind::Loc => "loc",
            PredicateKind::Dur => "dur",
            PredicateKind::Nlab => "nlab",
        }
    }

    fn knows(&self, function: &str) -> bool {
        match self {
            PredicateKind::Tag => TagCompare::contains(function),
            PredicateKind::Loc => LocalizationCompare::contains(function),
            PredicateKind::Dur => DurationCompare::contains(function),
            PredicateKind::Nlab => ListCompare::contains(function),
        }
    }

    fn comparator(&self) -> &'static str {
        match self {
            PredicateKind::Tag => TagCompare::NAME,
            PredicateKind::Loc => LocalizationCompare::NAME,
            PredicateKind::Dur => DurationCompare::NAME,
            PredicateKind::Nlab => ListCompare::NAME,
        }
    }
}

/// How the labels of an annotation must match a tag predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLogic {
    /// At least one label matches.
    #[default]
    Any,
    /// The annotation has labels and every one of them matches.
    All,
}

/// A literal compared by a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FilterValue {
    /// Numeric value; strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FilterValue::Int(i) => Some(*i as f64),
            FilterValue::Float(f) => Some(*f),
            FilterValue::Str(s) => s.trim().parse().ok(),
            FilterValue::Bool(_) => None,
        }
    }

    /// Non-negative integer value; strings are parsed.
    pub fn as_count(&self) -> Option<usize> {
        match self {
            FilterValue::Int(i) => usize::try_from(*i).ok(),
            FilterValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Int(i) => write!(f, "{}", i),
            FilterValue::Float(x) => write!(f, "{}", x),
            FilterValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Str(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Str(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<f64> for FilterValue {
    fn from(x: f64) -> Self {
        FilterValue::Float(x)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// One predicate of a single-tier filter.
///
/// Values are alternatives: an annotation matching any of them matches the
/// predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateSpec {
    pub kind: PredicateKind,
    pub function: String,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub case_insensitive: bool,
    pub values: Vec<FilterValue>,
    #[serde(default)]
    pub logic_bool_labels: LabelLogic,
}

impl PredicateSpec {
    /// Build a predicate from a comparator name such as `"not_iexact"`.
    ///
    /// The `not_` prefix sets `negate`; for tag predicates an `i` prefix
    /// sets `case_insensitive`.
    pub fn parse(kind: PredicateKind, name: &str, values: Vec<FilterValue>) -> AnnDataResult<Self> {
        let spec = PredicateSpec {
            kind,
            function: name.to_string(),
            negate: false,
            case_insensitive: false,
            values,
            logic_bool_labels: LabelLogic::default(),
        };
        spec.normalized()
    }

    /// Builder-style: how the labels of an annotation combine.
    pub fn with_label_logic(mut self, logic: LabelLogic) -> Self {
        self.logic_bool_labels = logic;
        self
    }

    /// Move a `not_` prefix into `negate`, apply `case_insensitive` to the
    /// function name, and check that the comparator knows the function.
    pub fn normalized(mut self) -> AnnDataResult<Self> {
        if let Some(stripped) = self.function.strip_prefix(NEGATION) {
            self.function = stripped.to_string();
            self.negate = !self.negate;
        }
        if self.kind == PredicateKind::Tag {
            let lowered = format!("i{}", self.function);
            if self.case_insensitive
                && !TagCompare::is_case_insensitive(&self.function)
                && TagCompare::contains(&lowered)
            {
                self.function = lowered;
            }
            self.case_insensitive = TagCompare::is_case_insensitive(&self.function);
        }
        if !self.kind.knows(&self.function) {
            return Err(AnnDataError::UnknownFunction {
                name: self.function,
                comparator: self.kind.comparator().to_string(),
            });
        }
        Ok(self)
    }

    /// Function name as written by the caller, negation included.
    pub fn name(&self) -> String {
        if self.negate {
            format!("{}{}", NEGATION, self.function)
        } else {
            self.function.clone()
        }
    }

    /// Provenance string recorded for annotations matching `value`.
    pub fn describe(&self, value: &FilterValue) -> String {
        format!("{} = {}", self.name(), value)
    }
}
