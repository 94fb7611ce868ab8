use layered_anndata::{AnnDataError, AnnDataResult, Tag, TagType};
use regex::Regex;

use super::Comparator;
use crate::FilterValue;

/// A filter value made ready for one tag function.
#[derive(Debug, Clone)]
pub enum TagOperand {
    Text(String),
    Pattern(Regex),
    Number(f64),
    Bool(bool),
    /// A value cast to the tier's tag type, compared by equality
    Typed(Tag),
}

pub type TagFn = fn(&Tag, &TagOperand) -> bool;

/// String, boolean and numerical comparisons of a tag with a value.
///
/// Names starting with `i` compare strings case-insensitively.
pub struct TagCompare;

impl Comparator for TagCompare {
    type Function = TagFn;
    const NAME: &'static str = "TagCompare";

    fn table() -> &'static [(&'static str, TagFn)] {
        const TABLE: &[(&str, TagFn)] = &[
            ("exact", exact),
            ("iexact", iexact),
            ("contains", contains),
            ("icontains", icontains),
            ("startswith", startswith),
            ("istartswith", istartswith),
            ("endswith", endswith),
            ("iendswith", iendswith),
            ("regexp", regexp),
            ("bool", boolean),
            ("equal", equal),
            ("greater", greater),
            ("lower", lower),
        ];
        TABLE
    }
}

impl TagCompare {
    pub fn is_case_insensitive(name: &str) -> bool {
        name.starts_with('i') && Self::contains(name)
    }

    /// True for the functions comparing tag contents as strings.
    pub fn is_textual(name: &str) -> bool {
        Self::contains(name) && !matches!(name, "regexp" | "bool" | "equal" | "greater" | "lower")
    }

    /// Cast `value` to the operand `function` expects.
    pub fn prepare(function: &str, value: &FilterValue) -> AnnDataResult<TagOperand> {
        Self::get(function)?;
        match function {
            "regexp" => Regex::new(&value.to_string())
                .map(TagOperand::Pattern)
                .map_err(|_| cast_error(value, "regular expression")),
            "bool" => Tag::parse(&value.to_string(), TagType::Bool)?
                .as_bool()
                .map(TagOperand::Bool)
                .ok_or_else(|| cast_error(value, "bool")),
            "equal" | "greater" | "lower" => value
                .as_f64()
                .map(TagOperand::Number)
                .ok_or_else(|| cast_error(value, "float")),
            name if Self::is_case_insensitive(name) => {
                Ok(TagOperand::Text(value.to_string().to_lowercase()))
            }
            _ => Ok(TagOperand::Text(value.to_string())),
        }
    }

    /// Like [`TagCompare::prepare`], for a tier whose tags are of
    /// `tag_type`.
    ///
    /// Textual functions on int, float and bool tiers need a value of that
    /// type; `exact` and `iexact` then compare typed tags, so `"0.50"`
    /// matches `0.5`.
    pub fn prepare_for(
        function: &str,
        value: &FilterValue,
        tag_type: TagType,
    ) -> AnnDataResult<TagOperand> {
        if tag_type == TagType::Str || !Self::is_textual(function) {
            return Self::prepare(function, value);
        }
        let tag = Tag::parse(&value.to_string(), tag_type)?;
        match function {
            "exact" | "iexact" => Ok(TagOperand::Typed(tag)),
            _ => Self::prepare(function, value),
        }
    }
}

fn cast_error(value: &FilterValue, target: &str) -> AnnDataError {
    AnnDataError::ValueCast {
        value: value.to_string(),
        target: target.to_string(),
    }
}

/// Tag content, lowercased when the operand was.
fn text_pair<'a>(tag: &Tag, operand: &'a TagOperand, lowercase: bool) -> Option<(String, &'a str)> {
    match operand {
        TagOperand::Text(text) => {
            let content = tag.content();
            let content = if lowercase { content.to_lowercase() } else { content };
            Some((content, text.as_str()))
        }
        _ => None,
    }
}

fn exact(tag: &Tag, operand: &TagOperand) -> bool {
    match operand {
        TagOperand::Typed(typed) => tag == typed,
        _ => text_pair(tag, operand, false).map_or(false, |(c, t)| c == t),
    }
}

fn contains(tag: &Tag, operand: &TagOperand) -> bool {
    text_pair(tag, operand, false).map_or(false, |(c, t)| c.contains(t))
}

fn startswith(tag: &Tag, operand: &TagOperand) -> bool {
    text_pair(tag, operand, false).map_or(false, |(c, t)| c.starts_with(t))
}

fn endswith(tag: &Tag, operand: &TagOperand) -> bool {
    text_pair(tag, operand, false).map_or(false, |(c, t)| c.ends_with(t))
}

// operands of the i-variants are lowercased by `prepare`
fn iexact(tag: &Tag, operand: &TagOperand) -> bool {
    match operand {
        TagOperand::Typed(typed) => tag == typed,
        _ => text_pair(tag, operand, true).map_or(false, |(c, t)| c == t),
    }
}

fn icontains(tag: &Tag, operand: &TagOperand) -> bool {
    text_pair(tag, operand, true).map_or(false, |(c, t)| c.contains(t))
}

fn istartswith(tag: &Tag, operand: &TagOperand) -> bool {
    text_pair(tag, operand, true).map_or(false, |(c, t)| c.starts_with(t))
}

fn iendswith(tag: &Tag, operand: &TagOperand) -> bool {
    text_pair(tag, operand, true).map_or(false, |(c, t)| c.ends_with(t))
}

fn regexp(tag: &Tag, operand: &TagOperand) -> bool {
    match operand {
        TagOperand::Pattern(re) => re.is_match(&tag.content()),
        _ => false,
    }
}

fn boolean(tag: &Tag, operand: &TagOperand) -> bool {
    match operand {
        TagOperand::Bool(b) => tag.as_bool() == Some(*b),
        _ => false,
    }
}

fn number(tag: &Tag) -> Option<f64> {
    tag.as_float().or_else(|| tag.as_int().map(|i| i as f64))
}

fn equal(tag: &Tag, operand: &TagOperand) -> bool {
    match (number(tag), operand) {
        (Some(n), TagOperand::Number(v)) => n == *v,
        _ => false,
    }
}

fn greater(tag: &Tag, operand: &TagOperand) -> bool {
    match (number(tag), operand) {
        (Some(n), TagOperand::Number(v)) => n > *v,
        _ => false,
    }
}

fn lower(tag: &Tag, operand: &TagOperand) -> bool {
    match (number(tag), operand) {
        (Some(n), TagOperand::Number(v)) => n < *v,
        _ => false,
    }
}
