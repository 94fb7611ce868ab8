//! Typed literal values carried by labels.

use std::fmt;
use std::str::FromStr;

use crate::{AnnDataError, AnnDataResult};

/// Declared type of a [`Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Str,
    Int,
    Float,
    Bool,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Str => "str",
            TagType::Int => "int",
            TagType::Float => "float",
            TagType::Bool => "bool",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagType {
    type Err = AnnDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" => Ok(TagType::Str),
            "int" => Ok(TagType::Int),
            "float" => Ok(TagType::Float),
            "bool" => Ok(TagType::Bool),
            other => Err(AnnDataError::ValueCast {
                value: other.to_string(),
                target: "tag type".to_string(),
            }),
        }
    }
}

/// A typed literal. `Empty` means "no value".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tag {
    #[default]
    Empty,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Tag {
    /// A string tag. Whitespace is trimmed and blank text gives an empty tag.
    pub fn new_str(text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        if text.is_empty() {
            Tag::Empty
        } else {
            Tag::Str(text.to_string())
        }
    }

    /// Cast text to a tag of the given type.
    ///
    /// Blank text gives an empty tag whatever the type. Booleans only
    /// accept `true`, `false`, `1` and `0`, case-insensitively.
    pub fn parse(text: &str, tag_type: TagType) -> AnnDataResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Tag::Empty);
        }
        let cast_error = || AnnDataError::ValueCast {
            value: trimmed.to_string(),
            target: tag_type.to_string(),
        };
        match tag_type {
            TagType::Str => Ok(Tag::Str(trimmed.to_string())),
            TagType::Int => trimmed.parse().map(Tag::Int).map_err(|_| cast_error()),
            TagType::Float => trimmed.parse().map(Tag::Float).map_err(|_| cast_error()),
            TagType::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "1" => Ok(Tag::Bool(true)),
                "false" | "0" => Ok(Tag::Bool(false)),
                _ => Err(cast_error()),
            },
        }
    }

    /// Declared type, `None` for the empty tag.
    pub fn tag_type(&self) -> Option<TagType> {
        match self {
            Tag::Empty => None,
            Tag::Str(_) => Some(TagType::Str),
            Tag::Int(_) => Some(TagType::Int),
            Tag::Float(_) => Some(TagType::Float),
            Tag::Bool(_) => Some(TagType::Bool),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tag::Empty)
    }

    /// Textual content, the empty string for the empty tag.
    pub fn content(&self) -> String {
        self.to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Tag::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of int and float tags.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Tag::Int(i) => Some(*i as f64),
            Tag::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Tag::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Empty => Ok(()),
            Tag::Str(s) => f.write_str(s),
            Tag::Int(i) => write!(f, "{}", i),
            Tag::Float(v) => write!(f, "{}", v),
            Tag::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Tag {
    fn from(text: &str) -> Self {
        Tag::new_str(text)
    }
}

impl From<String> for Tag {
    fn from(text: String) -> Self {
        Tag::new_str(text)
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Tag::Int(value)
    }
}

impl From<f64> for Tag {
    fn from(value: f64) -> Self {
        Tag::Float(value)
    }
}

impl From<bool> for Tag {
    fn from(value: bool) -> Self {
        Tag::Bool(value)
    }
}
