//! Attribute entries and the `key=value` input syntax.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MetadataError;

/// Separator between key and value in an attribute pair.
pub const SEPARATOR: char = '=';

/// One `{trait_type, value}` entry of a metadata document.
///
/// Template attributes may carry extra keys (`display_type`, ...); they are
/// kept verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }
}

/// A user-supplied attribute pair, parsed from `key=value`.
///
/// The input is split on the first `=` only; the value keeps any further
/// `=` characters. Both sides must be non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSpec {
    pub key: String,
    pub value: String,
}

impl AttributeSpec {
    /// Parse every pair, failing on the first invalid one.
    pub fn parse_all<S: AsRef<str>>(pairs: &[S]) -> Result<Vec<Self>, MetadataError> {
        pairs.iter().map(|p| p.as_ref().parse()).collect()
    }

    pub fn into_attribute(self) -> Attribute {
        Attribute::new(self.key, self.value)
    }
}

impl FromStr for AttributeSpec {
    type Err = MetadataError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| MetadataError::InvalidAttribute {
            input: input.to_string(),
            reason,
        };
        let (key, value) = input
            .split_once(SEPARATOR)
            .ok_or_else(|| invalid("missing '=' separator"))?;
        if key.is_empty() {
            return Err(invalid("empty key"));
        }
        if value.is_empty() {
            return Err(invalid("empty value"));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
