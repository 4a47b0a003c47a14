use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::diagnostics::Warning;

/// Reserved result field holding top-level text outside configured tags.
pub const UNTAGGED_FIELD: &str = "untagged";

/// Reserved result field holding the warning list.
pub const WARNINGS_FIELD: &str = "warnings";

/// Extracted value of one configured tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Value of a `single` tag.
    Single(String),
    /// Values of a `list` tag in document order.
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Single(_) => None,
        }
    }
}

/// Flat extraction result.
///
/// Holds exactly one entry per configured tag (nested children included, as
/// their own entries) plus the reserved `untagged` and `warnings` fields.
/// Serializes to a single flat map with those keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Configured tag name to value, parents before children.
    pub fields: Vec<(String, FieldValue)>,

    /// Top-level text outside configured tags, trimmed at both ends.
    pub untagged: String,

    /// Non-fatal irregularities, in the order they were found.
    pub warnings: Vec<Warning>,
}

impl ParseResult {
    /// Case-insensitive lookup of a configured field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Value of a `single` field.
    pub fn single(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_single)
    }

    /// Values of a `list` field.
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The flat map as a JSON value.
    pub fn to_json(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for ParseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(UNTAGGED_FIELD, &self.untagged)?;
        map.serialize_entry(WARNINGS_FIELD, &self.warnings)?;
        map.end()
    }
}
