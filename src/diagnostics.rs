//! Structured warning and violation records.
//!
//! [`Warning`]s are non-fatal irregularities returned with every
//! [`ParseResult`](crate::types::ParseResult). [`Violation`]s are the
//! individual entries of a [`StructureError`](crate::error::StructureError);
//! in strict mode every warning is promoted to a violation.

use serde::Serialize;

/// Kinds of recoverable irregularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A matched tag contains a nested tag that is not configured there.
    UnconfiguredNestedTag,
    /// A `list` tag matched exactly one element.
    SingletonList,
}

/// A non-fatal irregularity found while extracting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    /// The tag the warning is about (the nested tag for
    /// [`WarningKind::UnconfiguredNestedTag`]).
    pub tag_name: Option<String>,
    /// The configured tag whose text contained the nested tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub message: String,
}

impl Warning {
    pub(crate) fn unconfigured_nested(tag: &str, parent: &str) -> Self {
        Self {
            kind: WarningKind::UnconfiguredNestedTag,
            tag_name: Some(tag.to_string()),
            parent: Some(parent.to_string()),
            message: format!("unconfigured tag <{}> found inside '{}'", tag, parent),
        }
    }

    pub(crate) fn singleton_list(tag: &str) -> Self {
        Self {
            kind: WarningKind::SingletonList,
            tag_name: Some(tag.to_string()),
            parent: None,
            message: format!("List <{}> contains only 1 element", tag),
        }
    }
}

/// Kinds of fatal cardinality failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingSingle,
    DuplicateSingle,
    EmptyList,
    /// A warning raised as an error by strict mode.
    PromotedWarning(WarningKind),
}

/// One cardinality failure inside a [`StructureError`](crate::error::StructureError).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub tag_name: Option<String>,
    pub message: String,
}

impl Violation {
    pub(crate) fn missing_single(tag: &str) -> Self {
        Self::hard(
            ViolationKind::MissingSingle,
            tag,
            format!("Tag <{}> not found (single required)", tag),
        )
    }

    pub(crate) fn duplicate_single(tag: &str) -> Self {
        Self::hard(
            ViolationKind::DuplicateSingle,
            tag,
            format!("Multiple <{}> found, but 'single' is required", tag),
        )
    }

    pub(crate) fn empty_list(tag: &str) -> Self {
        Self::hard(
            ViolationKind::EmptyList,
            tag,
            format!("List <{}> is empty (1+ elements required)", tag),
        )
    }

    fn hard(kind: ViolationKind, tag: &str, message: String) -> Self {
        Self {
            kind,
            tag_name: Some(tag.to_string()),
            message,
        }
    }
}

impl From<Warning> for Violation {
    fn from(warning: Warning) -> Self {
        Self {
            kind: ViolationKind::PromotedWarning(warning.kind),
            tag_name: warning.tag_name,
            message: warning.message,
        }
    }
}
