use thiserror::Error;

use crate::diagnostics::Violation;

/// Errors produced by [`parse`](crate::parse) and the configuration builders.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The markup itself is malformed. The text producer is at fault.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The markup is well formed but does not meet the configured cardinality.
    #[error("structure error: {0}")]
    Structure(#[from] StructureError),

    /// Invalid tag configuration detected at build time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be deserialized.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration YAML could not be deserialized.
    #[cfg(feature = "yaml")]
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ExtractError {
    /// Whether the failure is a scan-level markup fault.
    pub fn is_format(&self) -> bool {
        matches!(self, ExtractError::Format(_))
    }

    /// Whether the failure is a cardinality/validation fault.
    pub fn is_structure(&self) -> bool {
        matches!(self, ExtractError::Structure(_))
    }

    /// The violations behind a structure error, empty for any other kind.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ExtractError::Structure(err) => &err.violations,
            _ => &[],
        }
    }
}

/// Malformed markup found during preprocessing or the structural scan.
///
/// Never depends on strict mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Tags still open when the input ended, outermost first.
    #[error("unclosed tags remain: {}", display_tags(.tags))]
    UnclosedTags { tags: Vec<String> },

    /// A closing tag did not match the innermost open tag.
    #[error("mismatched tags: opened <{opened}>, but closed </{closed}>")]
    MismatchedTags {
        opened: String,
        closed: String,
        /// Byte offset of the offending closing tag.
        offset: usize,
    },

    /// A closing tag appeared while no tag was open.
    #[error("closing tag </{closed}> has no matching opening tag")]
    UnexpectedClose { closed: String, offset: usize },

    /// `<!--` without a matching `-->`.
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    /// Input exceeds the configured size limit.
    #[error("input is {len} bytes, limit is {max}")]
    InputTooLarge { len: usize, max: usize },
}

fn display_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("<{}>", t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One or more cardinality violations, aggregated across all configured tags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", display_violations(.violations))]
pub struct StructureError {
    /// Violations in configuration declaration order.
    pub violations: Vec<Violation>,
}

fn display_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ExtractError>;
