//! Tag configuration and parse options.
//!
//! A [`TagConfig`] declares which tags the caller expects and how often each
//! may occur. It is built once, validated, and then shared read-only across
//! any number of [`parse`](crate::parse) calls.
//!
//! # Example
//!
//! ```
//! use llm_tagged_output::{TagConfig, TagSpec};
//!
//! let config = TagConfig::builder()
//!     .single("thinking")
//!     .nested("plan", TagSpec::single().child("step", TagSpec::list()))
//!     .single("answer")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.get("PLAN").is_some());
//! assert!(config.is_configured("step"));
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{ExtractError, Result};
use crate::types::{UNTAGGED_FIELD, WARNINGS_FIELD};

/// Default upper bound on input size accepted by [`parse`](crate::parse).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 256 * 1024;

/// How many occurrences of a tag are expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Exactly one.
    Single,
    /// One or more, kept in document order.
    List,
}

/// Expectations for one configured tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub cardinality: Cardinality,
    // Private so children only reach a `TagConfig` through a validating path.
    children: TagConfig,
}

impl TagSpec {
    pub fn single() -> Self {
        Self {
            cardinality: Cardinality::Single,
            children: TagConfig::default(),
        }
    }

    pub fn list() -> Self {
        Self {
            cardinality: Cardinality::List,
            children: TagConfig::default(),
        }
    }

    /// Declare a child tag, scoped to descendants of this tag.
    pub fn child(mut self, name: impl Into<String>, spec: TagSpec) -> Self {
        self.children.entries.push((name.into(), spec));
        self
    }

    /// Tags looked up only among descendants of this tag's matches.
    pub fn children(&self) -> &TagConfig {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Ordered mapping from tag name to [`TagSpec`].
///
/// Always valid once constructed: every name matches
/// `[A-Za-z_][A-Za-z0-9_]*`, no name repeats anywhere in the tree
/// (case-insensitively), and the reserved result fields are not declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagConfig {
    entries: Vec<(String, TagSpec)>,
}

impl TagConfig {
    pub fn builder() -> TagConfigBuilder {
        TagConfigBuilder {
            entries: Vec::new(),
        }
    }

    /// Deserialize from JSON such as
    /// `{"thinking": "single", "plan": {"type": "list", "children": {"step": "list"}}}`.
    ///
    /// Malformed JSON is [`ExtractError::Json`]; a bad tag name, a reserved
    /// name or a repeated name is [`ExtractError::InvalidConfig`].
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawEntries = serde_json::from_str(json)?;
        raw.into_validated()
    }

    /// Deserialize from YAML with the same shape as [`TagConfig::from_json`].
    #[cfg(feature = "yaml")]
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawEntries = serde_yaml::from_str(yaml)?;
        raw.into_validated()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup among this level's entries.
    pub fn get(&self, name: &str) -> Option<&TagSpec> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether `name` is declared at any level of the tree.
    pub fn is_configured(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, spec)| {
            key.eq_ignore_ascii_case(name) || spec.children.is_configured(name)
        })
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        self.validate_into(&mut seen)
    }

    fn validate_into(&self, seen: &mut HashSet<String>) -> Result<()> {
        for (name, spec) in &self.entries {
            if !is_valid_tag_name(name) {
                return Err(ExtractError::InvalidConfig(format!(
                    "tag name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                    name
                )));
            }
            let lowered = name.to_ascii_lowercase();
            if lowered == UNTAGGED_FIELD || lowered == WARNINGS_FIELD {
                return Err(ExtractError::InvalidConfig(format!(
                    "tag name '{}' is reserved for the result",
                    name
                )));
            }
            if !seen.insert(lowered) {
                return Err(ExtractError::InvalidConfig(format!(
                    "tag '{}' is declared more than once",
                    name
                )));
            }
            spec.children.validate_into(seen)?;
        }
        Ok(())
    }
}

/// Check a name against `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Builder for [`TagConfig`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct TagConfigBuilder {
    entries: Vec<(String, TagSpec)>,
}

impl TagConfigBuilder {
    pub fn single(self, name: impl Into<String>) -> Self {
        self.tag(name, TagSpec::single())
    }

    pub fn list(self, name: impl Into<String>) -> Self {
        self.tag(name, TagSpec::list())
    }

    /// Declare a tag with an explicit spec, usually one carrying children.
    pub fn nested(self, name: impl Into<String>, spec: TagSpec) -> Self {
        self.tag(name, spec)
    }

    pub fn tag(mut self, name: impl Into<String>, spec: TagSpec) -> Self {
        self.entries.push((name.into(), spec));
        self
    }

    pub fn build(self) -> Result<TagConfig> {
        let config = TagConfig {
            entries: self.entries,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Either the short form `"single"` / `"list"` or
/// `{"type": "single" | "list", "children": {...}}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpec {
    Short(Cardinality),
    Full {
        #[serde(rename = "type")]
        cardinality: Cardinality,
        #[serde(default)]
        children: RawEntries,
    },
}

#[derive(Default)]
struct RawEntries(Vec<(String, RawSpec)>);

impl RawEntries {
    fn into_config(self) -> TagConfig {
        let entries = self
            .0
            .into_iter()
            .map(|(name, raw)| {
                let spec = match raw {
                    RawSpec::Short(cardinality) => TagSpec {
                        cardinality,
                        children: TagConfig::default(),
                    },
                    RawSpec::Full {
                        cardinality,
                        children,
                    } => TagSpec {
                        cardinality,
                        children: children.into_config(),
                    },
                };
                (name, spec)
            })
            .collect();
        TagConfig { entries }
    }

    fn into_validated(self) -> Result<TagConfig> {
        let config = self.into_config();
        config.validate()?;
        Ok(config)
    }
}

// Map visitor so entries keep their source order.
impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tag name to \"single\", \"list\" or {type, children}")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RawEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, spec)) = map.next_entry::<String, RawSpec>()? {
                    entries.push((name, spec));
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl<'de> Deserialize<'de> for TagConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawEntries::deserialize(deserializer)?
            .into_validated()
            .map_err(de::Error::custom)
    }
}

/// Per-call options for [`parse_with_options`](crate::parse_with_options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Promote every warning to a blocking error.
    pub strict: bool,

    /// Trim surrounding whitespace from each extracted value.
    pub trim_values: bool,

    /// Inputs longer than this many bytes are rejected before scanning.
    pub max_input_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: false,
            trim_values: false,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ParseOptions {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_trim_values(mut self, trim: bool) -> Self {
        self.trim_values = trim;
        self
    }

    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let config = TagConfig::builder()
            .single("thinking")
            .list("step")
            .single("answer")
            .build()
            .unwrap();
        let names: Vec<&str> = config.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["thinking", "step", "answer"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let config = TagConfig::builder().single("Thinking").build().unwrap();
        assert!(config.contains("thinking"));
        assert!(config.contains("THINKING"));
        assert!(!config.contains("answer"));
    }

    #[test]
    fn test_is_configured_searches_children() {
        let config = TagConfig::builder()
            .nested("plan", TagSpec::single().child("step", TagSpec::list()))
            .build()
            .unwrap();
        assert!(config.is_configured("step"));
        assert!(!config.contains("step"));
    }

    #[test]
    fn test_rejects_bad_names() {
        for bad in ["", "1abc", "my-tag", "ns:tag", "with space"] {
            let result = TagConfig::builder().single(bad).build();
            assert!(
                matches!(result, Err(ExtractError::InvalidConfig(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_accepts_underscore_and_digits() {
        assert!(is_valid_tag_name("_private"));
        assert!(is_valid_tag_name("step2"));
        assert!(!is_valid_tag_name("2step"));
    }

    #[test]
    fn test_rejects_reserved_names() {
        let result = TagConfig::builder().single("Untagged").build();
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
        let result = TagConfig::builder().list("warnings").build();
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_duplicates_across_levels() {
        let result = TagConfig::builder()
            .single("step")
            .nested("plan", TagSpec::single().child("STEP", TagSpec::list()))
            .build();
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_short_and_full_forms() {
        let config = TagConfig::from_json(
            r#"{
                "thinking": "single",
                "plan": {"type": "list", "children": {"step": "single", "note": {"type": "list"}}}
            }"#,
        )
        .unwrap();

        assert_eq!(config.get("thinking").unwrap().cardinality, Cardinality::Single);
        let plan = config.get("plan").unwrap();
        assert_eq!(plan.cardinality, Cardinality::List);
        let children: Vec<&str> = plan.children().iter().map(|(n, _)| n).collect();
        assert_eq!(children, ["step", "note"]);
    }

    #[test]
    fn test_json_keeps_source_order() {
        let config = TagConfig::from_json(r#"{"zeta": "single", "alpha": "list"}"#).unwrap();
        let names: Vec<&str> = config.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_json_rejects_unknown_cardinality() {
        assert!(TagConfig::from_json(r#"{"a": "many"}"#).is_err());
    }

    #[test]
    fn test_json_invalid_names_are_config_errors() {
        let result = TagConfig::from_json(r#"{"bad-name": "single"}"#);
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));

        let result = TagConfig::from_json(
            r#"{"plan": {"type": "single", "children": {"warnings": "list"}}}"#,
        );
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));

        let result = TagConfig::from_json(r#"{"a": "single""#);
        assert!(matches!(result, Err(ExtractError::Json(_))));
    }

    #[test]
    fn test_child_specs_are_validated_when_attached() {
        let cases = [
            ("reserved", TagSpec::single().child("untagged", TagSpec::single())),
            (
                "duplicate",
                TagSpec::single()
                    .child("x", TagSpec::single())
                    .child("X", TagSpec::list()),
            ),
            ("hyphenated", TagSpec::single().child("a-b", TagSpec::single())),
        ];
        for (label, spec) in cases {
            let result = TagConfig::builder().nested("parent", spec).build();
            assert!(
                matches!(result, Err(ExtractError::InvalidConfig(_))),
                "{} child accepted",
                label
            );
        }
    }

    #[test]
    fn test_children_accessor_reads_declared_children() {
        let spec = TagSpec::list().child("step", TagSpec::single());
        assert!(spec.has_children());
        assert!(spec.children().contains("STEP"));
        assert!(!TagSpec::single().has_children());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_config() {
        let config = TagConfig::from_yaml(
            "thinking: single\nplan:\n  type: list\n  children:\n    step: list\n",
        )
        .unwrap();
        assert!(config.is_configured("step"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_errors_by_kind() {
        let result = TagConfig::from_yaml("a-b: single\n");
        assert!(matches!(result, Err(ExtractError::InvalidConfig(_))));

        let result = TagConfig::from_yaml("thinking: [single\n");
        assert!(matches!(result, Err(ExtractError::Yaml(_))));
    }

    #[test]
    fn test_options_builder() {
        let opts = ParseOptions::default()
            .with_strict(true)
            .with_trim_values(true)
            .with_max_input_bytes(10);
        assert!(opts.strict);
        assert!(opts.trim_values);
        assert_eq!(opts.max_input_bytes, 10);
        assert_eq!(ParseOptions::default().max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }
}
