//! # LLM Tagged Output
//!
//! Config-driven extraction of XML-style tagged fields from LLM responses.
//!
//! Models are often asked to wrap parts of their answer in tags such as
//! `<thinking>`, `<step>` or `<answer>`. This crate scans that output with a
//! small stack-based parser, matches the tags you declare, checks how often
//! each one occurs, and hands back a flat record plus structured warnings.
//!
//! ## Core Concepts
//!
//! - **[`TagConfig`]** — which tags are expected, each `single` or `list`,
//!   optionally with nested `children`.
//! - **[`parse`]** — the entry point: raw text + config → [`ParseResult`].
//! - **[`ParseResult`]** — one value per configured tag, the `untagged`
//!   remainder, and a list of [`Warning`]s.
//! - **[`ExtractError`]** — either a [`FormatError`] (malformed markup: the
//!   text producer is at fault) or a [`StructureError`] (well-formed markup
//!   that does not meet the configured cardinality).
//!
//! Matching is case-insensitive; extracted text is returned exactly as
//! written, nested markup included. In strict mode every warning becomes an
//! error.
//!
//! ## Quick Start
//!
//! ```
//! use llm_tagged_output::{parse, TagConfig, TagSpec};
//!
//! let config = TagConfig::builder()
//!     .single("thinking")
//!     .nested("plan", TagSpec::single().child("step", TagSpec::list()))
//!     .single("answer")
//!     .build()
//!     .unwrap();
//!
//! let response = "Sure.\n\
//!     <thinking>Add them up</thinking>\n\
//!     <plan><step>2+2</step><step>check</step></plan>\n\
//!     <answer>4</answer>";
//!
//! let result = parse(response, &config, false).unwrap();
//! assert_eq!(result.single("answer"), Some("4"));
//! assert_eq!(result.list("step").unwrap(), ["2+2", "check"]);
//! assert_eq!(result.untagged, "Sure.");
//! assert!(result.warnings.is_empty());
//! ```
//!
//! ## Configuration from JSON
//!
//! ```
//! use llm_tagged_output::TagConfig;
//!
//! let config = TagConfig::from_json(
//!     r#"{"thinking": "single", "plan": {"type": "list", "children": {"step": "list"}}}"#,
//! ).unwrap();
//! assert!(config.is_configured("step"));
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output_parser;
pub mod parsing;
pub mod types;

pub use config::{Cardinality, ParseOptions, TagConfig, TagConfigBuilder, TagSpec};
pub use diagnostics::{Violation, ViolationKind, Warning, WarningKind};
pub use error::{ExtractError, FormatError, Result, StructureError};
pub use parsing::{parse, parse_with_options};
pub use types::{FieldValue, ParseResult};
