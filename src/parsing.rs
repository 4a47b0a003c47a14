//! Entry points for tagged-field extraction.
//!
//! Each call is a pure, synchronous pass over its own input. [`TagConfig`]
//! and [`ParseOptions`] are read-only, so one configuration can serve any
//! number of concurrent callers.

use crate::config::{ParseOptions, TagConfig};
use crate::error::Result;
use crate::output_parser::{extract, parse_tree, preprocess, validate};
use crate::types::ParseResult;

/// Extract configured tags from `raw_text`.
///
/// With `strict` set, any warning fails the call instead of being returned.
///
/// # Examples
///
/// ```
/// use llm_tagged_output::{parse, TagConfig};
///
/// let config = TagConfig::builder()
///     .single("thinking")
///     .list("step")
///     .build()
///     .unwrap();
///
/// let text = "<thinking>Plan it</thinking><step>A</step><step>B</step>";
/// let result = parse(text, &config, false).unwrap();
///
/// assert_eq!(result.single("thinking"), Some("Plan it"));
/// assert_eq!(result.list("step").unwrap(), ["A", "B"]);
/// assert!(result.warnings.is_empty());
/// ```
pub fn parse(raw_text: &str, config: &TagConfig, strict: bool) -> Result<ParseResult> {
    parse_with_options(raw_text, config, &ParseOptions::default().with_strict(strict))
}

/// [`parse`] with full control over [`ParseOptions`].
///
/// Format errors abort before any extraction; structure errors abort after
/// extraction with every violation collected.
pub fn parse_with_options(
    raw_text: &str,
    config: &TagConfig,
    options: &ParseOptions,
) -> Result<ParseResult> {
    let normalized = preprocess(raw_text, options.max_input_bytes)?;
    let doc = parse_tree(&normalized)?;
    let extraction = extract(&doc, config);
    let result = validate(extraction, options)?;
    tracing::debug!(
        fields = result.fields.len(),
        warnings = result.warnings.len(),
        "parsed tagged output"
    );
    Ok(result)
}
