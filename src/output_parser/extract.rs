//! Input normalization applied before the structural scan.
//!
//! Strips `<!-- ... -->` regions and enforces the input size limit. The
//! synthetic root that wraps the whole text is opened by the scanner itself
//! (see [`parse_tree`](crate::output_parser::xml::parse_tree)), so nothing in
//! the input can close it.

use crate::error::FormatError;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Full preprocessing pipeline applied to every LLM response.
///
/// Rejects oversized input, then removes comments. No markup validation
/// happens here.
///
/// # Examples
///
/// ```
/// use llm_tagged_output::output_parser::preprocess;
///
/// let cleaned = preprocess("<a>x<!-- note --></a>", 1024).unwrap();
/// assert_eq!(cleaned, "<a>x</a>");
/// ```
pub fn preprocess(text: &str, max_input_bytes: usize) -> Result<String, FormatError> {
    if text.len() > max_input_bytes {
        return Err(FormatError::InputTooLarge {
            len: text.len(),
            max: max_input_bytes,
        });
    }
    strip_comments(text)
}

/// Remove every `<!-- ... -->` region verbatim.
///
/// An opening `<!--` without a matching `-->` is an error rather than being
/// kept as text or silently dropped to the end of input.
///
/// # Examples
///
/// ```
/// use llm_tagged_output::output_parser::strip_comments;
///
/// assert_eq!(strip_comments("a<!--x-->b<!--y-->c").unwrap(), "abc");
/// assert!(strip_comments("a<!-- never closed").is_err());
/// ```
pub fn strip_comments(text: &str) -> Result<String, FormatError> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    let mut consumed = 0;

    while let Some(start) = rest.find(COMMENT_OPEN) {
        let body = start + COMMENT_OPEN.len();
        let Some(end_offset) = rest[body..].find(COMMENT_CLOSE) else {
            return Err(FormatError::UnterminatedComment {
                offset: consumed + start,
            });
        };
        let end = body + end_offset + COMMENT_CLOSE.len();
        result.push_str(&rest[..start]);
        consumed += end;
        rest = &rest[end..];
    }
    result.push_str(rest);

    if consumed > 0 {
        tracing::debug!(removed_bytes = text.len() - result.len(), "stripped comments");
    }
    Ok(result)
}
