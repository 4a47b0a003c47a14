//! Stack-based structural scan of XML-style tags in LLM output.
//!
//! Produces a [`Document`] tree from normalized text. This is NOT a full XML
//! parser: tags are bare `<name>` / `</name>` delimiters with names matching
//! `[A-Za-z_][A-Za-z0-9_]*`. Anything else that starts with `<` (attributes,
//! hyphenated or namespaced names, self-closing tags) is literal text.
//!
//! This is the only place where document order and nesting are checked; the
//! extractor trusts the tree it returns.

use crate::error::FormatError;

/// Name of the synthetic root node that wraps the whole input.
pub const ROOT_NAME: &str = "#root";

/// One item inside a node, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    /// A run of text between tag boundaries.
    Text(&'a str),
    /// A nested tag.
    Element(Node<'a>),
}

/// A parsed tag occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    /// Lowercase name used for all comparisons.
    pub name: String,
    /// Name as written in the input.
    pub display_name: &'a str,
    /// Root is 0, top-level tags are 1.
    pub depth: usize,
    /// Everything between the open and close tag, markup included, untouched.
    pub raw_inner_text: &'a str,
    /// The whole element including its own open and close tags.
    pub outer_text: &'a str,
    pub content: Vec<Content<'a>>,
    /// Byte offset of the opening `<`.
    pub start_offset: usize,
    /// Byte offset one past the closing `>`.
    pub end_offset: usize,
}

impl<'a> Node<'a> {
    /// Child elements in document order, skipping text runs.
    pub fn children(&self) -> impl Iterator<Item = &Node<'a>> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(node) => Some(node),
            Content::Text(_) => None,
        })
    }

    /// The opening tag exactly as written. Empty for the root.
    pub fn open_markup(&self) -> &'a str {
        self.outer_text.get(..self.open_len()).unwrap_or("")
    }

    /// The closing tag exactly as written. Empty for the root.
    pub fn close_markup(&self) -> &'a str {
        self.outer_text
            .get(self.open_len() + self.raw_inner_text.len()..)
            .unwrap_or("")
    }

    fn open_len(&self) -> usize {
        if self.depth == 0 {
            0
        } else {
            self.display_name.len() + 2
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Every descendant named `name`, in document order.
    ///
    /// Matches nested inside other matches are included.
    pub fn descendants_named<'n>(&'n self, name: &str, out: &mut Vec<&'n Node<'a>>) {
        for child in self.children() {
            if child.is_named(name) {
                out.push(child);
            }
            child.descendants_named(name, out);
        }
    }
}

/// The scanned tree. The root spans the whole normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub root: Node<'a>,
}

/// An open tag waiting for its close.
struct Frame<'a> {
    display_name: &'a str,
    depth: usize,
    start_offset: usize,
    inner_start: usize,
    content: Vec<Content<'a>>,
}

impl<'a> Frame<'a> {
    fn push_text(&mut self, text: &'a str) {
        if !text.is_empty() {
            self.content.push(Content::Text(text));
        }
    }

    fn into_node(self, text: &'a str, inner_end: usize, end_offset: usize) -> Node<'a> {
        Node {
            name: self.display_name.to_ascii_lowercase(),
            display_name: self.display_name,
            depth: self.depth,
            raw_inner_text: &text[self.inner_start..inner_end],
            outer_text: &text[self.start_offset..end_offset],
            content: self.content,
            start_offset: self.start_offset,
            end_offset,
        }
    }
}

/// A recognized tag boundary.
struct Tag<'a> {
    name: &'a str,
    closing: bool,
    /// Offset one past the `>`.
    end: usize,
}

/// Try to read a tag starting at the `<` at `pos`.
fn read_tag(text: &str, pos: usize) -> Option<Tag<'_>> {
    let bytes = text.as_bytes();
    let mut i = pos + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    match bytes.get(i) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => i += 1,
        _ => return None,
    }
    while let Some(b) = bytes.get(i) {
        if b.is_ascii_alphanumeric() || *b == b'_' {
            i += 1;
        } else {
            break;
        }
    }

    if bytes.get(i) != Some(&b'>') {
        return None;
    }
    Some(Tag {
        name: &text[name_start..i],
        closing,
        end: i + 1,
    })
}

/// Scan normalized text into a [`Document`].
///
/// Fails with [`FormatError::MismatchedTags`] when a close does not match the
/// innermost open tag, [`FormatError::UnexpectedClose`] when nothing is open,
/// and [`FormatError::UnclosedTags`] when tags remain open at end of input.
///
/// # Examples
///
/// ```
/// use llm_tagged_output::output_parser::parse_tree;
///
/// let doc = parse_tree("intro <answer>42</answer>").unwrap();
/// let answer = doc.root.children().next().unwrap();
/// assert_eq!(answer.name, "answer");
/// assert_eq!(answer.depth, 1);
/// assert_eq!(answer.raw_inner_text, "42");
///
/// assert!(parse_tree("<a><b></a></b>").is_err());
/// ```
pub fn parse_tree(text: &str) -> Result<Document<'_>, FormatError> {
    let mut stack = vec![Frame {
        display_name: ROOT_NAME,
        depth: 0,
        start_offset: 0,
        inner_start: 0,
        content: Vec::new(),
    }];
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('<') {
        let lt = cursor + offset;
        let Some(tag) = read_tag(text, lt) else {
            cursor = lt + 1;
            continue;
        };

        if let Some(top) = stack.last_mut() {
            top.push_text(&text[text_start..lt]);
        }

        if tag.closing {
            let frame = match stack.pop() {
                Some(frame) if !stack.is_empty() => frame,
                _ => {
                    return Err(FormatError::UnexpectedClose {
                        closed: tag.name.to_string(),
                        offset: lt,
                    })
                }
            };
            if !frame.display_name.eq_ignore_ascii_case(tag.name) {
                return Err(FormatError::MismatchedTags {
                    opened: frame.display_name.to_string(),
                    closed: tag.name.to_string(),
                    offset: lt,
                });
            }
            let node = frame.into_node(text, lt, tag.end);
            if let Some(parent) = stack.last_mut() {
                parent.content.push(Content::Element(node));
            }
        } else {
            stack.push(Frame {
                display_name: tag.name,
                depth: stack.len(),
                start_offset: lt,
                inner_start: tag.end,
                content: Vec::new(),
            });
        }

        cursor = tag.end;
        text_start = tag.end;
    }

    if stack.len() > 1 {
        let tags = stack[1..]
            .iter()
            .map(|f| f.display_name.to_string())
            .collect();
        return Err(FormatError::UnclosedTags { tags });
    }

    let mut root = stack.remove(0);
    root.push_text(&text[text_start..]);
    let root = root.into_node(text, text.len(), text.len());
    tracing::debug!(top_level = root.children().count(), "scanned tag tree");
    Ok(Document { root })
}
