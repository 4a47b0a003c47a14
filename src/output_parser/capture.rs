//! Configuration-driven capture of tag text from a scanned [`Document`].
//!
//! Walks the tree once per configured tag, collecting raw captures, the
//! untagged remainder of the top level, and warnings for nested tags the
//! configuration does not know about. Cardinality is not checked here; see
//! [`validate`](crate::output_parser::validate::validate).

use crate::config::{Cardinality, TagConfig, TagSpec};
use crate::diagnostics::Warning;
use crate::output_parser::xml::{Content, Document, Node};

/// One matched occurrence of a configured tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture<'a> {
    /// Raw inner text, nested markup included.
    pub text: &'a str,
    pub depth: usize,
    /// Byte offset of the opening tag in the normalized text.
    pub offset: usize,
}

/// All captures for one configured tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCaptures<'a> {
    /// The configured name, as declared.
    pub name: String,
    pub cardinality: Cardinality,
    /// Matches in document order.
    pub captures: Vec<Capture<'a>>,
}

/// Everything the extractor found, ready for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// One entry per configured tag, parents before their children,
    /// otherwise in declaration order.
    pub fields: Vec<FieldCaptures<'a>>,
    /// Top-level text outside configured tags, trimmed at both ends.
    pub untagged: String,
    pub warnings: Vec<Warning>,
}

/// Match `config` against `doc`.
///
/// Top-level tags match anywhere in the tree; declared children match only
/// among descendants of their parent's matches.
///
/// # Examples
///
/// ```
/// use llm_tagged_output::output_parser::{extract, parse_tree};
/// use llm_tagged_output::TagConfig;
///
/// let config = TagConfig::builder().single("answer").build().unwrap();
/// let doc = parse_tree("The answer: <answer>42</answer>").unwrap();
/// let extraction = extract(&doc, &config);
///
/// assert_eq!(extraction.fields[0].captures[0].text, "42");
/// assert_eq!(extraction.untagged, "The answer:");
/// ```
pub fn extract<'a>(doc: &Document<'a>, config: &TagConfig) -> Extraction<'a> {
    let mut extraction = Extraction::default();
    capture_level(&[&doc.root], config, config, &mut extraction);

    let mut untagged = String::new();
    collect_untagged(&doc.root, config, &mut untagged);
    extraction.untagged = untagged.trim().to_string();

    tracing::debug!(
        fields = extraction.fields.len(),
        warnings = extraction.warnings.len(),
        "extracted configured tags"
    );
    extraction
}

fn capture_level<'d, 'a>(
    scopes: &[&'d Node<'a>],
    level: &TagConfig,
    full: &TagConfig,
    out: &mut Extraction<'a>,
) {
    for (name, spec) in level.iter() {
        let mut matches = Vec::new();
        let mut outer_end = 0;
        for scope in scopes {
            // A scope nested inside an earlier one was already searched.
            if scope.start_offset < outer_end {
                continue;
            }
            outer_end = scope.end_offset;
            scope.descendants_named(name, &mut matches);
        }

        for node in &matches {
            check_nested(node, name, spec, full, &mut out.warnings);
        }

        out.fields.push(FieldCaptures {
            name: name.to_string(),
            cardinality: spec.cardinality,
            captures: matches
                .iter()
                .map(|node| Capture {
                    text: node.raw_inner_text,
                    depth: node.depth,
                    offset: node.start_offset,
                })
                .collect(),
        });

        if spec.has_children() {
            capture_level(&matches, spec.children(), full, out);
        }
    }
}

/// Warn about direct child tags the configuration does not allow here.
///
/// A tag with declared children allows only those; a leaf tag allows any tag
/// configured somewhere in the tree.
fn check_nested(
    node: &Node<'_>,
    name: &str,
    spec: &TagSpec,
    full: &TagConfig,
    warnings: &mut Vec<Warning>,
) {
    for child in node.children() {
        let allowed = if spec.has_children() {
            spec.children().contains(&child.name)
        } else {
            full.is_configured(&child.name)
        };
        if !allowed {
            let warning = Warning::unconfigured_nested(&child.name, name);
            tracing::debug!(
                tag = %child.name,
                parent = %name,
                offset = child.start_offset,
                "{}",
                warning.message
            );
            warnings.push(warning);
        }
    }
}

/// Append top-level text that is not inside a configured tag.
///
/// Unconfigured elements are kept with their markup as written; configured
/// tags inside them are still skipped.
fn collect_untagged(node: &Node<'_>, config: &TagConfig, out: &mut String) {
    for item in &node.content {
        match item {
            Content::Text(text) => out.push_str(text),
            Content::Element(child) if config.contains(&child.name) => {}
            Content::Element(child) => {
                out.push_str(child.open_markup());
                collect_untagged(child, config, out);
                out.push_str(child.close_markup());
            }
        }
    }
}
