//! Cardinality validation and result assembly.

use crate::config::{Cardinality, ParseOptions};
use crate::diagnostics::{Violation, Warning};
use crate::error::StructureError;
use crate::output_parser::capture::Extraction;
use crate::types::{FieldValue, ParseResult};

/// Apply cardinality rules to `extraction` and assemble the flat result.
///
/// Every violation across all configured tags is collected before failing,
/// so one error reports everything that is wrong. In strict mode each
/// warning is added as a [`ViolationKind::PromotedWarning`](crate::diagnostics::ViolationKind::PromotedWarning) and no partial
/// result is returned.
pub fn validate(
    extraction: Extraction<'_>,
    options: &ParseOptions,
) -> Result<ParseResult, StructureError> {
    let Extraction {
        fields,
        untagged,
        mut warnings,
    } = extraction;

    let mut violations = Vec::new();
    let mut values = Vec::with_capacity(fields.len());

    for field in fields {
        let name = field.name;
        let texts: Vec<String> = field
            .captures
            .iter()
            .map(|c| {
                if options.trim_values {
                    c.text.trim().to_string()
                } else {
                    c.text.to_string()
                }
            })
            .collect();

        match (field.cardinality, texts.len()) {
            (Cardinality::Single, 0) => {
                violations.push(Violation::missing_single(&name));
            }
            (Cardinality::Single, 1) => {
                let value = texts.into_iter().next().unwrap_or_default();
                values.push((name, FieldValue::Single(value)));
            }
            (Cardinality::Single, _) => {
                violations.push(Violation::duplicate_single(&name));
            }
            (Cardinality::List, 0) => {
                violations.push(Violation::empty_list(&name));
            }
            (Cardinality::List, n) => {
                if n == 1 {
                    let warning = Warning::singleton_list(&name);
                    tracing::debug!(tag = %name, "{}", warning.message);
                    warnings.push(warning);
                }
                values.push((name, FieldValue::List(texts)));
            }
        }
    }

    if options.strict {
        violations.extend(warnings.drain(..).map(Violation::from));
    }

    if !violations.is_empty() {
        tracing::debug!(
            violations = violations.len(),
            strict = options.strict,
            "validation failed"
        );
        return Err(StructureError { violations });
    }

    Ok(ParseResult {
        fields: values,
        untagged,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{ViolationKind, WarningKind};
    use crate::output_parser::capture::{Capture, FieldCaptures};

    fn field(
        name: &str,
        cardinality: Cardinality,
        texts: &[&'static str],
    ) -> FieldCaptures<'static> {
        FieldCaptures {
            name: name.to_string(),
            cardinality,
            captures: texts
                .iter()
                .enumerate()
                .map(|(i, text)| Capture {
                    text: *text,
                    depth: 1,
                    offset: i * 10,
                })
                .collect(),
        }
    }

    fn extraction(fields: Vec<FieldCaptures<'static>>) -> Extraction<'static> {
        Extraction {
            fields,
            untagged: String::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_single_exactly_one() {
        let ext = extraction(vec![field("answer", Cardinality::Single, &["42"])]);
        let result = validate(ext, &ParseOptions::default()).unwrap();
        assert_eq!(result.single("answer"), Some("42"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_single_missing() {
        let ext = extraction(vec![field("answer", Cardinality::Single, &[])]);
        let err = validate(ext, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].kind, ViolationKind::MissingSingle);
        assert_eq!(err.violations[0].message, "Tag <answer> not found (single required)");
    }

    #[test]
    fn test_single_duplicate() {
        let ext = extraction(vec![field("answer", Cardinality::Single, &["42", "43"])]);
        let err = validate(ext, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.violations[0].kind, ViolationKind::DuplicateSingle);
        assert_eq!(
            err.violations[0].message,
            "Multiple <answer> found, but 'single' is required"
        );
    }

    #[test]
    fn test_list_empty() {
        let ext = extraction(vec![field("step", Cardinality::List, &[])]);
        let err = validate(ext, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.violations[0].kind, ViolationKind::EmptyList);
    }

    #[test]
    fn test_list_singleton_warns() {
        let ext = extraction(vec![field("step", Cardinality::List, &["only"])]);
        let result = validate(ext, &ParseOptions::default()).unwrap();
        assert_eq!(result.list("step"), Some(&["only".to_string()][..]));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, WarningKind::SingletonList);
    }

    #[test]
    fn test_list_in_order() {
        let ext = extraction(vec![field("step", Cardinality::List, &["A", "B", "C"])]);
        let result = validate(ext, &ParseOptions::default()).unwrap();
        assert_eq!(result.list("step").unwrap(), ["A", "B", "C"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_violations_are_aggregated_in_order() {
        let ext = extraction(vec![
            field("thinking", Cardinality::Single, &[]),
            field("ok", Cardinality::Single, &["fine"]),
            field("step", Cardinality::List, &[]),
            field("answer", Cardinality::Single, &["1", "2"]),
        ]);
        let err = validate(ext, &ParseOptions::default()).unwrap_err();
        let kinds: Vec<ViolationKind> = err.violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            [
                ViolationKind::MissingSingle,
                ViolationKind::EmptyList,
                ViolationKind::DuplicateSingle,
            ]
        );
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let mut ext = extraction(vec![field("step", Cardinality::List, &["only"])]);
        ext.warnings.push(Warning::unconfigured_nested("b", "step"));
        let err = validate(ext, &ParseOptions::default().with_strict(true)).unwrap_err();
        let kinds: Vec<ViolationKind> = err.violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            [
                ViolationKind::PromotedWarning(WarningKind::UnconfiguredNestedTag),
                ViolationKind::PromotedWarning(WarningKind::SingletonList),
            ]
        );
    }

    #[test]
    fn test_strict_without_warnings_succeeds() {
        let ext = extraction(vec![field("step", Cardinality::List, &["a", "b"])]);
        assert!(validate(ext, &ParseOptions::default().with_strict(true)).is_ok());
    }

    #[test]
    fn test_trim_values_option() {
        let ext = extraction(vec![field("answer", Cardinality::Single, &["\n  42 \n"])]);
        let options = ParseOptions::default().with_trim_values(true);
        let trimmed = validate(ext.clone(), &options).unwrap();
        assert_eq!(trimmed.single("answer"), Some("42"));
        let raw = validate(ext, &ParseOptions::default()).unwrap();
        assert_eq!(raw.single("answer"), Some("\n  42 \n"));
    }
}
