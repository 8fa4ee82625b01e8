//! Declarative field validation.
//!
//! A record exposes its fields through [`FieldSource`]; a static table of
//! [`FieldRule`]s is evaluated against it with the `validator` checks and
//! every failing rule is collected into [`ValidationErrors`], not just the
//! first.

pub mod bootcamp;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use validator::{ValidateLength, ValidateRange, ValidateRegex};

pub use validator::{ValidationError, ValidationErrors};

/// A field value as seen by the rule table.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
    List(&'a [String]),
}

/// A single constraint on a field.
///
/// Every rule except [`Rule::Required`] is satisfied by a missing value.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    /// Maximum length in characters.
    MaxLength(u64),
    /// Non-empty text must contain a match for the pattern.
    Matches(&'static Lazy<Regex>),
    /// Text, or each list element, must be one of the given values.
    OneOf(&'static [&'static str]),
    Min(f64),
    Max(f64),
}

impl Rule {
    /// Rule name, used as the `validator` error code.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MaxLength(_) => "maxlength",
            Rule::Matches(_) => "match",
            Rule::OneOf(_) => "enum",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
        }
    }

    fn is_satisfied_by(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Rule::Required, FieldValue::Missing) => false,
            (Rule::Required, FieldValue::Text(text)) => !text.trim().is_empty(),
            (Rule::Required, FieldValue::List(items)) => !items.is_empty(),
            (Rule::Required, FieldValue::Number(_)) => true,
            (_, FieldValue::Missing) => true,
            (Rule::MaxLength(max), FieldValue::Text(text)) => {
                text.validate_length(None, Some(*max), None)
            }
            (Rule::Matches(_), FieldValue::Text("")) => true,
            (Rule::Matches(pattern), FieldValue::Text(text)) => {
                let pattern: &Regex = pattern;
                text.validate_regex(pattern)
            }
            (Rule::OneOf(allowed), FieldValue::Text(text)) => allowed.contains(&text),
            (Rule::OneOf(allowed), FieldValue::List(items)) => {
                items.iter().all(|item| allowed.contains(&item.as_str()))
            }
            (Rule::Min(min), FieldValue::Number(n)) => n.validate_range(Some(*min), None, None, None),
            (Rule::Max(max), FieldValue::Number(n)) => n.validate_range(None, Some(*max), None, None),
            // A rule applied to a value of the wrong shape is a table bug, not bad input.
            _ => true,
        }
    }
}

/// One row of a validation table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

/// A record whose fields can be looked up by name.
pub trait FieldSource {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

/// A `validator` error with the given code and message.
pub fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Evaluate every rule in `rules` against `record`, adding failures to `errors`.
pub fn check_rules<R: FieldSource + ?Sized>(
    record: &R,
    rules: &[FieldRule],
    errors: &mut ValidationErrors,
) {
    for entry in rules {
        if !entry.rule.is_satisfied_by(record.field(entry.field)) {
            errors.add(entry.field, violation(entry.rule.name(), entry.message));
        }
    }
}

/// A violated constraint as reported to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: String,
    pub message: String,
}

/// Flatten `errors` into violations, sorted by field name; a field's own
/// violations keep the order they were added in.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldViolation {
                field: field.clone(),
                rule: err.code.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Client-facing summary: every violation message, joined.
pub fn summary(errors: &ValidationErrors) -> String {
    violations(errors)
        .into_iter()
        .map(|v| v.message)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

    struct Sample {
        code: Option<String>,
        score: Option<f64>,
        tags: Vec<String>,
    }

    impl FieldSource for Sample {
        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "code" => self.code.as_deref().map_or(FieldValue::Missing, FieldValue::Text),
                "score" => self.score.map_or(FieldValue::Missing, FieldValue::Number),
                "tags" => FieldValue::List(&self.tags),
                _ => FieldValue::Missing,
            }
        }
    }

    static RULES: &[FieldRule] = &[
        FieldRule { field: "code", rule: Rule::Required, message: "code required" },
        FieldRule { field: "code", rule: Rule::MaxLength(4), message: "code too long" },
        FieldRule { field: "code", rule: Rule::Matches(&DIGITS), message: "code not numeric" },
        FieldRule { field: "score", rule: Rule::Min(1.0), message: "score too low" },
        FieldRule { field: "score", rule: Rule::Max(10.0), message: "score too high" },
        FieldRule { field: "tags", rule: Rule::OneOf(&["a", "b"]), message: "bad tag" },
    ];

    fn check(sample: &Sample) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_rules(sample, RULES, &mut errors);
        errors
    }

    #[test]
    fn reports_every_violation() {
        let sample = Sample {
            code: Some("abcde".into()),
            score: Some(0.0),
            tags: vec!["a".into(), "z".into()],
        };

        let rules: Vec<String> = violations(&check(&sample)).into_iter().map(|v| v.rule).collect();
        assert_eq!(rules, ["maxlength", "match", "min", "enum"]);
    }

    #[test]
    fn missing_values_only_fail_required() {
        let sample = Sample {
            code: None,
            score: None,
            tags: vec![],
        };

        let errors = check(&sample);
        assert_eq!(
            violations(&errors),
            vec![FieldViolation {
                field: "code".into(),
                rule: "required".into(),
                message: "code required".into(),
            }]
        );
        assert!(ValidationErrors::has_error(&Err(errors), "code"));
    }

    #[test]
    fn blank_text_fails_required_and_empty_text_skips_patterns() {
        let blank = Sample {
            code: Some("   ".into()),
            score: Some(5.0),
            tags: vec!["b".into()],
        };
        assert_eq!(summary(&check(&blank)), "code required, code not numeric");

        let empty = Sample {
            code: Some(String::new()),
            score: None,
            tags: vec![],
        };
        assert_eq!(summary(&check(&empty)), "code required");
    }

    #[test]
    fn max_length_counts_characters() {
        let sample = Sample {
            code: Some("1234".into()),
            score: None,
            tags: vec![],
        };
        assert!(check(&sample).is_empty());
        assert!(Rule::MaxLength(4).is_satisfied_by(FieldValue::Text("éééé")));
        assert!(!Rule::MaxLength(3).is_satisfied_by(FieldValue::Text("éééé")));
    }
}
