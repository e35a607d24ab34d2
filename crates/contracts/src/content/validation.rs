//! Constraint validation shared by client and server
//!
//! The same checks run per keystroke in the editor and again on the server
//! before an update is accepted, so the two sides cannot drift.

use regex::Regex;
use thiserror::Error;

use super::field::{FieldDescriptor, FieldType};
use super::value::FieldValue;

/// A field-level constraint violation.
///
/// The `Display` text is the built-in default message; display layers
/// prefer the descriptor's `error_message` when one is configured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("{label} is required")]
    Required { label: String },
    #[error("{label} is too short (minimum {min})")]
    TooShort { label: String, min: usize },
    #[error("{label} is too long (maximum {max})")]
    TooLong { label: String, max: usize },
    #[error("{label} must be at least {min}")]
    BelowMin { label: String, min: f64 },
    #[error("{label} must be at most {max}")]
    AboveMax { label: String, max: f64 },
    #[error("{label} does not match the expected format")]
    PatternMismatch { label: String },
    #[error("{label} must be one of the configured options")]
    InvalidOption { label: String },
    #[error("{label} must be a {expected} value")]
    WrongShape {
        label: String,
        expected: &'static str,
    },
}

/// Validate one value against its descriptor.
///
/// A missing or empty value fails only the `required` check; all other
/// constraints apply to present values.
pub fn validate_field(
    field: &FieldDescriptor,
    value: Option<&FieldValue>,
) -> Result<(), ConstraintError> {
    let label = field.display_label();

    let present = match value {
        Some(value) if !value.is_empty() => value,
        _ => {
            if field.required {
                return Err(ConstraintError::Required {
                    label: label.to_string(),
                });
            }
            return Ok(());
        }
    };

    match field.kind {
        FieldType::Text
        | FieldType::TextArea
        | FieldType::Markdown
        | FieldType::VideoUrl
        | FieldType::Unknown => {
            let text = expect_text(present, label)?;
            check_text_length(field, text, label)?;
            check_pattern(field, text, label)
        }
        FieldType::Json => match present {
            // The raw-structure editor emits serialized text; stored
            // documents arrive as structured values. Both pass, only the
            // text form has a length to check.
            FieldValue::Text(text) => check_text_length(field, text, label),
            _ => Ok(()),
        },
        FieldType::Number => {
            let n = present
                .as_number()
                .ok_or_else(|| ConstraintError::WrongShape {
                    label: label.to_string(),
                    expected: "numeric",
                })?;
            if let Some(min) = field.min {
                if n < min {
                    return Err(ConstraintError::BelowMin {
                        label: label.to_string(),
                        min,
                    });
                }
            }
            if let Some(max) = field.max {
                if n > max {
                    return Err(ConstraintError::AboveMax {
                        label: label.to_string(),
                        max,
                    });
                }
            }
            Ok(())
        }
        FieldType::Boolean => match present {
            FieldValue::Bool(_) => Ok(()),
            _ => Err(ConstraintError::WrongShape {
                label: label.to_string(),
                expected: "boolean",
            }),
        },
        FieldType::Tags => {
            let tags = present
                .as_tags()
                .ok_or_else(|| ConstraintError::WrongShape {
                    label: label.to_string(),
                    expected: "tag list",
                })?;
            if let Some(min) = field.min_length {
                if tags.len() < min {
                    return Err(ConstraintError::TooShort {
                        label: label.to_string(),
                        min,
                    });
                }
            }
            if let Some(max) = field.max_length {
                if tags.len() > max {
                    return Err(ConstraintError::TooLong {
                        label: label.to_string(),
                        max,
                    });
                }
            }
            Ok(())
        }
        FieldType::Select | FieldType::Radio => {
            let text = expect_text(present, label)?;
            if field.options.iter().any(|o| o.value == text) {
                Ok(())
            } else {
                Err(ConstraintError::InvalidOption {
                    label: label.to_string(),
                })
            }
        }
        FieldType::Image | FieldType::File => match present {
            FieldValue::Files(_) => Ok(()),
            // An empty selection deserializes as an empty tag list and was
            // already handled as missing above.
            _ => Err(ConstraintError::WrongShape {
                label: label.to_string(),
                expected: "file list",
            }),
        },
    }
}

fn expect_text<'v>(value: &'v FieldValue, label: &str) -> Result<&'v str, ConstraintError> {
    value.as_text().ok_or_else(|| ConstraintError::WrongShape {
        label: label.to_string(),
        expected: "text",
    })
}

fn check_text_length(
    field: &FieldDescriptor,
    text: &str,
    label: &str,
) -> Result<(), ConstraintError> {
    let len = text.chars().count();
    if let Some(min) = field.min_length {
        if len < min {
            return Err(ConstraintError::TooShort {
                label: label.to_string(),
                min,
            });
        }
    }
    if let Some(max) = field.max_length {
        if len > max {
            return Err(ConstraintError::TooLong {
                label: label.to_string(),
                max,
            });
        }
    }
    Ok(())
}

fn check_pattern(field: &FieldDescriptor, text: &str, label: &str) -> Result<(), ConstraintError> {
    let Some(pattern) = field.effective_pattern() else {
        return Ok(());
    };
    // Whole-value match, as the HTML pattern attribute applies it.
    let Ok(re) = Regex::new(&format!("^(?:{pattern})$")) else {
        // Uncompilable patterns are rejected at configuration load; user
        // input is never failed because of one.
        return Ok(());
    };
    if re.is_match(text) {
        Ok(())
    } else {
        Err(ConstraintError::PatternMismatch {
            label: label.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::field::FieldOption;

    fn text_field(min: Option<usize>, max: Option<usize>, required: bool) -> FieldDescriptor {
        let mut field = FieldDescriptor::new("title", FieldType::Text, "Title");
        field.required = required;
        field.min_length = min;
        field.max_length = max;
        field
    }

    #[test]
    fn missing_value_fails_only_when_required() {
        let optional = text_field(Some(3), None, false);
        assert_eq!(validate_field(&optional, None), Ok(()));

        let required = text_field(None, None, true);
        assert!(matches!(
            validate_field(&required, None),
            Err(ConstraintError::Required { .. })
        ));
        assert!(matches!(
            validate_field(&required, Some(&FieldValue::Text("   ".into()))),
            Err(ConstraintError::Required { .. })
        ));
    }

    #[test]
    fn length_boundary_sits_between_two_and_three() {
        let field = text_field(Some(3), None, true);
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Text("ab".into()))),
            Err(ConstraintError::TooShort { min: 3, .. })
        ));
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Text("abc".into()))),
            Ok(())
        );
    }

    #[test]
    fn max_length_rejects_overlong_text() {
        let field = text_field(None, Some(5), false);
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Text("12345".into()))),
            Ok(())
        );
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Text("123456".into()))),
            Err(ConstraintError::TooLong { max: 5, .. })
        ));
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let mut field = FieldDescriptor::new("rating", FieldType::Number, "Rating");
        field.min = Some(1.0);
        field.max = Some(5.0);
        assert_eq!(validate_field(&field, Some(&FieldValue::Number(1.0))), Ok(()));
        assert_eq!(validate_field(&field, Some(&FieldValue::Number(5.0))), Ok(()));
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Number(0.5))),
            Err(ConstraintError::BelowMin { .. })
        ));
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Number(5.5))),
            Err(ConstraintError::AboveMax { .. })
        ));
    }

    #[test]
    fn number_field_rejects_text_shape() {
        let field = FieldDescriptor::new("rating", FieldType::Number, "Rating");
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Text("high".into()))),
            Err(ConstraintError::WrongShape { .. })
        ));
    }

    #[test]
    fn video_url_pattern_matches_whole_value() {
        let field = FieldDescriptor::new("video", FieldType::VideoUrl, "Video");
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Text("https://example.com/v/1".into()))),
            Ok(())
        );
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Text("not a url".into()))),
            Err(ConstraintError::PatternMismatch { .. })
        ));
        // A match in the middle of the value is not enough.
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Text("see https://example.com".into()))),
            Err(ConstraintError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn select_requires_membership() {
        let mut field = FieldDescriptor::new("category", FieldType::Select, "Category");
        field.options = vec![
            FieldOption::new("news", "News"),
            FieldOption::new("opinion", "Opinion"),
        ];
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Text("news".into()))),
            Ok(())
        );
        assert!(matches!(
            validate_field(&field, Some(&FieldValue::Text("sports".into()))),
            Err(ConstraintError::InvalidOption { .. })
        ));
    }

    #[test]
    fn tag_count_uses_length_bounds() {
        let mut field = FieldDescriptor::new("tags", FieldType::Tags, "Tags");
        field.min_length = Some(2);
        field.max_length = Some(3);
        let one = FieldValue::Tags(vec!["a".into()]);
        let two = FieldValue::Tags(vec!["a".into(), "b".into()]);
        let four = FieldValue::Tags(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        assert!(matches!(
            validate_field(&field, Some(&one)),
            Err(ConstraintError::TooShort { .. })
        ));
        assert_eq!(validate_field(&field, Some(&two)), Ok(()));
        assert!(matches!(
            validate_field(&field, Some(&four)),
            Err(ConstraintError::TooLong { .. })
        ));
    }

    #[test]
    fn uncompilable_pattern_never_blames_the_user() {
        let mut field = FieldDescriptor::new("code", FieldType::Text, "Code");
        field.pattern = Some("[unclosed".into());
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Text("anything".into()))),
            Ok(())
        );
    }

    #[test]
    fn required_boolean_accepts_false() {
        let mut field = FieldDescriptor::new("published", FieldType::Boolean, "Published");
        field.required = true;
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Bool(false))),
            Ok(())
        );
    }
}
