//! Field value shapes
//!
//! Values travel in their natural JSON shapes (string, number, bool, string
//! array, object array) rather than behind a tag, so documents stay readable
//! and the original documents keep deserializing.

use serde::{Deserialize, Serialize};

use super::field::FieldType;

/// Reference to an uploaded file.
///
/// `path` is the server-side storage path; it is empty while the file has
/// only been selected client-side and not stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileRef {
    pub path: String,
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// A dynamic field's value.
///
/// Variants are tried in declaration order when deserializing; the `Json`
/// catch-all keeps shapes this build does not model (including null).
/// Values are replaced wholesale on change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Tags(Vec<String>),
    Files(Vec<FileRef>),
    Json(serde_json::Value),
}

impl FieldValue {
    /// Empty value for a descriptor that has no stored value yet.
    ///
    /// Rendering must never fail on a missing value, so every type has one.
    /// Number fields start as empty text, matching an untouched numeric
    /// input.
    pub fn default_for(kind: &FieldType) -> Self {
        match kind {
            FieldType::Boolean => Self::Bool(false),
            FieldType::Tags => Self::Tags(Vec::new()),
            FieldType::Image | FieldType::File => Self::Files(Vec::new()),
            FieldType::Text
            | FieldType::Number
            | FieldType::TextArea
            | FieldType::Markdown
            | FieldType::Select
            | FieldType::Radio
            | FieldType::VideoUrl
            | FieldType::Json
            | FieldType::Unknown => Self::Text(String::new()),
        }
    }

    /// True when the value carries nothing a required check would accept.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bool(_) => false,
            Self::Number(_) => false,
            Self::Text(text) => text.trim().is_empty(),
            Self::Tags(tags) => tags.is_empty(),
            Self::Files(files) => files.is_empty(),
            Self::Json(value) => value.is_null(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_tags(&self) -> Option<&[String]> {
        match self {
            Self::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&[FileRef]> {
        match self {
            Self::Files(files) => Some(files),
            _ => None,
        }
    }

    /// Value rendered as the text an editor would show.
    pub fn to_editor_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Tags(tags) => tags.join(", "),
            Self::Files(files) => files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Integral numbers print without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_shapes_deserialize_to_matching_variants() {
        let cases: Vec<(&str, FieldValue)> = vec![
            ("true", FieldValue::Bool(true)),
            ("3.5", FieldValue::Number(3.5)),
            ("\"hello\"", FieldValue::Text("hello".into())),
            (
                "[\"a\",\"b\"]",
                FieldValue::Tags(vec!["a".into(), "b".into()]),
            ),
        ];
        for (json, expected) in cases {
            let parsed: FieldValue = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected, "shape: {json}");
        }
    }

    #[test]
    fn object_arrays_deserialize_as_files() {
        let json = r#"[{"path": "files/a.png", "name": "a.png", "mime": "image/png", "size": 120}]"#;
        let parsed: FieldValue = serde_json::from_str(json).unwrap();
        let files = parsed.as_files().unwrap();
        assert_eq!(files[0].path, "files/a.png");
        assert_eq!(files[0].size, 120);
    }

    #[test]
    fn empty_array_reads_as_tags_and_counts_as_empty() {
        // [] matches the string-array variant first; both empty collections
        // behave identically everywhere (required checks, display).
        let parsed: FieldValue = serde_json::from_str("[]").unwrap();
        assert_eq!(parsed, FieldValue::Tags(vec![]));
        assert!(parsed.is_empty());
        assert!(FieldValue::Files(vec![]).is_empty());
    }

    #[test]
    fn unmodeled_shapes_fall_into_json() {
        let parsed: FieldValue = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert!(matches!(parsed, FieldValue::Json(_)));
        let null: FieldValue = serde_json::from_str("null").unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn default_value_exists_for_every_type() {
        assert_eq!(
            FieldValue::default_for(&FieldType::Boolean),
            FieldValue::Bool(false)
        );
        assert_eq!(
            FieldValue::default_for(&FieldType::Tags),
            FieldValue::Tags(vec![])
        );
        assert_eq!(
            FieldValue::default_for(&FieldType::Image),
            FieldValue::Files(vec![])
        );
        assert!(FieldValue::default_for(&FieldType::Number).is_empty());
        assert!(FieldValue::default_for(&FieldType::Unknown).is_empty());
    }

    #[test]
    fn editor_text_formats_integers_without_fraction() {
        assert_eq!(FieldValue::Number(4.0).to_editor_text(), "4");
        assert_eq!(FieldValue::Number(4.25).to_editor_text(), "4.25");
    }
}
