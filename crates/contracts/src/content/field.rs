//! Field type registry
//!
//! The closed set of field type tags a configuration may declare, plus the
//! resolution from a tag to the widget that edits it and the widget that
//! displays it.

use serde::{Deserialize, Serialize};

/// Pattern applied to video URL fields regardless of configuration.
pub const VIDEO_URL_PATTERN: &str = "https?://.+";

/// MIME filter used by upload fields that configure none.
pub const DEFAULT_UPLOAD_ACCEPT: &str = "image/png, image/jpeg";

// ============================================================================
// Field Type
// ============================================================================

/// Type tag of a dynamic field, as spelled in configuration.
///
/// Tags this build does not recognize deserialize to [`FieldType::Unknown`]
/// instead of failing, so a configuration written for a newer build still
/// loads; the unknown field renders as a plain text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    #[serde(rename = "textarea")]
    TextArea,
    Markdown,
    Image,
    File,
    Boolean,
    Tags,
    Select,
    Radio,
    VideoUrl,
    Json,
    #[serde(other)]
    Unknown,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::TextArea => "textarea",
            Self::Markdown => "markdown",
            Self::Image => "image",
            Self::File => "file",
            Self::Boolean => "boolean",
            Self::Tags => "tags",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::VideoUrl => "video-url",
            Self::Json => "json",
            Self::Unknown => "unknown",
        }
    }

    /// Widget that edits a field of this type.
    pub fn editor(&self) -> EditorWidget {
        match self {
            Self::Text => EditorWidget::TextLine,
            Self::Number => EditorWidget::NumberInput,
            Self::TextArea => EditorWidget::MultiLine,
            Self::Markdown => EditorWidget::MultiLine,
            Self::Image => EditorWidget::Upload,
            Self::File => EditorWidget::Upload,
            Self::Boolean => EditorWidget::Toggle,
            Self::Tags => EditorWidget::TagsEditor,
            Self::Select => EditorWidget::SelectMenu,
            Self::Radio => EditorWidget::RadioGroup,
            Self::VideoUrl => EditorWidget::TextLine,
            Self::Json => EditorWidget::RawStructure,
            // Deliberate fallback, not an error: an unrecognized tag still
            // gets an editable field.
            Self::Unknown => EditorWidget::TextLine,
        }
    }

    /// Widget that displays a field of this type read-only.
    pub fn display(&self) -> DisplayWidget {
        match self {
            Self::Text => DisplayWidget::Text,
            Self::Number => DisplayWidget::Text,
            Self::TextArea => DisplayWidget::Text,
            Self::Markdown => DisplayWidget::Text,
            Self::Image => DisplayWidget::Images,
            Self::File => DisplayWidget::FileLinks,
            Self::Boolean => DisplayWidget::Flag,
            Self::Tags => DisplayWidget::Chips,
            Self::Select => DisplayWidget::Text,
            Self::Radio => DisplayWidget::Text,
            Self::VideoUrl => DisplayWidget::Link,
            Self::Json => DisplayWidget::Code,
            Self::Unknown => DisplayWidget::Text,
        }
    }
}

/// Editing widget a field type resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorWidget {
    /// Single-line text input, optionally pattern-constrained.
    TextLine,
    NumberInput,
    /// Multi-line plain text (also used for markdown source).
    MultiLine,
    /// File picker; image and generic uploads share it.
    Upload,
    Toggle,
    TagsEditor,
    SelectMenu,
    RadioGroup,
    /// Serialized-structure textarea; edited text passes through verbatim.
    RawStructure,
}

/// Read-only widget a field type resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayWidget {
    Text,
    Chips,
    Images,
    FileLinks,
    Flag,
    Link,
    Code,
}

// ============================================================================
// Field Descriptor
// ============================================================================

/// One option of a select or radio field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Configured shape of one dynamic field. Immutable at render time.
///
/// Constraint spellings follow the HTML attributes they feed
/// (`minlength`, `maxlength`, `pattern`, `accept`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "minlength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(rename = "maxlength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    pub multiple: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            label: label.into(),
            ..Default::default()
        }
    }

    /// Label shown to the user; falls back to the field name.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    /// Pattern the value must match, if any.
    ///
    /// Video URL fields always use the built-in URL pattern; plain and
    /// unknown text fields use the configured one; other types never
    /// pattern-match.
    pub fn effective_pattern(&self) -> Option<&str> {
        match self.kind {
            FieldType::VideoUrl => Some(VIDEO_URL_PATTERN),
            FieldType::Text | FieldType::Unknown => self.pattern.as_deref(),
            _ => None,
        }
    }

    /// MIME filter for upload fields.
    pub fn effective_accept(&self) -> &str {
        self.accept.as_deref().unwrap_or(DEFAULT_UPLOAD_ACCEPT)
    }
}
