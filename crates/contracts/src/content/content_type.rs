//! Content type configuration

use serde::{Deserialize, Serialize};

use super::field::FieldDescriptor;

/// Publishing behavior of a content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PublishingOptions {
    /// Name of the field used as the entry title.
    pub title: Option<String>,
    /// Whether entries may be saved as drafts.
    pub drafts: bool,
}

/// Commenting behavior of a content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CommentsOptions {
    pub enabled: bool,
    /// Roles allowed to read comments; "public" allows everyone.
    pub read: Vec<String>,
    pub write: Vec<String>,
}

/// Roles allowed to act on entries of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TypePermissions {
    pub read: Vec<String>,
    pub update: Vec<String>,
    pub admin: Vec<String>,
}

/// A configured content type: its slug, fields, and behavior toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContentType {
    pub slug: String,
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub publishing: PublishingOptions,
    pub comments: CommentsOptions,
    pub permissions: TypePermissions,
}

impl ContentType {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The field whose value titles an entry, if configured and declared.
    pub fn title_field(&self) -> Option<&FieldDescriptor> {
        let name = self.publishing.title.as_deref()?;
        self.field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::field::FieldType;

    #[test]
    fn title_field_resolves_against_declared_fields() {
        let mut ty = ContentType {
            slug: "post".into(),
            name: "Post".into(),
            fields: vec![FieldDescriptor::new("title", FieldType::Text, "Title")],
            ..Default::default()
        };
        assert!(ty.title_field().is_none());

        ty.publishing.title = Some("title".into());
        assert_eq!(ty.title_field().map(|f| f.name.as_str()), Some("title"));

        ty.publishing.title = Some("missing".into());
        assert!(ty.title_field().is_none());
    }
}
