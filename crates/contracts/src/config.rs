//! Application configuration
//!
//! The whole dynamic surface of the site is data: which content types
//! exist, which fields they carry, which profile fields users get. A
//! built-in demo configuration ships here; the backend overlays its own
//! file and serves the result to the client at startup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::content_type::ContentType;
use crate::content::field::{FieldDescriptor, FieldOption, FieldType};

/// Site-wide configuration shared by server and client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub user: UserOptions,
    pub content: ContentOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserOptions {
    pub profile: ProfileOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProfileOptions {
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContentOptions {
    pub types: Vec<ContentType>,
}

/// Violation of a registry invariant, reported at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("duplicate content type slug \"{0}\"")]
    DuplicateSlug(String),
    #[error("duplicate field name \"{name}\" in {scope}")]
    DuplicateField { scope: String, name: String },
    #[error("{kind} field \"{name}\" in {scope} declares no options")]
    MissingOptions {
        scope: String,
        name: String,
        kind: &'static str,
    },
    #[error("field \"{name}\" in {scope} has an uncompilable pattern: {detail}")]
    InvalidPattern {
        scope: String,
        name: String,
        detail: String,
    },
    #[error("content type \"{slug}\" titles entries with undeclared field \"{title}\"")]
    UnknownTitleField { slug: String, title: String },
    #[error("field name \"{name}\" is reserved in content type \"{slug}\"")]
    ReservedField { slug: String, name: String },
}

impl AppConfig {
    pub fn content_type(&self, slug: &str) -> Option<&ContentType> {
        self.content.types.iter().find(|t| t.slug == slug)
    }

    /// Check the registry invariants the renderers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut slugs: Vec<&str> = Vec::new();
        for ty in &self.content.types {
            if slugs.contains(&ty.slug.as_str()) {
                return Err(ConfigError::DuplicateSlug(ty.slug.clone()));
            }
            slugs.push(&ty.slug);

            let scope = format!("content type \"{}\"", ty.slug);
            validate_fields(&scope, &ty.fields)?;

            // Entries serialize their fixed columns flattened next to the
            // dynamic values; a field under one of these names could never
            // round-trip. "draft" additionally doubles as the publishing
            // flag inside update payloads.
            for reserved in [
                "id",
                "type",
                "slug",
                "author",
                "draft",
                "comments",
                "createdAt",
                "updatedAt",
            ] {
                if ty.field(reserved).is_some() {
                    return Err(ConfigError::ReservedField {
                        slug: ty.slug.clone(),
                        name: reserved.to_string(),
                    });
                }
            }

            if let Some(title) = ty.publishing.title.as_deref() {
                if ty.field(title).is_none() {
                    return Err(ConfigError::UnknownTitleField {
                        slug: ty.slug.clone(),
                        title: title.to_string(),
                    });
                }
            }
        }
        validate_fields("the user profile", &self.user.profile.fields)
    }
}

fn validate_fields(scope: &str, fields: &[FieldDescriptor]) -> Result<(), ConfigError> {
    let mut names: Vec<&str> = Vec::new();
    for field in fields {
        if names.contains(&field.name.as_str()) {
            return Err(ConfigError::DuplicateField {
                scope: scope.to_string(),
                name: field.name.clone(),
            });
        }
        names.push(&field.name);

        if matches!(field.kind, FieldType::Select | FieldType::Radio) && field.options.is_empty() {
            return Err(ConfigError::MissingOptions {
                scope: scope.to_string(),
                name: field.name.clone(),
                kind: field.kind.as_str(),
            });
        }

        if let Some(pattern) = field.effective_pattern() {
            if let Err(err) = Regex::new(&format!("^(?:{pattern})$")) {
                return Err(ConfigError::InvalidPattern {
                    scope: scope.to_string(),
                    name: field.name.clone(),
                    detail: err.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Demo configuration: one content type exercising every field type, plus a
/// small set of profile fields.
impl Default for AppConfig {
    fn default() -> Self {
        let mut title = FieldDescriptor::new("title", FieldType::Text, "Title");
        title.required = true;
        title.min_length = Some(8);
        title.max_length = Some(150);
        title.placeholder = Some("Example: A new post".into());
        title.error_message = Some("Title must be between 8 and 150 characters".into());

        let mut description = FieldDescriptor::new("description", FieldType::TextArea, "Description");
        description.required = true;
        description.max_length = Some(300);

        let body = FieldDescriptor::new("body", FieldType::Markdown, "Body");

        let mut images = FieldDescriptor::new("images", FieldType::Image, "Images");
        images.multiple = true;

        let attachment = FieldDescriptor::new("attachment", FieldType::File, "Attachment");

        let featured = FieldDescriptor::new("featured", FieldType::Boolean, "Featured");

        let tags = FieldDescriptor::new("tags", FieldType::Tags, "Tags");

        let mut category = FieldDescriptor::new("category", FieldType::Select, "Category");
        category.required = true;
        category.options = vec![
            FieldOption::new("news", "News"),
            FieldOption::new("opinion", "Opinion"),
            FieldOption::new("guide", "Guide"),
        ];

        let mut license = FieldDescriptor::new("license", FieldType::Radio, "License");
        license.options = vec![
            FieldOption::new("cc-by", "CC BY"),
            FieldOption::new("cc0", "CC0"),
            FieldOption::new("none", "All rights reserved"),
        ];

        let mut rating = FieldDescriptor::new("rating", FieldType::Number, "Rating");
        rating.min = Some(0.0);
        rating.max = Some(5.0);

        let video = FieldDescriptor::new("video", FieldType::VideoUrl, "Video");

        let metadata = FieldDescriptor::new("metadata", FieldType::Json, "Metadata");

        let post = ContentType {
            slug: "post".into(),
            name: "Post".into(),
            fields: vec![
                title, description, body, images, attachment, featured, tags, category, license,
                rating, video, metadata,
            ],
            publishing: crate::content::content_type::PublishingOptions {
                title: Some("title".into()),
                drafts: true,
            },
            comments: crate::content::content_type::CommentsOptions {
                enabled: true,
                read: vec!["public".into()],
                write: vec!["user".into(), "admin".into()],
            },
            permissions: crate::content::content_type::TypePermissions {
                read: vec!["public".into()],
                update: vec!["admin".into()],
                admin: vec!["admin".into()],
            },
        };

        let mut bio = FieldDescriptor::new("bio", FieldType::TextArea, "Bio");
        bio.max_length = Some(300);

        let mut website = FieldDescriptor::new("website", FieldType::Text, "Website");
        website.pattern = Some("https?://.+".into());
        website.error_message = Some("Website must be a valid URL".into());

        let interests = FieldDescriptor::new("interests", FieldType::Tags, "Interests");

        Self {
            title: "Demo site".into(),
            user: UserOptions {
                profile: ProfileOptions {
                    fields: vec![bio, website, interests],
                },
            },
            content: ContentOptions {
                types: vec![post],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_configuration_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.content_type("post").is_some());
        assert!(config.content_type("missing").is_none());
    }

    #[test]
    fn demo_type_exercises_every_recognized_field_type() {
        let config = AppConfig::default();
        let post = config.content_type("post").unwrap();
        let mut kinds: Vec<FieldType> = post.fields.iter().map(|f| f.kind).collect();
        kinds.extend(config.user.profile.fields.iter().map(|f| f.kind));
        for kind in [
            FieldType::Text,
            FieldType::Number,
            FieldType::TextArea,
            FieldType::Markdown,
            FieldType::Image,
            FieldType::File,
            FieldType::Boolean,
            FieldType::Tags,
            FieldType::Select,
            FieldType::Radio,
            FieldType::VideoUrl,
            FieldType::Json,
        ] {
            assert!(kinds.contains(&kind), "missing {kind:?}");
        }
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let mut config = AppConfig::default();
        let dup = config.content.types[0].fields[0].clone();
        config.content.types[0].fields.push(dup);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateField { .. })
        ));
    }

    #[test]
    fn choice_fields_must_declare_options() {
        let mut config = AppConfig::default();
        config
            .content
            .types
            .iter_mut()
            .find(|t| t.slug == "post")
            .unwrap()
            .fields
            .iter_mut()
            .find(|f| f.name == "category")
            .unwrap()
            .options
            .clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingOptions { .. })
        ));
    }

    #[test]
    fn uncompilable_patterns_fail_at_load() {
        let mut config = AppConfig::default();
        config.user.profile.fields[1].pattern = Some("[unclosed".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn draft_is_reserved_for_the_publishing_flag() {
        let mut config = AppConfig::default();
        config.content.types[0]
            .fields
            .push(FieldDescriptor::new("draft", FieldType::Boolean, "Draft"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ReservedField { .. })
        ));
    }

    #[test]
    fn title_must_name_a_declared_field() {
        let mut config = AppConfig::default();
        config.content.types[0].publishing.title = Some("headline".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownTitleField { .. })
        ));
    }
}
