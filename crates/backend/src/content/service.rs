use std::collections::BTreeMap;

use chrono::Utc;
use contracts::config::AppConfig;
use contracts::content::entry::{ContentEntry, ContentPage, EntryPatch};
use contracts::content::field::{FieldDescriptor, FieldType};
use contracts::content::validation::{validate_field, ConstraintError};
use contracts::content::value::FieldValue;
use uuid::Uuid;

use super::repository;
use crate::shared::error::ServiceError;

/// Reserved patch key carrying the draft flag next to the field values.
/// A configured field of this name would collide with the entry column.
pub const DRAFT_KEY: &str = "draft";

const DEFAULT_LIMIT: i64 = 15;
const MAX_LIMIT: i64 = 100;

/// How many entries a testdata run seeds per type.
const DEMO_ENTRY_COUNT: usize = 12;

/// Listing window and order, straight off the query string.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub from: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

fn unknown_type(type_slug: &str) -> ServiceError {
    ServiceError::not_found(format!("Unknown content type \"{}\"", type_slug))
}

/// The configured message wins over the built-in constraint text.
fn constraint_message(field: &FieldDescriptor, err: &ConstraintError) -> String {
    field
        .error_message
        .clone()
        .unwrap_or_else(|| err.to_string())
}

/// One page of entries of a type
pub async fn list(
    config: &AppConfig,
    type_slug: &str,
    options: &ListOptions,
) -> Result<ContentPage, ServiceError> {
    if config.content_type(type_slug).is_none() {
        return Err(unknown_type(type_slug));
    }

    let limit = options.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let from = options.from.unwrap_or(0).max(0);
    let sort_by = options.sort_by.as_deref().unwrap_or("createdAt");
    let sort_desc = !matches!(
        options.sort_order.as_deref(),
        Some(order) if order.eq_ignore_ascii_case("asc")
    );

    let data = repository::list(type_slug, limit, from, sort_by, sort_desc).await?;

    Ok(ContentPage {
        data,
        page: from / limit,
        page_size: limit,
    })
}

/// Get one entry by its slug
pub async fn get(
    config: &AppConfig,
    type_slug: &str,
    slug: &str,
) -> Result<ContentEntry, ServiceError> {
    if config.content_type(type_slug).is_none() {
        return Err(unknown_type(type_slug));
    }

    repository::get_by_slug(type_slug, slug)
        .await?
        .ok_or_else(|| ServiceError::not_found("Content not found"))
}

/// Apply a field patch to an entry
///
/// Every changed field must name a declared descriptor and pass its
/// constraints; the reserved draft key updates the publication state when
/// the type allows drafts.
pub async fn update(
    config: &AppConfig,
    type_slug: &str,
    slug: &str,
    mut patch: EntryPatch,
) -> Result<ContentEntry, ServiceError> {
    let ty = config
        .content_type(type_slug)
        .ok_or_else(|| unknown_type(type_slug))?;

    let entry = repository::get_by_slug(type_slug, slug)
        .await?
        .ok_or_else(|| ServiceError::not_found("Content not found"))?;

    let mut draft = entry.draft;
    if let Some(value) = patch.remove(DRAFT_KEY) {
        if ty.publishing.drafts {
            draft = value.as_bool().unwrap_or(entry.draft);
        }
    }

    for (name, value) in &patch {
        let field = ty
            .field(name)
            .ok_or_else(|| ServiceError::invalid(format!("Unknown field \"{}\"", name)))?;
        validate_field(field, Some(value))
            .map_err(|err| ServiceError::invalid(constraint_message(field, &err)))?;
    }

    let mut fields = entry.fields.clone();
    for (name, value) in patch {
        fields.insert(name, value);
    }

    repository::update_fields(&entry.id, &fields, draft).await?;

    repository::get_by_slug(type_slug, slug)
        .await?
        .ok_or_else(|| ServiceError::not_found("Content not found"))
}

/// Insert demo entries for a type
///
/// Values are generated per descriptor so any configured type gets a
/// browsable collection; upload fields stay empty since no files exist on
/// disk to point at. Slugs carry a fresh suffix, so repeated runs add
/// another batch instead of failing.
pub async fn insert_test_data(
    config: &AppConfig,
    type_slug: &str,
    author: &str,
) -> Result<(), ServiceError> {
    let ty = config
        .content_type(type_slug)
        .ok_or_else(|| unknown_type(type_slug))?;

    let now = Utc::now();
    for i in 1..=DEMO_ENTRY_COUNT {
        let mut fields = BTreeMap::new();
        for field in &ty.fields {
            if let Some(value) = demo_value(field, i) {
                fields.insert(field.name.clone(), value);
            }
        }
        // Seeds obey the same constraints an update would.
        for field in &ty.fields {
            validate_field(field, fields.get(&field.name))
                .map_err(|err| ServiceError::invalid(constraint_message(field, &err)))?;
        }

        let id = Uuid::new_v4().to_string();
        let slug = format!("demo-{}-{}-{}", ty.slug, i, &id[..8]);
        // Stagger creation times so ordering and "time ago" labels vary.
        let created = now - chrono::Duration::minutes(i as i64 * 7);

        let entry = ContentEntry {
            id,
            content_type: ty.slug.clone(),
            slug,
            author: author.to_string(),
            draft: i % 5 == 0,
            comments: ty.comments.enabled.then(|| ((i * 3) % 7) as i64),
            created_at: created,
            updated_at: created,
            fields,
        };
        repository::insert(&entry).await?;
    }

    Ok(())
}

fn demo_text(field: &FieldDescriptor, i: usize) -> String {
    let mut text = format!(
        "Demo {} {} from the seeded collection",
        field.display_label().to_lowercase(),
        i
    );
    if let Some(min) = field.min_length {
        while text.chars().count() < min {
            text.push_str(" sample");
        }
    }
    if let Some(max) = field.max_length {
        text = text.chars().take(max).collect();
    }
    text
}

fn demo_value(field: &FieldDescriptor, i: usize) -> Option<FieldValue> {
    match field.kind {
        FieldType::Text => Some(FieldValue::Text(demo_text(field, i))),
        FieldType::TextArea => Some(FieldValue::Text(format!(
            "Seeded {} for demo entry {}.",
            field.display_label().to_lowercase(),
            i
        ))),
        FieldType::Markdown => Some(FieldValue::Text(format!(
            "## Entry {}\n\nSeeded body with **markdown**.\n\n- first point\n- second point\n",
            i
        ))),
        FieldType::Number => {
            let base = field.min.unwrap_or(0.0);
            let mut value = base + (i % 5) as f64;
            if let Some(max) = field.max {
                value = value.min(max);
            }
            Some(FieldValue::Number(value))
        }
        FieldType::Boolean => Some(FieldValue::Bool(i % 2 == 0)),
        FieldType::Tags => Some(FieldValue::Tags(vec![
            "demo".to_string(),
            format!("batch-{}", i % 3 + 1),
        ])),
        FieldType::Select | FieldType::Radio => field
            .options
            .get(i % field.options.len().max(1))
            .map(|option| FieldValue::Text(option.value.clone())),
        FieldType::VideoUrl if field.required => Some(FieldValue::Text(format!(
            "https://www.youtube.com/watch?v=demo{:04}",
            i
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db;

    /// The demo "post" fields under a slug private to one test, so the
    /// shared scratch database stays untangled.
    fn test_config(slug: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.content.types[0].slug = slug.to_string();
        config
    }

    #[tokio::test]
    async fn listing_pages_through_seeded_entries() {
        db::testing::init().await;
        let config = test_config("paged-posts");
        insert_test_data(&config, "paged-posts", "author-1")
            .await
            .unwrap();

        let first = list(
            &config,
            "paged-posts",
            &ListOptions {
                from: Some(0),
                limit: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.page, 0);
        assert_eq!(first.page_size, 10);
        // Default order is newest first.
        for pair in first.data.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }

        let second = list(
            &config,
            "paged-posts",
            &ListOptions {
                from: Some(10),
                limit: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(second.data.len(), 2);
        assert_eq!(second.page, 1);

        let ascending = list(
            &config,
            "paged-posts",
            &ListOptions {
                sort_order: Some("asc".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        for pair in ascending.data.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn unknown_types_are_not_found() {
        db::testing::init().await;
        let config = AppConfig::default();

        assert!(matches!(
            list(&config, "nope", &ListOptions::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            get(&config, "nope", "anything").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            update(&config, "nope", "anything", EntryPatch::new()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn get_finds_seeded_entries_by_slug() {
        db::testing::init().await;
        let config = test_config("lookup-posts");
        insert_test_data(&config, "lookup-posts", "author-2")
            .await
            .unwrap();

        let page = list(&config, "lookup-posts", &ListOptions::default())
            .await
            .unwrap();
        let wanted = &page.data[0];

        let found = get(&config, "lookup-posts", &wanted.slug).await.unwrap();
        assert_eq!(found.id, wanted.id);
        assert_eq!(found.author, "author-2");

        let missing = get(&config, "lookup-posts", "no-such-slug").await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_validates_merges_and_persists() {
        db::testing::init().await;
        let config = test_config("edited-posts");
        insert_test_data(&config, "edited-posts", "author-3")
            .await
            .unwrap();
        let page = list(&config, "edited-posts", &ListOptions::default())
            .await
            .unwrap();
        let slug = page.data[0].slug.clone();
        let published = !page.data[0].draft;

        // The configured message, not the generic one.
        let mut bad = EntryPatch::new();
        bad.insert("title".into(), FieldValue::Text("short".into()));
        let err = update(&config, "edited-posts", &slug, bad).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Title must be between 8 and 150 characters"
        );

        let mut unknown = EntryPatch::new();
        unknown.insert("surprise".into(), FieldValue::Bool(true));
        let err = update(&config, "edited-posts", &slug, unknown)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown field \"surprise\"");

        let mut patch = EntryPatch::new();
        patch.insert(
            "title".into(),
            FieldValue::Text("A fresh title for the entry".into()),
        );
        patch.insert(DRAFT_KEY.into(), FieldValue::Bool(published));
        let updated = update(&config, "edited-posts", &slug, patch).await.unwrap();
        assert_eq!(
            updated.field("title").and_then(|v| v.as_text()),
            Some("A fresh title for the entry")
        );
        assert_eq!(updated.draft, published);
        // Untouched fields survive the merge.
        assert!(updated.field("description").is_some());

        let reloaded = get(&config, "edited-posts", &slug).await.unwrap();
        assert_eq!(
            reloaded.field("title").and_then(|v| v.as_text()),
            Some("A fresh title for the entry")
        );
    }

    #[tokio::test]
    async fn seeding_twice_adds_a_second_batch() {
        db::testing::init().await;
        let config = test_config("reseeded-posts");
        insert_test_data(&config, "reseeded-posts", "author-4")
            .await
            .unwrap();
        insert_test_data(&config, "reseeded-posts", "author-4")
            .await
            .unwrap();

        let page = list(
            &config,
            "reseeded-posts",
            &ListOptions {
                limit: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.data.len(), 2 * DEMO_ENTRY_COUNT);
    }

    #[test]
    fn demo_values_respect_the_descriptors() {
        let config = AppConfig::default();
        let post = config.content_type("post").unwrap();
        for i in 1..=DEMO_ENTRY_COUNT {
            for field in &post.fields {
                let value = demo_value(field, i);
                assert!(
                    validate_field(field, value.as_ref()).is_ok(),
                    "field {} rejected its demo value",
                    field.name
                );
            }
        }
    }
}
