use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::content::entry::ContentEntry;
use contracts::content::value::FieldValue;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use crate::shared::data::db::get_connection;

const ENTRY_COLUMNS: &str =
    "id, content_type, slug, author, draft, comment_count, fields, created_at, updated_at";

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_entry(row: &QueryResult) -> Result<ContentEntry> {
    let fields_json: String = row.try_get("", "fields")?;
    let fields: BTreeMap<String, FieldValue> =
        serde_json::from_str(&fields_json).context("Corrupt field document")?;

    let created_at: String = row.try_get("", "created_at")?;
    let updated_at: String = row.try_get("", "updated_at")?;

    Ok(ContentEntry {
        id: row.try_get("", "id")?,
        content_type: row.try_get("", "content_type")?,
        slug: row.try_get("", "slug")?,
        author: row.try_get("", "author")?,
        draft: row.try_get::<i32>("", "draft")? != 0,
        comments: row.try_get::<Option<i64>>("", "comment_count")?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
        fields,
    })
}

/// Insert a new entry
pub async fn insert(entry: &ContentEntry) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO content (id, content_type, slug, author, draft, comment_count, fields, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            entry.id.clone().into(),
            entry.content_type.clone().into(),
            entry.slug.clone().into(),
            entry.author.clone().into(),
            (if entry.draft { 1 } else { 0 }).into(),
            entry.comments.into(),
            serde_json::to_string(&entry.fields)?.into(),
            entry.created_at.to_rfc3339().into(),
            entry.updated_at.to_rfc3339().into(),
        ],
    ))
    .await
    .context("Failed to insert entry")?;

    Ok(())
}

/// One page of entries of a type
///
/// `sort_by` takes the wire names; anything unrecognized falls back to the
/// creation time. Only whitelisted column names reach the statement.
pub async fn list(
    type_slug: &str,
    limit: i64,
    offset: i64,
    sort_by: &str,
    sort_desc: bool,
) -> Result<Vec<ContentEntry>> {
    let conn = get_connection();

    let column = match sort_by {
        "createdAt" => "created_at",
        "updatedAt" => "updated_at",
        "slug" => "slug",
        _ => "created_at",
    };
    let direction = if sort_desc { "DESC" } else { "ASC" };

    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!(
                "SELECT {} FROM content WHERE content_type = ?
                 ORDER BY {} {} LIMIT ? OFFSET ?",
                ENTRY_COLUMNS, column, direction
            ),
            [type_slug.into(), limit.into(), offset.into()],
        ))
        .await?;

    rows.iter().map(row_to_entry).collect()
}

/// Get one entry by its slug
pub async fn get_by_slug(type_slug: &str, slug: &str) -> Result<Option<ContentEntry>> {
    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!(
                "SELECT {} FROM content WHERE content_type = ? AND slug = ?",
                ENTRY_COLUMNS
            ),
            [type_slug.into(), slug.into()],
        ))
        .await?;

    result.as_ref().map(row_to_entry).transpose()
}

/// Replace the field document and draft flag of an entry
pub async fn update_fields(
    id: &str,
    fields: &BTreeMap<String, FieldValue>,
    draft: bool,
) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE content SET fields = ?, draft = ?, updated_at = ? WHERE id = ?",
        [
            serde_json::to_string(fields)?.into(),
            (if draft { 1 } else { 0 }).into(),
            Utc::now().to_rfc3339().into(),
            id.into(),
        ],
    ))
    .await
    .context("Failed to update entry")?;

    Ok(())
}

/// Count all entries
pub async fn count() -> Result<i64> {
    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM content".to_string(),
        ))
        .await?;

    match result {
        Some(row) => Ok(row.try_get("", "n")?),
        None => Ok(0),
    }
}
