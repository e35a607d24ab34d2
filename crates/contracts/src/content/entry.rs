//! Content entries and list envelopes

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::FieldValue;

/// One stored piece of content. The dynamic field values sit flattened next
/// to the fixed columns, the way documents are stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub slug: String,
    pub author: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl ContentEntry {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// One page of a content listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPage {
    pub data: Vec<ContentEntry>,
    pub page: i64,
    pub page_size: i64,
}

/// Field changes submitted for one entry.
pub type EntryPatch = BTreeMap<String, FieldValue>;
