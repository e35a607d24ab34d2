//! Wire envelopes shared by every endpoint

use serde::{Deserialize, Serialize};

/// Body of a 4xx/5xx response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of an upload response: where the stored file landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFileBody {
    pub path: String,
    pub name: String,
    pub mime: String,
    pub size: u64,
}
