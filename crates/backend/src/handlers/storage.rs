use axum::extract::Multipart;
use axum::Json;
use contracts::api::UploadedFileBody;

use crate::shared::config;
use crate::shared::error::ServiceError;
use crate::shared::storage;

/// POST /api/storage
///
/// Accepts a multipart form with a single `file` part and writes it
/// into the storage directory under a collision-free name.
pub async fn upload(mut multipart: Multipart) -> Result<Json<UploadedFileBody>, ServiceError> {
    let storage_dir = config::get_storage_dir(config::get());
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::invalid(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::invalid(format!("Malformed upload: {}", e)))?;
        let stored = storage::save(&storage_dir, &file_name, &mime, &bytes).await?;
        return Ok(Json(stored));
    }
    Err(ServiceError::invalid("No file in upload"))
}
