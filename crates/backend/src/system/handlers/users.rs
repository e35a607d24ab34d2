use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::Json;
use contracts::system::users::{
    ChangePasswordDto, DeleteAccountDto, ProfilePatch, UpdateEmailDto, UpdateUsernameDto, User,
};

use crate::shared::config;
use crate::shared::error::ServiceError;
use crate::system::users::service;

/// The routes accept `me` in the id position; it resolves to the account
/// the session layer hands us.
async fn resolve_user_id(id: &str) -> Result<String, ServiceError> {
    if id == "me" {
        Ok(service::me().await?.id)
    } else {
        Ok(id.to_string())
    }
}

/// GET /api/users/:id
pub async fn get_user(Path(id): Path<String>) -> Result<Json<User>, ServiceError> {
    let user_id = resolve_user_id(&id).await?;
    let user = service::get_by_id(&user_id).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id/username
pub async fn update_username(
    Path(id): Path<String>,
    Json(dto): Json<UpdateUsernameDto>,
) -> Result<Json<User>, ServiceError> {
    let user_id = resolve_user_id(&id).await?;
    let user = service::update_username(&user_id, dto).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id/email
pub async fn update_email(
    Path(id): Path<String>,
    Json(dto): Json<UpdateEmailDto>,
) -> Result<Json<User>, ServiceError> {
    let user_id = resolve_user_id(&id).await?;
    let user = service::update_email(&user_id, dto).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id/profile
pub async fn update_profile(
    Path(id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<User>, ServiceError> {
    let user_id = resolve_user_id(&id).await?;
    let profile_fields = &config::get().app.user.profile.fields;
    let user = service::update_profile(&user_id, patch, profile_fields).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id/password
pub async fn change_password(
    Path(id): Path<String>,
    Json(dto): Json<ChangePasswordDto>,
) -> Result<StatusCode, ServiceError> {
    let user_id = resolve_user_id(&id).await?;
    service::change_password(&user_id, dto).await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/users/:id
pub async fn delete_user(
    Path(id): Path<String>,
    Json(dto): Json<DeleteAccountDto>,
) -> Result<StatusCode, ServiceError> {
    let user_id = resolve_user_id(&id).await?;
    let storage_dir = config::get_storage_dir(config::get());
    service::delete_account(&user_id, dto, &storage_dir).await?;
    Ok(StatusCode::OK)
}

/// PUT /api/users/:id/picture (multipart, field name "file")
pub async fn update_picture(
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<User>, ServiceError> {
    let user_id = resolve_user_id(&id).await?;
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

        let user =
            service::update_picture(&user_id, &storage_dir, &file_name, &mime, &bytes).await?;
        return Ok(Json(user));
    }

    Err(ServiceError::invalid("No file in upload"))
}
