use std::path::Path;

use contracts::content::field::FieldDescriptor;
use contracts::content::validation::validate_field;
use contracts::system::users::{
    ChangePasswordDto, DeleteAccountDto, ProfilePatch, UpdateEmailDto, UpdateUsernameDto, User,
};

use super::{password, repository};
use crate::shared::error::ServiceError;
use crate::shared::storage;

/// Account the session layer resolves `me` to. Sessions live in front of
/// this service; without them the demo account is the signed-in user.
pub const DEMO_USERNAME: &str = "demo";

/// Minimum length of username, email and display name, in characters.
/// The client enforces the same bound before a request goes out.
const MIN_ACCOUNT_FIELD_CHARS: usize = 3;

/// Get the signed-in account
pub async fn me() -> Result<User, ServiceError> {
    repository::get_by_username(DEMO_USERNAME)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))
}

pub async fn get_by_id(user_id: &str) -> Result<User, ServiceError> {
    repository::get_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))
}

/// Change the username
pub async fn update_username(
    user_id: &str,
    dto: UpdateUsernameDto,
) -> Result<User, ServiceError> {
    let username = dto.username.trim().to_string();
    if username.chars().count() < MIN_ACCOUNT_FIELD_CHARS {
        return Err(ServiceError::invalid(format!(
            "Username must be at least {} characters",
            MIN_ACCOUNT_FIELD_CHARS
        )));
    }

    // Check if username already belongs to someone else
    if let Some(existing) = repository::get_by_username(&username).await? {
        if existing.id != user_id {
            return Err(ServiceError::invalid("Username already taken"));
        }
    }

    repository::set_username(user_id, &username).await?;
    get_by_id(user_id).await
}

/// Change the email address. A fresh verification token replaces the old
/// one and the address counts as unverified until it is confirmed.
pub async fn update_email(user_id: &str, dto: UpdateEmailDto) -> Result<User, ServiceError> {
    let email = dto.email.trim().to_string();
    if !email.contains('@') {
        return Err(ServiceError::invalid("Invalid email format"));
    }

    if let Some(existing) = repository::get_by_email(&email).await? {
        if existing.id != user_id {
            return Err(ServiceError::invalid("Email already taken"));
        }
    }

    let verification_token = uuid::Uuid::new_v4().to_string();
    repository::set_email(user_id, &email, &verification_token).await?;
    get_by_id(user_id).await
}

/// Merge changed profile keys into the stored profile.
///
/// `displayName` is a fixed key; every other key must name a configured
/// profile field and passes the same constraint checks the editor ran.
pub async fn update_profile(
    user_id: &str,
    patch: ProfilePatch,
    profile_fields: &[FieldDescriptor],
) -> Result<User, ServiceError> {
    let mut user = get_by_id(user_id).await?;

    for (name, value) in &patch {
        if name == "displayName" {
            continue;
        }
        let field = profile_fields
            .iter()
            .find(|f| f.name == *name)
            .ok_or_else(|| ServiceError::invalid(format!("Unknown field \"{}\"", name)))?;
        validate_field(field, Some(value)).map_err(|err| {
            let message = field
                .error_message
                .clone()
                .unwrap_or_else(|| err.to_string());
            ServiceError::invalid(message)
        })?;
    }

    for (name, value) in patch {
        if name == "displayName" {
            user.profile.display_name = value.as_text().map(ToString::to_string);
        } else {
            user.profile.fields.insert(name, value);
        }
    }

    repository::set_profile(user_id, &user.profile).await?;
    get_by_id(user_id).await
}

/// Change the password, verifying the current one first
pub async fn change_password(user_id: &str, dto: ChangePasswordDto) -> Result<(), ServiceError> {
    let current_hash = repository::get_password_hash(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))?;

    if !password::verify_password(&dto.password, &current_hash)? {
        return Err(ServiceError::invalid("Incorrect password"));
    }

    password::validate_password_strength(&dto.new_password)
        .map_err(|e| ServiceError::invalid(e.to_string()))?;

    let new_hash = password::hash_password(&dto.new_password)?;
    repository::set_password_hash(user_id, &new_hash).await?;

    Ok(())
}

/// Delete the account, verifying the password first. The stored picture
/// goes with it; a failed file removal is logged, not surfaced.
pub async fn delete_account(
    user_id: &str,
    dto: DeleteAccountDto,
    storage_dir: &Path,
) -> Result<(), ServiceError> {
    let user = get_by_id(user_id).await?;

    let current_hash = repository::get_password_hash(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))?;
    if !password::verify_password(&dto.password, &current_hash)? {
        return Err(ServiceError::invalid("Incorrect password"));
    }

    if !repository::delete(user_id).await? {
        return Err(ServiceError::not_found("User not found"));
    }

    if let Some(picture) = user.profile.picture {
        if let Err(err) = storage::delete(storage_dir, &picture).await {
            tracing::warn!("Error deleting previous picture: {:#}", err);
        }
    }

    Ok(())
}

/// Store a new profile picture and drop the previous one.
pub async fn update_picture(
    user_id: &str,
    storage_dir: &Path,
    file_name: &str,
    mime: &str,
    bytes: &[u8],
) -> Result<User, ServiceError> {
    let mut user = get_by_id(user_id).await?;

    let stored = storage::save(storage_dir, file_name, mime, bytes).await?;

    if let Some(previous) = user.profile.picture.take() {
        if let Err(err) = storage::delete(storage_dir, &previous).await {
            tracing::warn!("Error deleting previous picture: {:#}", err);
        }
    }

    user.profile.picture = Some(stored.path);
    repository::set_profile(user_id, &user.profile).await?;
    get_by_id(user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db;
    use crate::system::initialization;
    use chrono::Utc;
    use contracts::content::field::FieldType;
    use contracts::content::value::FieldValue;
    use contracts::system::users::UserProfile;

    async fn seeded_user(prefix: &str) -> User {
        db::testing::init().await;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let user = User {
            id: id.clone(),
            username: format!("{}-{}", prefix, &id[..8]),
            email: format!("{}-{}@example.com", prefix, &id[..8]),
            email_verified: true,
            profile: UserProfile::default(),
            roles: vec!["user".into()],
            created_at: now,
            updated_at: now,
        };
        let hash = password::hash_password("original-password").unwrap();
        repository::create_with_password(&user, &hash, None)
            .await
            .unwrap();
        user
    }

    #[tokio::test]
    async fn username_conflicts_are_rejected_with_the_taken_message() {
        let first = seeded_user("first").await;
        let second = seeded_user("second").await;

        let err = update_username(
            &second.id,
            UpdateUsernameDto {
                username: first.username.clone(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Username already taken");

        // Re-submitting your own name is not a conflict.
        let same = update_username(
            &first.id,
            UpdateUsernameDto {
                username: first.username.clone(),
            },
        )
        .await
        .unwrap();
        assert_eq!(same.username, first.username);
    }

    #[tokio::test]
    async fn email_change_resets_verification() {
        let user = seeded_user("email").await;
        let updated = update_email(
            &user.id,
            UpdateEmailDto {
                email: format!("fresh-{}@example.com", &user.id[..8]),
            },
        )
        .await
        .unwrap();
        assert!(!updated.email_verified);
        assert!(updated.email.starts_with("fresh-"));

        let err = update_email(
            &user.id,
            UpdateEmailDto {
                email: "not-an-address".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[tokio::test]
    async fn profile_patch_merges_and_validates() {
        let user = seeded_user("profile").await;
        let fields = vec![{
            let mut bio = FieldDescriptor::new("bio", FieldType::TextArea, "Bio");
            bio.max_length = Some(10);
            bio
        }];

        let mut patch = ProfilePatch::new();
        patch.insert("displayName".into(), FieldValue::Text("Ada".into()));
        patch.insert("bio".into(), FieldValue::Text("short".into()));
        let updated = update_profile(&user.id, patch, &fields).await.unwrap();
        assert_eq!(updated.profile.display_name.as_deref(), Some("Ada"));
        assert_eq!(
            updated.profile.fields.get("bio").and_then(|v| v.as_text()),
            Some("short")
        );

        // A later patch touching only one key leaves the rest alone.
        let mut patch = ProfilePatch::new();
        patch.insert("displayName".into(), FieldValue::Text("Ada L.".into()));
        let updated = update_profile(&user.id, patch, &fields).await.unwrap();
        assert_eq!(updated.profile.display_name.as_deref(), Some("Ada L."));
        assert_eq!(
            updated.profile.fields.get("bio").and_then(|v| v.as_text()),
            Some("short")
        );

        // Constraint violations and unknown keys are rejected.
        let mut patch = ProfilePatch::new();
        patch.insert(
            "bio".into(),
            FieldValue::Text("far too long for the limit".into()),
        );
        assert!(update_profile(&user.id, patch, &fields).await.is_err());

        let mut patch = ProfilePatch::new();
        patch.insert("shoe_size".into(), FieldValue::Number(43.0));
        let err = update_profile(&user.id, patch, &fields).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown field \"shoe_size\"");
    }

    #[tokio::test]
    async fn password_change_verifies_the_current_one() {
        let user = seeded_user("password").await;

        let err = change_password(
            &user.id,
            ChangePasswordDto {
                password: "wrong-password".into(),
                new_password: "next-password".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password");

        change_password(
            &user.id,
            ChangePasswordDto {
                password: "original-password".into(),
                new_password: "next-password".into(),
            },
        )
        .await
        .unwrap();

        let hash = repository::get_password_hash(&user.id).await.unwrap().unwrap();
        assert!(password::verify_password("next-password", &hash).unwrap());
        assert!(!password::verify_password("original-password", &hash).unwrap());
    }

    #[tokio::test]
    async fn deleting_an_account_requires_the_password_and_removes_the_row() {
        let user = seeded_user("delete").await;
        let storage_dir = db::testing::storage_dir();

        let err = delete_account(
            &user.id,
            DeleteAccountDto {
                password: "wrong-password".into(),
            },
            &storage_dir,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password");

        delete_account(
            &user.id,
            DeleteAccountDto {
                password: "original-password".into(),
            },
            &storage_dir,
        )
        .await
        .unwrap();

        assert!(repository::get_by_id(&user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn picture_upload_replaces_the_previous_file() {
        let user = seeded_user("picture").await;
        let storage_dir = db::testing::storage_dir();

        let first = update_picture(&user.id, &storage_dir, "one.png", "image/png", b"one")
            .await
            .unwrap();
        let first_path = first.profile.picture.clone().unwrap();
        let first_on_disk = storage_dir.join(first_path.strip_prefix("files/").unwrap());
        assert!(first_on_disk.exists());

        let second = update_picture(&user.id, &storage_dir, "two.png", "image/png", b"two")
            .await
            .unwrap();
        let second_path = second.profile.picture.clone().unwrap();
        assert_ne!(first_path, second_path);
        assert!(!first_on_disk.exists());
    }

    #[tokio::test]
    async fn me_is_the_demo_account() {
        db::testing::init().await;
        initialization::ensure_demo_user().await.unwrap();
        let user = me().await.unwrap();
        assert_eq!(user.username, DEMO_USERNAME);
    }
}
