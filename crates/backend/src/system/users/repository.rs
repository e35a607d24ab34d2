use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::system::users::{User, UserProfile};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use crate::shared::data::db::get_connection;

const USER_COLUMNS: &str =
    "id, username, email, email_verified, profile, roles, created_at, updated_at";

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_user(row: &QueryResult) -> Result<User> {
    let profile_json: String = row.try_get("", "profile")?;
    let profile: UserProfile =
        serde_json::from_str(&profile_json).context("Corrupt profile document")?;

    let roles_json: String = row.try_get("", "roles")?;
    let roles: Vec<String> = serde_json::from_str(&roles_json).unwrap_or_default();

    let created_at: String = row.try_get("", "created_at")?;
    let updated_at: String = row.try_get("", "updated_at")?;

    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        email: row.try_get("", "email")?,
        email_verified: row.try_get::<i32>("", "email_verified")? != 0,
        profile,
        roles,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

/// Create user with password hash
pub async fn create_with_password(
    user: &User,
    password_hash: &str,
    verification_token: Option<&str>,
) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO users (id, username, email, email_verified, email_verification_token, password_hash, profile, roles, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.username.clone().into(),
            user.email.clone().into(),
            (if user.email_verified { 1 } else { 0 }).into(),
            verification_token.map(ToString::to_string).into(),
            password_hash.to_string().into(),
            serde_json::to_string(&user.profile)?.into(),
            serde_json::to_string(&user.roles)?.into(),
            user.created_at.to_rfc3339().into(),
            user.updated_at.to_rfc3339().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

/// Get user by ID
pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;

    result.as_ref().map(row_to_user).transpose()
}

/// Get user by username
pub async fn get_by_username(username: &str) -> Result<Option<User>> {
    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
            [username.into()],
        ))
        .await?;

    result.as_ref().map(row_to_user).transpose()
}

/// Get user by email
pub async fn get_by_email(email: &str) -> Result<Option<User>> {
    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
            [email.into()],
        ))
        .await?;

    result.as_ref().map(row_to_user).transpose()
}

/// Get password hash for user
pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let hash: String = row.try_get("", "password_hash")?;
            Ok(Some(hash))
        }
        None => Ok(None),
    }
}

/// Change the username only
pub async fn set_username(user_id: &str, username: &str) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE users SET username = ?, updated_at = ? WHERE id = ?",
        [
            username.into(),
            Utc::now().to_rfc3339().into(),
            user_id.into(),
        ],
    ))
    .await
    .context("Failed to update username")?;

    Ok(())
}

/// Change the email; the address counts as unverified until the fresh
/// token is confirmed.
pub async fn set_email(user_id: &str, email: &str, verification_token: &str) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE users
         SET email = ?, email_verified = 0, email_verification_token = ?, updated_at = ?
         WHERE id = ?",
        [
            email.into(),
            verification_token.into(),
            Utc::now().to_rfc3339().into(),
            user_id.into(),
        ],
    ))
    .await
    .context("Failed to update email")?;

    Ok(())
}

/// Replace the stored profile document
pub async fn set_profile(user_id: &str, profile: &UserProfile) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE users SET profile = ?, updated_at = ? WHERE id = ?",
        [
            serde_json::to_string(profile)?.into(),
            Utc::now().to_rfc3339().into(),
            user_id.into(),
        ],
    ))
    .await
    .context("Failed to update profile")?;

    Ok(())
}

/// Replace the password hash
pub async fn set_password_hash(user_id: &str, password_hash: &str) -> Result<()> {
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?",
        [
            password_hash.into(),
            Utc::now().to_rfc3339().into(),
            user_id.into(),
        ],
    ))
    .await
    .context("Failed to update password hash")?;

    Ok(())
}

/// Delete user (hard delete)
pub async fn delete(id: &str) -> Result<bool> {
    let conn = get_connection();

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM users WHERE id = ?",
            [id.into()],
        ))
        .await
        .context("Failed to delete user")?;

    Ok(result.rows_affected() > 0)
}
