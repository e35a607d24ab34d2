use anyhow::Result;
use chrono::Utc;
use contracts::config::AppConfig;
use contracts::system::users::{User, UserProfile};

use crate::content;
use crate::system::users::{password, repository, service};

const DEMO_PASSWORD: &str = "demo-password";

/// Ensure the demo account exists (create if missing)
pub async fn ensure_demo_user() -> Result<()> {
    if repository::get_by_username(service::DEMO_USERNAME)
        .await?
        .is_none()
    {
        tracing::info!("Demo account not found. Creating it...");

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: service::DEMO_USERNAME.to_string(),
            email: "demo@example.com".to_string(),
            email_verified: true,
            profile: UserProfile {
                display_name: Some("Demo User".to_string()),
                picture: None,
                fields: Default::default(),
            },
            roles: vec!["user".to_string(), "admin".to_string()],
            created_at: now,
            updated_at: now,
        };
        let hash = password::hash_password(DEMO_PASSWORD)?;
        repository::create_with_password(&user, &hash, None).await?;

        tracing::warn!("═══════════════════════════════════════════════");
        tracing::warn!("  Demo account created!");
        tracing::warn!("  Username: {}", user.username);
        tracing::warn!("  Password: {}", DEMO_PASSWORD);
        tracing::warn!("  User ID: {}", user.id);
        tracing::warn!("═══════════════════════════════════════════════");
    }

    Ok(())
}

/// Seed demo entries for every configured content type (first run only)
pub async fn ensure_demo_content(config: &AppConfig) -> Result<()> {
    let count = content::repository::count().await?;
    if count > 0 {
        return Ok(());
    }

    let author = match repository::get_by_username(service::DEMO_USERNAME).await? {
        Some(user) => user.id,
        None => {
            tracing::warn!("Demo account missing, skipping content seed");
            return Ok(());
        }
    };

    for ty in &config.content.types {
        tracing::info!("Seeding demo entries for content type \"{}\"", ty.slug);
        content::service::insert_test_data(config, &ty.slug, &author)
            .await
            .map_err(|e| anyhow::anyhow!("Seeding \"{}\" failed: {}", ty.slug, e))?;
    }

    Ok(())
}
