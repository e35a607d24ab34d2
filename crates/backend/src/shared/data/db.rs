use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn initialize_database(db_path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    // Ensure required tables exist (minimal schema bootstrap)
    let check_users_table = r#"
        SELECT name FROM sqlite_master
        WHERE type='table' AND name='users';
    "#;
    let users_table_exists = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            check_users_table.to_string(),
        ))
        .await?;

    if users_table_exists.is_empty() {
        tracing::info!("Creating users table");
        let create_users_table_sql = r#"
            CREATE TABLE users (
                id TEXT PRIMARY KEY NOT NULL,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                email_verified INTEGER NOT NULL DEFAULT 0,
                email_verification_token TEXT,
                password_hash TEXT NOT NULL,
                profile TEXT NOT NULL DEFAULT '{}',
                roles TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_users_table_sql.to_string(),
        ))
        .await?;
    } else {
        // Ensure email_verification_token column exists; add if missing
        // (databases created before the email change flow lack it)
        let pragma = format!("PRAGMA table_info('{}');", "users");
        let cols = conn
            .query_all(Statement::from_string(DatabaseBackend::Sqlite, pragma))
            .await?;
        let mut has_token = false;
        for row in cols {
            let name: String = row.try_get("", "name").unwrap_or_default();
            if name == "email_verification_token" {
                has_token = true;
            }
        }
        if !has_token {
            tracing::info!("Adding email_verification_token column to users");
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "ALTER TABLE users ADD COLUMN email_verification_token TEXT;".to_string(),
            ))
            .await?;
        }
    }

    // content table: fixed columns plus the dynamic field document
    let check_content_table = r#"
        SELECT name FROM sqlite_master
        WHERE type='table' AND name='content';
    "#;
    let content_table_exists = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            check_content_table.to_string(),
        ))
        .await?;

    if content_table_exists.is_empty() {
        tracing::info!("Creating content table");
        let create_content_table_sql = r#"
            CREATE TABLE content (
                id TEXT PRIMARY KEY NOT NULL,
                content_type TEXT NOT NULL,
                slug TEXT NOT NULL,
                author TEXT NOT NULL,
                draft INTEGER NOT NULL DEFAULT 0,
                comment_count INTEGER,
                fields TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (content_type, slug)
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_content_table_sql.to_string(),
        ))
        .await?;
    }

    if DB_CONN.set(conn).is_err() {
        // A second initialization keeps the first connection.
        tracing::debug!("Database connection already initialized");
    }
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
pub mod testing {
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // One scratch database per test process, kept alive until exit.
    static SCRATCH: Lazy<TempDir> =
        Lazy::new(|| tempfile::tempdir().expect("cannot create scratch dir"));
    static INIT_LOCK: Mutex<()> = Mutex::new(());

    /// Point the shared connection at a scratch SQLite file. Safe to call
    /// from every test; the first call wins and later ones are no-ops.
    pub async fn init() {
        let _guard = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        if super::DB_CONN.get().is_some() {
            return;
        }
        let path = SCRATCH.path().join("test.db");
        super::initialize_database(&path)
            .await
            .expect("scratch database init failed");
    }

    pub fn storage_dir() -> std::path::PathBuf {
        let dir = SCRATCH.path().join("storage");
        std::fs::create_dir_all(&dir).expect("cannot create scratch storage dir");
        dir
    }
}
