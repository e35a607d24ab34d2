use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use contracts::config::AppConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    /// Site configuration served to the client. Missing keys fall back to
    /// the built-in demo site.
    pub app: AppConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/app.db".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: "target/storage".into(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000

[database]
path = "target/db/app.db"

[storage]
dir = "target/storage"
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Load the configuration, check the site invariants and pin it for the
/// rest of the process.
pub fn initialize() -> anyhow::Result<()> {
    let config = load_config()?;
    config
        .app
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid site configuration: {}", e))?;
    if CONFIG.set(config).is_err() {
        tracing::debug!("Configuration already loaded");
    }
    Ok(())
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Configuration has not been loaded")
}

/// Resolve a configured path relative to the executable directory.
/// Absolute paths pass through untouched.
fn resolve_from_exe(configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    // Fallback: use relative to current directory
    PathBuf::from(configured)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_from_exe(&config.database.path)
}

/// Get the stored-file directory from configuration
pub fn get_storage_dir(config: &Config) -> PathBuf {
    resolve_from_exe(&config.storage.dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.storage.dir, "target/storage");
        // No [app] section in the embedded default: the demo site applies.
        assert!(config.app.content_type("post").is_some());
        assert!(config.app.validate().is_ok());
    }

    #[test]
    fn test_partial_app_overlay_keeps_demo_types() {
        let config: Config = toml::from_str(
            r#"
            [app]
            title = "My site"
            "#,
        )
        .unwrap();
        assert_eq!(config.app.title, "My site");
        assert!(config.app.content_type("post").is_some());
        assert_eq!(config.server.port, 3000);
    }
}
