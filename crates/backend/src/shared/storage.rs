//! Stored files
//!
//! Uploads land in the configured storage directory under a uuid-prefixed
//! name and are served back at `/files/<stored name>`. The `path` recorded
//! in documents is the public one ("files/..."), not the disk path.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use contracts::api::UploadedFileBody;
use uuid::Uuid;

/// Public route prefix under which the storage directory is served.
pub const PUBLIC_PREFIX: &str = "files";

/// Keep the client's file name recognizable but safe as a path segment.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Write the bytes under a fresh uuid-prefixed name and describe the result.
pub async fn save(dir: &Path, name: &str, mime: &str, bytes: &[u8]) -> Result<UploadedFileBody> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Cannot create storage directory {}", dir.display()))?;

    let id = Uuid::new_v4().simple().to_string();
    let stored_name = format!("{}-{}", &id[..8], sanitize_name(name));
    let target = dir.join(&stored_name);

    tokio::fs::write(&target, bytes)
        .await
        .with_context(|| format!("Cannot write {}", target.display()))?;

    tracing::info!("Stored {} ({} bytes)", target.display(), bytes.len());

    Ok(UploadedFileBody {
        path: format!("{}/{}", PUBLIC_PREFIX, stored_name),
        name: name.to_string(),
        mime: mime.to_string(),
        size: bytes.len() as u64,
    })
}

/// Remove a previously stored file, addressed by its public path.
pub async fn delete(dir: &Path, public_path: &str) -> Result<()> {
    let stored_name = public_path
        .strip_prefix(&format!("{}/", PUBLIC_PREFIX))
        .ok_or_else(|| anyhow!("Not a stored file path: {}", public_path))?;
    // The stored name is a single sanitized segment; anything else is not
    // ours to delete.
    if stored_name.contains('/') || stored_name.contains('\\') || stored_name.contains("..") {
        return Err(anyhow!("Not a stored file path: {}", public_path));
    }

    let target: PathBuf = dir.join(stored_name);
    tokio::fs::remove_file(&target)
        .await
        .with_context(|| format!("Cannot remove {}", target.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_recognizable_names() {
        assert_eq!(sanitize_name("photo.png"), "photo.png");
        assert_eq!(sanitize_name("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_name(""), "file");
    }

    #[tokio::test]
    async fn save_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let stored = save(dir.path(), "note.txt", "text/plain", b"hello")
            .await
            .unwrap();
        assert!(stored.path.starts_with("files/"));
        assert!(stored.path.ends_with("-note.txt"));
        assert_eq!(stored.size, 5);

        let on_disk = dir.path().join(stored.path.strip_prefix("files/").unwrap());
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"hello");

        delete(dir.path(), &stored.path).await.unwrap();
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn delete_rejects_paths_outside_the_store() {
        let dir = tempfile::tempdir().unwrap();
        assert!(delete(dir.path(), "files/../escape").await.is_err());
        assert!(delete(dir.path(), "elsewhere/name").await.is_err());
    }
}
