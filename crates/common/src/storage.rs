//! Local file storage for complaint attachments and officer certificates.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Stored file metadata.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Storage key (path relative to the upload root).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a file.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredFile>;

    /// Delete a file.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredFile> {
        let path = self.base_path.join(key);

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write file: {e}")))?;

        Ok(StoredFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.base_path.join(key);
        Ok(path.exists())
    }
}

/// Build a unique, filesystem-safe storage key from an uploaded file name.
///
/// The key is prefixed with the current millisecond timestamp so repeated
/// uploads of the same file name never overwrite each other. Path separators
/// and other unsafe characters in the original name are replaced.
#[must_use]
pub fn sanitize_file_name(original_name: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();

    let safe: String = original_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let safe = if safe.is_empty() {
        "file".to_string()
    } else {
        safe
    };

    format!("{timestamp}_{safe}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_path_separators() {
        let key = sanitize_file_name("../etc/passwd");
        assert!(!key.contains('/'));
        assert!(key.ends_with("passwd"));
    }

    #[test]
    fn test_sanitize_keeps_extension() {
        let key = sanitize_file_name("photo.jpg");
        assert!(key.ends_with("_photo.jpg"));
    }

    #[test]
    fn test_sanitize_empty_name() {
        let key = sanitize_file_name("");
        assert!(key.ends_with("_file"));
    }

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("storage_test_{}", std::process::id()));
        let storage = LocalStorage::new(dir.clone(), "/files".to_string());

        let stored = storage
            .upload("test.txt", b"hello", "text/plain")
            .await
            .unwrap();
        assert_eq!(stored.size, 5);
        assert_eq!(stored.url, "/files/test.txt");
        assert!(storage.exists("test.txt").await.unwrap());

        storage.delete("test.txt").await.unwrap();
        assert!(!storage.exists("test.txt").await.unwrap());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
