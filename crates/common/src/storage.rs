//! Storage for uploaded media files.

use std::path::{Path, PathBuf};

use crate::{AppError, AppResult};

/// File extensions accepted for upload, lower-case with the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".mp4", ".mov", ".bin",
];

/// Extension assumed when the client sends no file name.
const DEFAULT_EXTENSION: &str = ".bin";

/// Metadata of a file written to storage.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Storage key (file name relative to the media directory).
    pub key: String,
    /// Public path the file is served under.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write a file under `key`.
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<StoredFile>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
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
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<StoredFile> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;

        let path = self.base_path.join(key);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        tracing::debug!(path = %path.display(), size = data.len(), "Wrote media file");

        Ok(StoredFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {e}"))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Resolve the stored extension for an uploaded file name.
///
/// A missing or empty name falls back to `.bin`. The comparison ignores
/// case and the returned extension is lower-case.
pub fn validate_extension(file_name: Option<&str>) -> AppResult<String> {
    let Some(name) = file_name.filter(|n| !n.is_empty()) else {
        return Ok(DEFAULT_EXTENSION.to_string());
    };

    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        tracing::warn!(file_name = name, extension = %extension, "Rejected upload with unsupported extension");
        Err(AppError::Validation("Unacceptable file format.".to_string()))
    }
}
