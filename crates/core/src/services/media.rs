//! Media service.

use std::sync::Arc;

use microblog_common::{AppResult, IdGenerator, StorageBackend, validate_extension};
use microblog_db::repositories::MediaRepository;

/// Media service for uploads and media rows.
#[derive(Clone)]
pub struct MediaService {
    media_repo: MediaRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl MediaService {
    /// Create a new media service writing files to `storage`.
    #[must_use]
    pub fn new(media_repo: MediaRepository, storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            media_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a stored file as a detached media row and return its ID.
    pub async fn store_media(&self, file_path: &str) -> AppResult<i32> {
        let media = self.media_repo.create(file_path).await.inspect_err(|e| {
            tracing::error!(file_path, error = %e, "Failed to record media");
        })?;

        tracing::info!(media_id = media.id, file_path, "Media stored");
        Ok(media.id)
    }

    /// Validate, write and record an uploaded file. Returns the media ID.
    ///
    /// Nothing is written when the extension is rejected. If the row cannot
    /// be recorded the written file is removed again.
    pub async fn upload(&self, file_name: Option<&str>, data: &[u8]) -> AppResult<i32> {
        let extension = validate_extension(file_name)?;
        let key = self.id_gen.generate_file_name(&extension);

        let stored = self.storage.save(&key, data).await?;

        match self.store_media(&stored.url).await {
            Ok(id) => Ok(id),
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    tracing::warn!(
                        key = %stored.key,
                        error = %cleanup,
                        "Failed to remove orphaned upload"
                    );
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use microblog_common::{AppError, LocalStorage};
    use microblog_db::entities::media;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use std::path::PathBuf;

    fn temp_storage() -> (PathBuf, Arc<dyn StorageBackend>) {
        let dir = std::env::temp_dir().join(format!("microblog-media-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.clone(), "/media".to_string());
        (dir, Arc::new(storage))
    }

    fn count_files(dir: &PathBuf) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_store_media_returns_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[media::Model {
                id: 7,
                file_path: "/media/a.png".to_string(),
                tweet_id: None,
            }]])
            .into_connection();

        let (_, storage) = temp_storage();
        let service = MediaService::new(MediaRepository::new(Arc::new(db)), storage);

        assert_eq!(service.store_media("/media/a.png").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_upload_rejects_extension_before_writing() {
        // No results queued: any query would fail
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (dir, storage) = temp_storage();
        let service = MediaService::new(MediaRepository::new(Arc::new(db)), storage);

        let result = service.upload(Some("payload.exe"), b"MZ").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(count_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[media::Model {
                id: 3,
                file_path: "/media/generated.jpg".to_string(),
                tweet_id: None,
            }]])
            .into_connection();

        let (dir, storage) = temp_storage();
        let service = MediaService::new(MediaRepository::new(Arc::new(db)), storage);

        let id = service.upload(Some("photo.jpg"), b"jpeg-bytes").await.unwrap();

        assert_eq!(id, 3);
        assert_eq!(count_files(&dir), 1);
        let entry = std::fs::read_dir(&dir).unwrap().next().unwrap().unwrap();
        assert!(entry.file_name().to_string_lossy().ends_with(".jpg"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_upload_removes_file_when_row_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection lost".to_string())])
            .into_connection();

        let (dir, storage) = temp_storage();
        let service = MediaService::new(MediaRepository::new(Arc::new(db)), storage);

        let result = service.upload(None, b"raw").await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(count_files(&dir), 0);

        std::fs::remove_dir_all(&dir).ok();
    }
}
