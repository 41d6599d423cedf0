//! Like service.

use microblog_common::AppResult;
use microblog_db::repositories::LikeRepository;

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository) -> Self {
        Self { like_repo }
    }

    /// Like a tweet. Liking it again is a no-op.
    pub async fn add_like(&self, tweet_id: i32, user_id: i32) -> AppResult<()> {
        let created = self
            .like_repo
            .insert_if_absent(user_id, tweet_id)
            .await
            .inspect_err(|e| {
                tracing::error!(tweet_id, user_id, error = %e, "Failed to like tweet");
            })?;

        if created {
            tracing::info!(tweet_id, user_id, "Tweet liked");
        } else {
            tracing::debug!(tweet_id, user_id, "Tweet already liked");
        }

        Ok(())
    }

    /// Remove a like if present.
    pub async fn remove_like(&self, tweet_id: i32, user_id: i32) -> AppResult<()> {
        let removed = self
            .like_repo
            .delete_pair(user_id, tweet_id)
            .await
            .inspect_err(|e| {
                tracing::error!(tweet_id, user_id, error = %e, "Failed to unlike tweet");
            })?;

        if removed > 0 {
            tracing::info!(tweet_id, user_id, "Tweet unliked");
        } else {
            tracing::debug!(tweet_id, user_id, "Tweet was not liked");
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_add_like_twice_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();

        let service = LikeService::new(LikeRepository::new(Arc::new(db)));

        service.add_like(10, 1).await.unwrap();
        service.add_like(10, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_missing_like_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();

        let service = LikeService::new(LikeRepository::new(Arc::new(db)));

        service.remove_like(10, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_like_on_missing_tweet_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("foreign key violation".to_string())])
            .into_connection();

        let service = LikeService::new(LikeRepository::new(Arc::new(db)));

        assert!(service.add_like(404, 1).await.is_err());
    }
}
