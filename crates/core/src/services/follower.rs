//! Follower service.

use microblog_common::AppResult;
use microblog_db::repositories::FollowerRepository;

/// Follower service for business logic.
///
/// Both operations are idempotent. Self-follow is rejected by the caller.
#[derive(Clone)]
pub struct FollowerService {
    follower_repo: FollowerRepository,
}

impl FollowerService {
    /// Create a new follower service.
    #[must_use]
    pub const fn new(follower_repo: FollowerRepository) -> Self {
        Self { follower_repo }
    }

    /// Make `follower_id` follow `following_id`. Following again is a no-op.
    pub async fn follow(&self, follower_id: i32, following_id: i32) -> AppResult<()> {
        let created = self
            .follower_repo
            .insert_if_absent(follower_id, following_id)
            .await
            .inspect_err(|e| {
                tracing::error!(follower_id, following_id, error = %e, "Failed to follow user");
            })?;

        if created {
            tracing::info!(follower_id, following_id, "User followed");
        } else {
            tracing::debug!(follower_id, following_id, "Already following");
        }

        Ok(())
    }

    /// Remove the follow edge if present.
    pub async fn unfollow(&self, follower_id: i32, following_id: i32) -> AppResult<()> {
        let removed = self
            .follower_repo
            .delete_pair(follower_id, following_id)
            .await
            .inspect_err(|e| {
                tracing::error!(follower_id, following_id, error = %e, "Failed to unfollow user");
            })?;

        if removed > 0 {
            tracing::info!(follower_id, following_id, "User unfollowed");
        } else {
            tracing::debug!(follower_id, following_id, "Was not following");
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use microblog_common::AppError;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_follow_twice_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();

        let service = FollowerService::new(FollowerRepository::new(Arc::new(db)));

        assert!(service.follow(1, 2).await.is_ok());
        assert!(service.follow(1, 2).await.is_ok());
    }

    #[tokio::test]
    async fn test_unfollow_when_not_following() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();

        let service = FollowerService::new(FollowerRepository::new(Arc::new(db)));

        assert!(service.unfollow(1, 2).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("foreign key violation".to_string())])
            .into_connection();

        let service = FollowerService::new(FollowerRepository::new(Arc::new(db)));

        assert!(matches!(
            service.follow(1, 999).await,
            Err(AppError::Database(_))
        ));
    }
}
