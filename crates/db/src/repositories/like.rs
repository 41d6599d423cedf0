//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like};
use microblog_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a like unless the user already liked the tweet.
    ///
    /// Returns whether a row was created.
    pub async fn insert_if_absent(&self, user_id: i32, tweet_id: i32) -> AppResult<bool> {
        let model = like::ActiveModel {
            user_id: Set(user_id),
            tweet_id: Set(tweet_id),
        };

        let inserted = Like::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::UserId, like::Column::TweetId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Delete a like. Returns the number of rows removed.
    pub async fn delete_pair(&self, user_id: i32, tweet_id: i32) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::TweetId.eq(tweet_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Get all likes on the given tweets.
    pub async fn find_by_tweet_ids(&self, tweet_ids: &[i32]) -> AppResult<Vec<like::Model>> {
        if tweet_ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .filter(like::Column::TweetId.is_in(tweet_ids.to_vec()))
            .order_by_asc(like::Column::TweetId)
            .order_by_asc(like::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on a tweet.
    pub async fn count_for_tweet(&self, tweet_id: i32) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::TweetId.eq(tweet_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_insert_if_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = LikeRepository::new(Arc::new(db));

        assert!(repo.insert_if_absent(1, 10).await.unwrap());
        // Conflict on the composite key: nothing inserted, no error
        assert!(!repo.insert_if_absent(1, 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_tweet_ids() {
        let likes = vec![
            like::Model {
                user_id: 1,
                tweet_id: 10,
            },
            like::Model {
                user_id: 2,
                tweet_id: 10,
            },
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([likes.clone()])
            .into_connection();

        let repo = LikeRepository::new(Arc::new(db));
        assert_eq!(repo.find_by_tweet_ids(&[10]).await.unwrap(), likes);
    }

    #[tokio::test]
    async fn test_count_for_tweet() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(3))
            }]])
            .into_connection();

        let repo = LikeRepository::new(Arc::new(db));
        assert_eq!(repo.count_for_tweet(10).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_database_error_is_mapped() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([sea_orm::DbErr::Custom("connection lost".to_string())])
            .into_connection();

        let repo = LikeRepository::new(Arc::new(db));
        let result = repo.delete_pair(1, 10).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
