//! Follower repository.

use std::sync::Arc;

use crate::entities::{Follower, follower};
use microblog_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

/// Follower repository for database operations.
#[derive(Clone)]
pub struct FollowerRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowerRepository {
    /// Create a new follower repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a follow edge unless it already exists.
    ///
    /// Concurrent inserts of the same pair resolve to a single row.
    /// Returns whether a row was created.
    pub async fn insert_if_absent(&self, follower_id: i32, following_id: i32) -> AppResult<bool> {
        let model = follower::ActiveModel {
            follower_id: Set(follower_id),
            following_id: Set(following_id),
        };

        let inserted = Follower::insert(model)
            .on_conflict(
                OnConflict::columns([
                    follower::Column::FollowerId,
                    follower::Column::FollowingId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Delete a follow edge. Returns the number of rows removed.
    pub async fn delete_pair(&self, follower_id: i32, following_id: i32) -> AppResult<u64> {
        let result = Follower::delete_many()
            .filter(follower::Column::FollowerId.eq(follower_id))
            .filter(follower::Column::FollowingId.eq(following_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// IDs of the users `user_id` follows.
    pub async fn find_following_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        let edges = Follower::find()
            .filter(follower::Column::FollowerId.eq(user_id))
            .order_by_asc(follower::Column::FollowingId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(edges.into_iter().map(|e| e.following_id).collect())
    }

    /// IDs of the users following `user_id`.
    pub async fn find_follower_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        let edges = Follower::find()
            .filter(follower::Column::FollowingId.eq(user_id))
            .order_by_asc(follower::Column::FollowerId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(edges.into_iter().map(|e| e.follower_id).collect())
    }
}
