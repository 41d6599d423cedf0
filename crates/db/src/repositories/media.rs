//! Media repository.

use std::sync::Arc;

use crate::entities::{Media, media};
use microblog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Media repository for database operations.
#[derive(Clone)]
pub struct MediaRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaRepository {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a media row by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<media::Model>> {
        Media::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a detached media row for a stored file.
    pub async fn create(&self, file_path: &str) -> AppResult<media::Model> {
        let model = media::ActiveModel {
            file_path: Set(file_path.to_string()),
            tweet_id: Set(None),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get media attached to the given tweets, in upload order.
    pub async fn find_by_tweet_ids(&self, tweet_ids: &[i32]) -> AppResult<Vec<media::Model>> {
        if tweet_ids.is_empty() {
            return Ok(vec![]);
        }

        Media::find()
            .filter(media::Column::TweetId.is_in(tweet_ids.to_vec()))
            .order_by_asc(media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
