//! Tweet repository.

use std::sync::Arc;

use crate::entities::{Media, Tweet, like, media, tweet};
use chrono::Utc;
use microblog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
    sea_query::Expr,
};

/// Tweet repository for database operations.
#[derive(Clone)]
pub struct TweetRepository {
    db: Arc<DatabaseConnection>,
}

impl TweetRepository {
    /// Create a new tweet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a tweet and attach the given media to it in one transaction.
    ///
    /// Media IDs with no matching row are skipped.
    pub async fn create_with_media(
        &self,
        author_id: i32,
        content: &str,
        media_ids: &[i32],
    ) -> AppResult<tweet::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let model = tweet::ActiveModel {
            content: Set(content.to_string()),
            author_id: Set(author_id),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !media_ids.is_empty() {
            let attached = Media::update_many()
                .col_expr(media::Column::TweetId, Expr::value(created.id))
                .filter(media::Column::Id.is_in(media_ids.to_vec()))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            tracing::debug!(
                tweet_id = created.id,
                requested = media_ids.len(),
                attached = attached.rows_affected,
                "Attached media to tweet"
            );
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Delete a tweet only if `author_id` wrote it. Media and likes go with
    /// it via `ON DELETE CASCADE`.
    ///
    /// Returns whether a row was removed.
    pub async fn delete_owned(&self, tweet_id: i32, author_id: i32) -> AppResult<bool> {
        let result = Tweet::delete_many()
            .filter(tweet::Column::Id.eq(tweet_id))
            .filter(tweet::Column::AuthorId.eq(author_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Get every tweet by the given authors, most liked first.
    ///
    /// Equal like counts fall back to newest first, then highest ID.
    pub async fn find_ranked_by_authors(&self, author_ids: &[i32]) -> AppResult<Vec<tweet::Model>> {
        if author_ids.is_empty() {
            return Ok(vec![]);
        }

        Tweet::find()
            .filter(tweet::Column::AuthorId.is_in(author_ids.to_vec()))
            .join(JoinType::LeftJoin, tweet::Relation::Likes.def())
            .group_by(tweet::Column::Id)
            .order_by_desc(Expr::col((like::Entity, like::Column::TweetId)).count())
            .order_by_desc(tweet::Column::CreatedAt)
            .order_by_desc(tweet::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
