//! Tweet service: creation, deletion and the ranked feed.

use std::collections::HashMap;

use microblog_common::{AppError, AppResult};
use microblog_db::repositories::{
    FollowerRepository, LikeRepository, MediaRepository, TweetRepository, UserRepository,
};
use serde::Serialize;

use crate::services::user::UserSummary;

/// A user who liked a feed tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Liker {
    /// Liker ID.
    pub user_id: i32,
    /// Liker display name.
    pub name: String,
}

/// A tweet as shown in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedTweet {
    /// Tweet ID.
    pub id: i32,
    /// Tweet text.
    pub content: String,
    /// Public paths of attached media, in upload order.
    pub attachments: Vec<String>,
    /// Author of the tweet.
    pub author: UserSummary,
    /// Users who liked the tweet.
    pub likes: Vec<Liker>,
}

/// Tweet service for business logic.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
    media_repo: MediaRepository,
    like_repo: LikeRepository,
    follower_repo: FollowerRepository,
    user_repo: UserRepository,
}

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub const fn new(
        tweet_repo: TweetRepository,
        media_repo: MediaRepository,
        like_repo: LikeRepository,
        follower_repo: FollowerRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            tweet_repo,
            media_repo,
            like_repo,
            follower_repo,
            user_repo,
        }
    }

    /// Create a tweet and attach previously uploaded media. Returns the new ID.
    ///
    /// Unknown media IDs are ignored. Blank text is rejected before any write.
    pub async fn create_tweet(
        &self,
        author_id: i32,
        text: &str,
        media_ids: &[i32],
    ) -> AppResult<i32> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("Tweet text cannot be empty.".to_string()));
        }

        let tweet = self
            .tweet_repo
            .create_with_media(author_id, text, media_ids)
            .await
            .inspect_err(|e| {
                tracing::error!(author_id, error = %e, "Failed to create tweet");
            })?;

        tracing::info!(tweet_id = tweet.id, author_id, "Tweet created");
        Ok(tweet.id)
    }

    /// Delete a tweet if `requester_id` wrote it.
    ///
    /// Returns false when the tweet does not exist, belongs to someone else,
    /// or the delete fails. Callers cannot tell these apart.
    pub async fn delete_tweet(&self, tweet_id: i32, requester_id: i32) -> bool {
        match self.tweet_repo.delete_owned(tweet_id, requester_id).await {
            Ok(true) => {
                tracing::info!(tweet_id, requester_id, "Tweet deleted");
                true
            }
            Ok(false) => {
                tracing::warn!(tweet_id, requester_id, "Tweet not found or not owned");
                false
            }
            Err(e) => {
                tracing::error!(tweet_id, requester_id, error = %e, "Failed to delete tweet");
                false
            }
        }
    }

    /// Tweets from everyone `user_id` follows, most liked first.
    ///
    /// Any store failure yields an empty feed.
    pub async fn get_feed(&self, user_id: i32) -> Vec<FeedTweet> {
        match self.load_feed(user_id).await {
            Ok(feed) => feed,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load feed");
                Vec::new()
            }
        }
    }

    async fn load_feed(&self, user_id: i32) -> AppResult<Vec<FeedTweet>> {
        let following = self.follower_repo.find_following_ids(user_id).await?;
        let tweets = self.tweet_repo.find_ranked_by_authors(&following).await?;
        if tweets.is_empty() {
            return Ok(Vec::new());
        }

        let tweet_ids: Vec<i32> = tweets.iter().map(|t| t.id).collect();
        let media = self.media_repo.find_by_tweet_ids(&tweet_ids).await?;
        let likes = self.like_repo.find_by_tweet_ids(&tweet_ids).await?;

        let mut user_ids: Vec<i32> = tweets
            .iter()
            .map(|t| t.author_id)
            .chain(likes.iter().map(|l| l.user_id))
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let names: HashMap<i32, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();
        let name_of = |id: i32| names.get(&id).cloned().unwrap_or_default();

        let mut attachments: HashMap<i32, Vec<String>> = HashMap::new();
        for m in media {
            if let Some(tweet_id) = m.tweet_id {
                attachments.entry(tweet_id).or_default().push(m.file_path);
            }
        }

        let mut likers: HashMap<i32, Vec<Liker>> = HashMap::new();
        for l in likes {
            likers.entry(l.tweet_id).or_default().push(Liker {
                user_id: l.user_id,
                name: name_of(l.user_id),
            });
        }

        let feed = tweets
            .into_iter()
            .map(|t| FeedTweet {
                id: t.id,
                attachments: attachments.remove(&t.id).unwrap_or_default(),
                likes: likers.remove(&t.id).unwrap_or_default(),
                author: UserSummary {
                    id: t.author_id,
                    name: name_of(t.author_id),
                },
                content: t.content,
            })
            .collect();

        Ok(feed)
    }
}
