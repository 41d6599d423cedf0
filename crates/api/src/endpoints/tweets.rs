//! Tweet and like endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use microblog_core::FeedTweet;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create tweet request.
#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    /// Tweet text.
    pub tweet_data: String,
    /// Previously uploaded media to attach.
    #[serde(default)]
    pub tweet_media_ids: Option<Vec<i32>>,
}

/// Created tweet response.
#[derive(Serialize)]
pub struct CreatedTweet {
    /// ID of the new tweet.
    pub tweet_id: i32,
}

/// Feed response.
#[derive(Serialize)]
pub struct FeedResponse {
    /// Tweets ranked by like count.
    pub tweets: Vec<FeedTweet>,
}

/// Create a tweet.
async fn create_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTweetRequest>,
) -> ApiResponse<CreatedTweet> {
    let media_ids = req.tweet_media_ids.unwrap_or_default();

    match state
        .tweet_service
        .create_tweet(user.id, &req.tweet_data, &media_ids)
        .await
    {
        Ok(tweet_id) => ApiResponse::ok(CreatedTweet { tweet_id }),
        Err(e) => ApiResponse::from_error("TweetError", &e),
    }
}

/// Get the caller's feed.
///
/// The feed degrades to an empty list on store failures, so this never
/// reports `ServerError` in practice.
async fn get_feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> ApiResponse<FeedResponse> {
    let tweets = state.tweet_service.get_feed(user.id).await;
    tracing::debug!(user_id = user.id, count = tweets.len(), "Feed loaded");
    ApiResponse::ok(FeedResponse { tweets })
}

/// Delete one of the caller's tweets.
async fn delete_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<i32>,
) -> ApiResponse<()> {
    if state.tweet_service.delete_tweet(tweet_id, user.id).await {
        ApiResponse::ok_empty()
    } else {
        ApiResponse::fail("NotFound", "Tweet not found or not owned by user")
    }
}

/// Like a tweet.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<i32>,
) -> ApiResponse<()> {
    match state.like_service.add_like(tweet_id, user.id).await {
        Ok(()) => ApiResponse::ok_empty(),
        Err(e) => ApiResponse::from_error("LikeError", &e),
    }
}

/// Remove a like.
async fn unlike(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<i32>,
) -> ApiResponse<()> {
    match state.like_service.remove_like(tweet_id, user.id).await {
        Ok(()) => ApiResponse::ok_empty(),
        Err(e) => ApiResponse::from_error("UnlikeError", &e),
    }
}

/// Tweet, like and feed routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tweet).get(get_feed))
        .route("/{id}", delete(delete_tweet))
        .route("/{id}/likes", post(like).delete(unlike))
}
