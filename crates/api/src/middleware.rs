//! API middleware and shared state.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use microblog_common::{AppError, StorageBackend};
use microblog_core::{FollowerService, LikeService, MediaService, TweetService, UserService};
use microblog_db::repositories::{
    FollowerRepository, LikeRepository, MediaRepository, TweetRepository, UserRepository,
};
use sea_orm::DatabaseConnection;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "api-key";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Users and profiles.
    pub user_service: UserService,
    /// Tweets and the feed.
    pub tweet_service: TweetService,
    /// Likes.
    pub like_service: LikeService,
    /// Follow edges.
    pub follower_service: FollowerService,
    /// Media uploads.
    pub media_service: MediaService,
}

impl AppState {
    /// Build every repository and service on one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, storage: Arc<dyn StorageBackend>) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let tweet_repo = TweetRepository::new(Arc::clone(&db));
        let media_repo = MediaRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(Arc::clone(&db));
        let follower_repo = FollowerRepository::new(db);

        Self {
            user_service: UserService::new(user_repo.clone(), follower_repo.clone()),
            tweet_service: TweetService::new(
                tweet_repo,
                media_repo.clone(),
                like_repo.clone(),
                follower_repo.clone(),
                user_repo,
            ),
            like_service: LikeService::new(like_repo),
            follower_service: FollowerService::new(follower_repo),
            media_service: MediaService::new(media_repo, storage),
        }
    }
}

/// API key authentication middleware.
///
/// Rejects the request with 403 unless the `api-key` header names a user.
pub async fn api_key_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if api_key.is_empty() {
        tracing::warn!(path = %req.uri().path(), "Request without API key");
        return Err(AppError::Forbidden("Invalid API key".to_string()));
    }

    let Some(user) = state.user_service.authenticate(api_key).await? else {
        tracing::warn!(path = %req.uri().path(), "Request with unknown API key");
        return Err(AppError::Forbidden("Invalid API key".to_string()));
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
