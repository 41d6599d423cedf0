//! User profile and follow endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use microblog_core::UserProfile;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Profile response.
#[derive(Serialize)]
pub struct ProfileResponse {
    /// The requested profile.
    pub user: UserProfile,
}

async fn profile_of(state: &AppState, user_id: i32) -> ApiResponse<ProfileResponse> {
    match state.user_service.get_profile(user_id).await {
        Ok(Some(user)) => ApiResponse::ok(ProfileResponse { user }),
        Ok(None) => ApiResponse::fail("UserNotFound", "User not found"),
        Err(e) => ApiResponse::from_error("UserNotFound", &e),
    }
}

/// Get the caller's own profile.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> ApiResponse<ProfileResponse> {
    profile_of(&state, user.id).await
}

/// Get a user's profile.
async fn show(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResponse<ProfileResponse> {
    profile_of(&state, user_id).await
}

/// Follow a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResponse<()> {
    if user.id == user_id {
        tracing::warn!(user_id, "Rejected self-follow");
        return ApiResponse::fail("FollowError", "Cannot follow yourself");
    }

    match state.follower_service.follow(user.id, user_id).await {
        Ok(()) => ApiResponse::ok_empty(),
        Err(e) => ApiResponse::from_error("FollowError", &e),
    }
}

/// Unfollow a user.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResponse<()> {
    match state.follower_service.unfollow(user.id, user_id).await {
        Ok(()) => ApiResponse::ok_empty(),
        Err(e) => ApiResponse::from_error("UnfollowError", &e),
    }
}

/// User and follow routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/{id}", get(show))
        .route("/{id}/follow", post(follow))
        .route("/{id}/unfollow", delete(unfollow))
}
