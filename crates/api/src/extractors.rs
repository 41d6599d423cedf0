//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use microblog_common::AppError;
use microblog_db::entities::user;

/// Authenticated user extractor.
///
/// Reads the user placed in the request extensions by
/// [`api_key_auth`](crate::middleware::api_key_auth).
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Forbidden("Invalid API key".to_string()))
    }
}
