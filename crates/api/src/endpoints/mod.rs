//! API endpoints.

mod medias;
mod tweets;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/tweets", tweets::router())
        .nest("/medias", medias::router())
        .nest("/users", users::router())
}
