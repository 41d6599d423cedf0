//! HTTP API layer for the microblog backend.
//!
//! - **Endpoints**: tweets, likes, media uploads, profiles and follows
//! - **Middleware**: API key authentication and shared state
//! - **Response**: the `{result, data, error_type, error_message}` envelope
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;

pub use endpoints::router;
pub use middleware::AppState;

/// Mount the authenticated API under `/api` with state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            router().route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                middleware::api_key_auth,
            )),
        )
        .with_state(state)
}
