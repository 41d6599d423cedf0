//! Microblog server entry point.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use microblog_api::AppState;
use microblog_common::{
    AppError, Config, LocalStorage,
    config::{LoggingConfig, SeedUser},
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "microblog=info,tower_http=info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(logging.level.as_deref().unwrap_or(DEFAULT_FILTER))
    });

    let json = logging.json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Make sure every configured user exists.
async fn seed_users(state: &AppState, users: &[SeedUser]) -> Result<(), AppError> {
    for seed in users {
        let user = state
            .user_service
            .ensure_user(&seed.name, &seed.api_key)
            .await?;
        info!(user_id = user.id, name = %user.name, "Seed user ready");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging settings live in the config, so it loads first
    let config = Config::load()?;
    init_tracing(&config.logging);

    info!("Starting microblog server...");

    let db = microblog_db::connect_with_retry(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    microblog_db::migrate(&db).await?;
    info!("Migrations completed");

    tokio::fs::create_dir_all(&config.media.dir).await?;
    let storage = Arc::new(LocalStorage::new(
        config.media.dir.clone(),
        config.media.url_prefix.clone(),
    ));

    let state = AppState::new(Arc::new(db), storage);
    seed_users(&state, &config.seed.users).await?;

    let media_prefix = match config.media.url_prefix.trim_end_matches('/') {
        "" => "/media",
        prefix => prefix,
    };

    let app = microblog_api::app(state)
        .nest_service(media_prefix, ServeDir::new(&config.media.dir))
        .layer(DefaultBodyLimit::max(config.media.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
