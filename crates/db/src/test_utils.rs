//! Test utilities for database operations.
//!
//! Provides throwaway databases with the schema already applied.

use std::sync::Arc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::entities::{tweet, user};
use crate::migrations::Migrator;
use crate::repositories::{TweetRepository, UserRepository};

/// URL of a private in-memory SQLite database.
pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh in-memory SQLite database and run all migrations.
    ///
    /// The pool is capped at one connection, since every `:memory:`
    /// connection opens its own empty database.
    pub async fn new() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(SQLITE_MEMORY_URL);
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        Self::with_options(opt).await
    }

    /// Connect with custom options and run all migrations.
    pub async fn with_options(opt: ConnectOptions) -> Result<Self, DbErr> {
        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!(backend = ?conn.get_database_backend(), "Created test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Get a shared handle for constructing repositories.
    #[must_use]
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Insert a user with the given name and API key.
    pub async fn create_user(&self, name: &str, api_key: &str) -> Result<user::Model, DbErr> {
        let model = user::ActiveModel {
            name: Set(name.to_string()),
            api_key: Set(api_key.to_string()),
            ..Default::default()
        };

        UserRepository::new(self.shared())
            .create(model)
            .await
            .map_err(|e| DbErr::Custom(e.to_string()))
    }

    /// Insert a tweet without media.
    pub async fn create_tweet(&self, author_id: i32, content: &str) -> Result<tweet::Model, DbErr> {
        TweetRepository::new(self.shared())
            .create_with_media(author_id, content, &[])
            .await
            .map_err(|e| DbErr::Custom(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_database_has_schema() {
        let db = TestDatabase::new().await.unwrap();
        let user = db.create_user("alice", "key-a").await.unwrap();

        assert_eq!(user.name, "alice");
        assert!(user.id > 0);
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let first = TestDatabase::new().await.unwrap();
        first.create_user("alice", "key-a").await.unwrap();

        // Same API key is accepted because the second database is empty
        let second = TestDatabase::new().await.unwrap();
        assert!(second.create_user("alice", "key-a").await.is_ok());
    }
}
