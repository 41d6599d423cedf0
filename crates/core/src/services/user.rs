//! User service: profiles, provisioning and API key lookup.

use microblog_common::AppResult;
use microblog_db::{
    entities::user,
    repositories::{FollowerRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    follower_repo: FollowerRepository,
}

/// ID and display name of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// User ID.
    pub id: i32,
    /// Display name.
    pub name: String,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    /// User ID.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Users following this user.
    pub followers: Vec<UserSummary>,
    /// Users this user follows.
    pub following: Vec<UserSummary>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, follower_repo: FollowerRepository) -> Self {
        Self {
            user_repo,
            follower_repo,
        }
    }

    /// Resolve an API key to its user.
    pub async fn authenticate(&self, api_key: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_api_key(api_key).await
    }

    /// Build the profile of a user, or `None` if there is no such user.
    pub async fn get_profile(&self, user_id: i32) -> AppResult<Option<UserProfile>> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let follower_ids = self.follower_repo.find_follower_ids(user_id).await?;
        let following_ids = self.follower_repo.find_following_ids(user_id).await?;

        let followers = self.summaries(&follower_ids).await?;
        let following = self.summaries(&following_ids).await?;

        Ok(Some(UserProfile {
            id: user.id,
            name: user.name,
            followers,
            following,
        }))
    }

    async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<UserSummary>> {
        let users = self.user_repo.find_by_ids(ids).await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    /// Create a user with the given API key.
    pub async fn create_user(&self, name: &str, api_key: &str) -> AppResult<user::Model> {
        let model = user::ActiveModel {
            name: Set(name.to_string()),
            api_key: Set(api_key.to_string()),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = user.id, name = %user.name, "User created");
        Ok(user)
    }

    /// Return the user holding `api_key`, creating it first if needed.
    pub async fn ensure_user(&self, name: &str, api_key: &str) -> AppResult<user::Model> {
        if let Some(existing) = self.user_repo.find_by_api_key(api_key).await? {
            tracing::debug!(user_id = existing.id, "User already provisioned");
            return Ok(existing);
        }
        self.create_user(name, api_key).await
    }

    /// Delete a user along with everything they own. Returns whether the
    /// user existed.
    pub async fn delete_user(&self, user_id: i32) -> AppResult<bool> {
        let deleted = self.user_repo.delete(user_id).await?;
        if deleted {
            tracing::info!(user_id, "User deleted");
        }
        Ok(deleted)
    }
}
