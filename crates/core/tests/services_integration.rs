//! Service behaviour against a migrated in-memory SQLite database.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use microblog_common::{AppError, LocalStorage};
use microblog_core::{FollowerService, LikeService, MediaService, TweetService, UserService};
use microblog_db::entities::{Like, Media};
use microblog_db::repositories::{
    FollowerRepository, LikeRepository, MediaRepository, TweetRepository, UserRepository,
};
use microblog_db::test_utils::TestDatabase;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

struct Services {
    db: TestDatabase,
    follows: FollowerService,
    likes: LikeService,
    media: MediaService,
    tweets: TweetService,
    users: UserService,
    media_dir: PathBuf,
}

async fn setup() -> Services {
    let db = TestDatabase::new().await.unwrap();
    let conn = db.shared();

    let user_repo = UserRepository::new(Arc::clone(&conn));
    let tweet_repo = TweetRepository::new(Arc::clone(&conn));
    let media_repo = MediaRepository::new(Arc::clone(&conn));
    let like_repo = LikeRepository::new(Arc::clone(&conn));
    let follower_repo = FollowerRepository::new(conn);

    let media_dir = std::env::temp_dir().join(format!("microblog-core-{}", uuid::Uuid::new_v4()));
    let storage = Arc::new(LocalStorage::new(media_dir.clone(), "/media".to_string()));

    Services {
        follows: FollowerService::new(follower_repo.clone()),
        likes: LikeService::new(like_repo.clone()),
        media: MediaService::new(media_repo.clone(), storage),
        tweets: TweetService::new(
            tweet_repo,
            media_repo,
            like_repo,
            follower_repo.clone(),
            user_repo.clone(),
        ),
        users: UserService::new(user_repo, follower_repo),
        db,
        media_dir,
    }
}

#[tokio::test]
async fn test_create_tweet_issues_distinct_ids() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();

    let mut ids = Vec::new();
    for text in ["one", "two", "three"] {
        ids.push(s.tweets.create_tweet(alice.id, text, &[]).await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_blank_tweet_writes_nothing() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();

    let result = s.tweets.create_tweet(alice.id, "  ", &[]).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let bob = s.users.create_user("bob", "b").await.unwrap();
    s.follows.follow(bob.id, alice.id).await.unwrap();
    assert!(s.tweets.get_feed(bob.id).await.is_empty());
}

#[tokio::test]
async fn test_like_is_idempotent() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();
    let tweet_id = s.tweets.create_tweet(alice.id, "hi", &[]).await.unwrap();

    s.likes.add_like(tweet_id, alice.id).await.unwrap();
    s.likes.add_like(tweet_id, alice.id).await.unwrap();

    let count = Like::find().count(s.db.connection()).await.unwrap();
    assert_eq!(count, 1);

    s.likes.remove_like(tweet_id, alice.id).await.unwrap();
    s.likes.remove_like(tweet_id, alice.id).await.unwrap();

    let count = Like::find().count(s.db.connection()).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();
    let bob = s.users.create_user("bob", "b").await.unwrap();
    let tweet_id = s.tweets.create_tweet(alice.id, "mine", &[]).await.unwrap();
    s.follows.follow(bob.id, alice.id).await.unwrap();

    assert!(!s.tweets.delete_tweet(tweet_id, bob.id).await);
    assert!(!s.tweets.delete_tweet(tweet_id + 1000, alice.id).await);
    assert_eq!(s.tweets.get_feed(bob.id).await.len(), 1);

    assert!(s.tweets.delete_tweet(tweet_id, alice.id).await);
    assert!(s.tweets.get_feed(bob.id).await.is_empty());
}

#[tokio::test]
async fn test_feed_orders_by_likes() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();
    let bob = s.users.create_user("bob", "b").await.unwrap();
    let carol = s.users.create_user("carol", "c").await.unwrap();

    s.follows.follow(alice.id, bob.id).await.unwrap();

    let t1 = s.tweets.create_tweet(bob.id, "T1", &[]).await.unwrap();
    let t2 = s.tweets.create_tweet(bob.id, "T2", &[]).await.unwrap();
    s.tweets.create_tweet(carol.id, "unfollowed", &[]).await.unwrap();
    s.likes.add_like(t2, carol.id).await.unwrap();

    let feed = s.tweets.get_feed(alice.id).await;
    let ids: Vec<_> = feed.iter().map(|t| t.id).collect();

    assert_eq!(ids, vec![t2, t1]);
    assert_eq!(feed[0].author.name, "bob");
    assert_eq!(feed[0].likes.len(), 1);
    assert_eq!(feed[0].likes[0].name, "carol");

    // Like counts never increase down the feed
    s.likes.add_like(t1, alice.id).await.unwrap();
    s.likes.add_like(t1, carol.id).await.unwrap();
    let counts: Vec<_> = s
        .tweets
        .get_feed(alice.id)
        .await
        .iter()
        .map(|t| t.likes.len())
        .collect();
    assert_eq!(counts, vec![2, 1]);
}

#[tokio::test]
async fn test_feed_of_user_following_nobody() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();
    s.tweets.create_tweet(alice.id, "own tweet", &[]).await.unwrap();

    assert!(s.tweets.get_feed(alice.id).await.is_empty());
}

#[tokio::test]
async fn test_uploaded_media_shows_in_feed() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();
    let bob = s.users.create_user("bob", "b").await.unwrap();
    s.follows.follow(alice.id, bob.id).await.unwrap();

    let media_id = s.media.upload(Some("photo.jpg"), b"jpeg").await.unwrap();
    assert!(media_id > 0);

    s.tweets
        .create_tweet(bob.id, "look", &[media_id, 9999])
        .await
        .unwrap();

    let feed = s.tweets.get_feed(alice.id).await;
    assert_eq!(feed[0].attachments.len(), 1);
    assert!(feed[0].attachments[0].starts_with("/media/"));
    assert!(feed[0].attachments[0].ends_with(".jpg"));

    std::fs::remove_dir_all(&s.media_dir).ok();
}

#[tokio::test]
async fn test_rejected_upload_writes_no_row() {
    let s = setup().await;

    let result = s.media.upload(Some("payload.exe"), b"MZ").await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(Media::find().count(s.db.connection()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_profile_counts() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();
    let bob = s.users.create_user("bob", "b").await.unwrap();
    let carol = s.users.create_user("carol", "c").await.unwrap();

    s.follows.follow(bob.id, alice.id).await.unwrap();
    s.follows.follow(carol.id, alice.id).await.unwrap();
    s.follows.follow(alice.id, bob.id).await.unwrap();

    let profile = s.users.get_profile(alice.id).await.unwrap().unwrap();
    assert_eq!(profile.followers.len(), 2);
    assert_eq!(profile.following.len(), 1);
    assert_eq!(profile.following[0].id, bob.id);

    assert!(s.users.get_profile(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_user_removes_everything_it_owns() {
    let s = setup().await;
    let alice = s.users.create_user("alice", "a").await.unwrap();
    let bob = s.users.create_user("bob", "b").await.unwrap();

    let alice_tweet = s.tweets.create_tweet(alice.id, "bye", &[]).await.unwrap();
    let bob_tweet = s.tweets.create_tweet(bob.id, "stay", &[]).await.unwrap();
    s.likes.add_like(bob_tweet, alice.id).await.unwrap();
    s.likes.add_like(alice_tweet, bob.id).await.unwrap();
    s.follows.follow(alice.id, bob.id).await.unwrap();
    s.follows.follow(bob.id, alice.id).await.unwrap();

    assert!(s.users.delete_user(alice.id).await.unwrap());
    assert!(!s.users.delete_user(alice.id).await.unwrap());

    let bob_profile = s.users.get_profile(bob.id).await.unwrap().unwrap();
    assert!(bob_profile.followers.is_empty());
    assert!(bob_profile.following.is_empty());

    let likes_by_alice = Like::find()
        .filter(microblog_db::entities::like::Column::UserId.eq(alice.id))
        .count(s.db.connection())
        .await
        .unwrap();
    assert_eq!(likes_by_alice, 0);
    assert_eq!(Like::find().count(s.db.connection()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_ensure_user_is_keyed_by_api_key() {
    let s = setup().await;

    let first = s.users.ensure_user("demo", "test").await.unwrap();
    let second = s.users.ensure_user("renamed", "test").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "demo");
    assert_eq!(
        s.users.authenticate("test").await.unwrap().map(|u| u.id),
        Some(first.id)
    );
    assert!(s.users.authenticate("nope").await.unwrap().is_none());
}
