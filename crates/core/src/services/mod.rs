//! Business logic services.

pub mod follower;
pub mod like;
pub mod media;
pub mod tweet;
pub mod user;

pub use follower::FollowerService;
pub use like::LikeService;
pub use media::MediaService;
pub use tweet::{FeedTweet, Liker, TweetService};
pub use user::{UserProfile, UserService, UserSummary};
