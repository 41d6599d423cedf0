//! Database repositories.

pub mod follower;
pub mod like;
pub mod media;
pub mod tweet;
pub mod user;

pub use follower::FollowerRepository;
pub use like::LikeRepository;
pub use media::MediaRepository;
pub use tweet::TweetRepository;
pub use user::UserRepository;
