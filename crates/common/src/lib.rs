//! Common utilities and shared types for the microblog backend.
//!
//! This crate provides foundational components used across all crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Stored file names via [`IdGenerator`]
//! - **Storage**: Local media storage with an extension allow-list
//!
//! # Example
//!
//! ```no_run
//! use microblog_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     println!("{} -> {}", config.server.port, id_gen.generate_file_name(".png"));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{
    ALLOWED_EXTENSIONS, LocalStorage, StorageBackend, StoredFile, validate_extension,
};
