//! Core business logic for the microblog backend.

pub mod services;

pub use services::*;
