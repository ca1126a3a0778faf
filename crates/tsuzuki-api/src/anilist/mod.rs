pub mod client;
pub mod error;
pub mod types;

pub use client::{AniListClient, MediaListQuery};
pub use error::AniListError;
