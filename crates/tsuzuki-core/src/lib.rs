pub mod cache_guard;
pub mod config;
pub mod error;
pub mod metadata;
pub mod models;
pub mod storage;
