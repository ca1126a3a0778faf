//! Cross-service id lookup through the anime-relations mapping service (ARM).

pub mod client;
pub mod error;

pub use client::{ArmClient, Namespace};
pub use error::ArmError;
