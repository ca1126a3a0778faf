use thiserror::Error;

use crate::traits::TransportError;

/// Errors from the AniList API client.
#[derive(Debug, Error)]
pub enum AniListError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error (status {status}): {message}")]
    GraphQl { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no access token configured")]
    MissingToken,
}
