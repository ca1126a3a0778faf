use thiserror::Error;

use crate::traits::TransportError;

/// Errors from the ARM id-mapping client.
#[derive(Debug, Error)]
pub enum ArmError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid lookup URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no mapping found: {0}")]
    NotFound(String),
}
