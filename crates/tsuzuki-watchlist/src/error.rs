use thiserror::Error;
use tsuzuki_api::anilist::AniListError;
use tsuzuki_api::arm::ArmError;
use tsuzuki_core::error::TsuzukiError;

#[derive(Debug, Error)]
pub enum FlavorError {
    #[error(transparent)]
    AniList(#[from] AniListError),

    #[error(transparent)]
    Arm(ArmError),

    #[error(transparent)]
    Storage(#[from] TsuzukiError),

    #[error("not found: {0}")]
    NotFound(String),
}

impl From<ArmError> for FlavorError {
    fn from(e: ArmError) -> Self {
        match e {
            ArmError::NotFound(what) => Self::NotFound(what),
            other => Self::Arm(other),
        }
    }
}
