use tracing::debug;
use url::Url;

use super::error::ArmError;
use crate::traits::Transport;

pub const ARM_URL: &str = "https://arm.now.sh/api/v1/search";

/// Id namespaces ARM can map between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    AniList,
    AniDb,
    Kitsu,
    MyAnimeList,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AniList => "anilist",
            Self::AniDb => "anidb",
            Self::Kitsu => "kitsu",
            Self::MyAnimeList => "myanimelist",
        }
    }
}

/// Client for the ARM id-mapping service. One request per lookup, no retry.
pub struct ArmClient<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> ArmClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: ARM_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Map `id` from the `from` namespace into the `to` namespace.
    pub async fn resolve(&self, from: Namespace, id: &str, to: Namespace) -> Result<u64, ArmError> {
        let url = Url::parse_with_params(&self.base_url, &[("type", from.as_str()), ("id", id)])?;
        debug!(from = from.as_str(), id, "ARM lookup");

        let resp = self.transport.get_json(url.as_str()).await?;
        if !resp.is_success() {
            return Err(ArmError::NotFound(format!(
                "{} id {id} (status {})",
                from.as_str(),
                resp.status
            )));
        }

        let mapped = resp
            .body
            .get("services")
            .and_then(|s| s.get(to.as_str()))
            .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()));

        mapped.ok_or_else(|| {
            ArmError::NotFound(format!(
                "{} id {id} has no {} mapping",
                from.as_str(),
                to.as_str()
            ))
        })
    }

    /// AniList id of a Kitsu media.
    pub async fn kitsu_to_anilist(&self, kitsu_id: &str) -> Result<u64, ArmError> {
        self.resolve(Namespace::Kitsu, kitsu_id, Namespace::AniList)
            .await
    }
}
