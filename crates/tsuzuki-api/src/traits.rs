//! Transport seam and the service-agnostic list entry.
//!
//! Service clients only talk to the network through [`Transport`], and
//! every tracking service converts its list rows into [`RemoteEntry`].

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Network-level failure. HTTP error statuses are not errors at this layer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A response with its body parsed as JSON (`Null` when it is not JSON).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// JSON-over-HTTP transport used by the service clients.
///
/// Implementations own request timeouts; callers never cancel.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    fn get_json(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).post_json(url, headers, body)
    }

    fn get_json(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).get_json(url)
    }
}

/// Format of a list entry's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaFormat {
    Series,
    Movie,
}

/// Publication state of a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiringStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
}

impl AiringStatus {
    /// Wire code, also shown to users as the status label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finished => "FINISHED",
            Self::Releasing => "RELEASING",
            Self::NotYetReleased => "NOT_YET_RELEASED",
            Self::Cancelled => "CANCELLED",
            Self::Hiatus => "HIATUS",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FINISHED" => Some(Self::Finished),
            "RELEASING" => Some(Self::Releasing),
            "NOT_YET_RELEASED" => Some(Self::NotYetReleased),
            "CANCELLED" => Some(Self::Cancelled),
            "HIATUS" => Some(Self::Hiatus),
            _ => None,
        }
    }
}

/// Localized title variants of a list entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteTitles {
    pub preferred: Option<String>,
    pub romaji: Option<String>,
    pub english: Option<String>,
}

impl RemoteTitles {
    /// The user's preferred title, falling back through the other variants.
    pub fn display(&self) -> &str {
        self.preferred
            .as_deref()
            .or(self.romaji.as_deref())
            .or(self.english.as_deref())
            .unwrap_or("Unknown")
    }

    /// Every variant in a stable order, including absent ones.
    pub fn variants(&self) -> [Option<&str>; 3] {
        [
            self.preferred.as_deref(),
            self.romaji.as_deref(),
            self.english.as_deref(),
        ]
    }
}

/// A date where any part may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// `YYYY-MM-DD`, only when every part is known.
    pub fn to_iso(&self) -> Option<String> {
        let (y, m, d) = (self.year?, self.month?, self.day?);
        Some(format!("{y:04}-{m:02}-{d:02}"))
    }
}

/// One row of a user's remote list, joined with its media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub media_id: u64,
    /// Id of the same media in the secondary namespace (MyAnimeList).
    pub secondary_id: Option<u64>,
    /// Episodes watched.
    pub progress: u32,
    /// Unknown while a show is still airing.
    pub episodes: Option<u32>,
    pub format: MediaFormat,
    pub airing_status: Option<AiringStatus>,
    pub titles: RemoteTitles,
    pub synonyms: Vec<String>,
    pub cover_image: Option<String>,
    pub synopsis: Option<String>,
    pub genres: Option<Vec<String>>,
    /// Minutes per episode.
    pub duration: Option<u32>,
    pub start_date: Option<FuzzyDate>,
    /// List membership as reported by the service (e.g. `CURRENT`).
    pub list_status: Option<String>,
}

impl RemoteEntry {
    /// A single-episode movie is played directly instead of opened as a show.
    pub fn is_single_movie(&self) -> bool {
        self.format == MediaFormat::Movie && self.episodes == Some(1)
    }

    pub fn episodes_or_zero(&self) -> u32 {
        self.episodes.unwrap_or(0)
    }
}
