use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::status::WatchStatus;

/// What kind of list entry the rendering layer should expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    TvShow,
    Movie,
    Episode,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TvShow => "tvshow",
            Self::Movie => "movie",
            Self::Episode => "episode",
        }
    }
}

/// Metadata bag attached to every item. Absent fields are omitted, never
/// defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aired: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub mediatype: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvshowtitle: Option<String>,
}

/// One entry handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub name: String,
    pub action: Action,
    pub image: Option<String>,
    pub info: InfoLabels,
    /// `false` for leaf actions that start playback instead of opening a menu.
    pub selectable: bool,
}

impl NormalizedItem {
    pub fn new(name: impl Into<String>, action: Action) -> Self {
        Self {
            name: name.into(),
            action,
            image: None,
            info: InfoLabels::default(),
            selectable: true,
        }
    }

    /// Turn the item into a direct playback entry.
    pub fn make_leaf(&mut self, action: Action, mediatype: MediaType) {
        self.action = action;
        self.info.mediatype = mediatype;
        self.selectable = false;
    }
}

/// Navigation target understood by the router, encoded as `action/a/b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Action {
    /// `play/{show_id}/{episode}`
    Play { show_id: u64, episode: u32 },
    /// `play_movie/{media_id}/{episode}`
    PlayMovie { media_id: u64, episode: u32 },
    /// `watchlist_query/{media_id}/{secondary_id}`
    WatchlistQuery {
        media_id: u64,
        secondary_id: Option<u64>,
    },
    /// `watchlist_status_type/{provider}/{status route code}`
    WatchlistStatusType {
        provider: String,
        status: WatchStatus,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("malformed parameters for {action}: {raw}")]
    Malformed { action: String, raw: String },
}

// The router has always received Python's rendering of a missing id.
const MISSING_ID: &str = "None";

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Play { show_id, episode } => write!(f, "play/{show_id}/{episode}"),
            Self::PlayMovie { media_id, episode } => {
                write!(f, "play_movie/{media_id}/{episode}")
            }
            Self::WatchlistQuery {
                media_id,
                secondary_id,
            } => match secondary_id {
                Some(id) => write!(f, "watchlist_query/{media_id}/{id}"),
                None => write!(f, "watchlist_query/{media_id}/{MISSING_ID}"),
            },
            Self::WatchlistStatusType { provider, status } => {
                write!(f, "watchlist_status_type/{provider}/{}", status.route_code())
            }
        }
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        let malformed = || ParseActionError::Malformed {
            action: parts[0].to_string(),
            raw: s.to_string(),
        };

        if parts.len() != 3 {
            return match parts[0] {
                "play" | "play_movie" | "watchlist_query" | "watchlist_status_type" => {
                    Err(malformed())
                }
                other => Err(ParseActionError::UnknownAction(other.to_string())),
            };
        }

        match parts[0] {
            "play" => Ok(Self::Play {
                show_id: parts[1].parse().map_err(|_| malformed())?,
                episode: parts[2].parse().map_err(|_| malformed())?,
            }),
            "play_movie" => Ok(Self::PlayMovie {
                media_id: parts[1].parse().map_err(|_| malformed())?,
                episode: parts[2].parse().map_err(|_| malformed())?,
            }),
            "watchlist_query" => Ok(Self::WatchlistQuery {
                media_id: parts[1].parse().map_err(|_| malformed())?,
                secondary_id: match parts[2] {
                    MISSING_ID => None,
                    id => Some(id.parse().map_err(|_| malformed())?),
                },
            }),
            "watchlist_status_type" => Ok(Self::WatchlistStatusType {
                provider: parts[1].to_string(),
                status: WatchStatus::from_route_code(parts[2]).ok_or_else(malformed)?,
            }),
            other => Err(ParseActionError::UnknownAction(other.to_string())),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl TryFrom<String> for Action {
    type Error = ParseActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
