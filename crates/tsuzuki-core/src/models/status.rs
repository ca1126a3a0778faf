use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user's list membership for a show.
///
/// `NextUp` has no remote counterpart: it is the `Current` list viewed
/// through the next-episode resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchStatus {
    NextUp,
    Current,
    Rewatching,
    PlanToWatch,
    Paused,
    Completed,
    Dropped,
}

#[derive(Debug, Error)]
#[error("unknown watch status: {0}")]
pub struct UnknownStatus(pub String);

impl WatchStatus {
    /// Menu order. Callers fanning out over statuses must keep it.
    pub const ALL: &[WatchStatus] = &[
        Self::NextUp,
        Self::Current,
        Self::Rewatching,
        Self::PlanToWatch,
        Self::Paused,
        Self::Completed,
        Self::Dropped,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::NextUp => "Next Up",
            Self::Current => "Current",
            Self::Rewatching => "Rewatching",
            Self::PlanToWatch => "Plan to Watch",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
            Self::Dropped => "Dropped",
        }
    }

    /// AniList `MediaListStatus` value sent with list queries.
    pub fn code(self) -> &'static str {
        match self {
            Self::NextUp | Self::Current => "CURRENT",
            Self::Rewatching => "REPEATING",
            Self::PlanToWatch => "PLANNING",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
            Self::Dropped => "DROPPED",
        }
    }

    /// Status code as it appears in navigation targets.
    pub fn route_code(self) -> &'static str {
        match self {
            Self::NextUp => "CURRENT?next_up=true",
            other => other.code(),
        }
    }

    pub fn from_route_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.route_code() == code)
    }

    pub fn is_next_up(self) -> bool {
        matches!(self, Self::NextUp)
    }
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WatchStatus {
    type Err = UnknownStatus;

    /// Accepts labels ("Plan to Watch"), kebab/snake names (`plan-to-watch`)
    /// and route codes (`PLANNING`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(status) = Self::from_route_code(s) {
            return Ok(status);
        }
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|status| {
                let label: String = status
                    .label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                label == key
            })
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Ordered `(label, route code)` pairs for the status menu.
pub fn status_list() -> Vec<(&'static str, &'static str)> {
    WatchStatus::ALL
        .iter()
        .map(|s| (s.label(), s.route_code()))
        .collect()
}

/// List ordering offered in the UI, serialized by its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "Score")]
    Score,
    #[serde(rename = "Progress")]
    Progress,
    #[default]
    #[serde(rename = "Last Updated")]
    LastUpdated,
    #[serde(rename = "Last Added")]
    LastAdded,
}

impl SortKey {
    pub const ALL: &[SortKey] = &[
        Self::Score,
        Self::Progress,
        Self::LastUpdated,
        Self::LastAdded,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Score => "Score",
            Self::Progress => "Progress",
            Self::LastUpdated => "Last Updated",
            Self::LastAdded => "Last Added",
        }
    }

    /// AniList `MediaListSort` value.
    pub fn code(self) -> &'static str {
        match self {
            Self::Score => "SCORE",
            Self::Progress => "PROGRESS",
            Self::LastUpdated => "UPDATED_TIME",
            Self::LastAdded => "ADDED_TIME",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.label() == label)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Provider sort code for a UI sort label.
///
/// # Panics
///
/// Panics on a label outside [`SortKey::ALL`]. Labels must come from a
/// validated selection (config loading rejects unknown labels).
pub fn sort_code(label: &str) -> &'static str {
    match SortKey::from_label(label) {
        Some(key) => key.code(),
        None => panic!("no provider sort code for sort label {label:?}"),
    }
}
