use serde::{Deserialize, Serialize};

/// A show known to the local episode database, keyed by its AniList id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalShow {
    pub anilist_id: u64,
    pub mal_id: Option<u64>,
    pub kitsu_id: Option<u64>,
    pub title: String,
    pub fanart: Option<String>,
    pub poster: Option<String>,
}

/// A cached episode row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub show_id: u64,
    pub number: u32,
    pub title: Option<String>,
    pub thumb: Option<String>,
    pub plot: Option<String>,
    pub aired: Option<String>,
    /// Date the row was fetched, `YYYY-MM-DD`.
    pub last_updated: String,
}
