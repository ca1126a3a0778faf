use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::traits::{AiringStatus, FuzzyDate, MediaFormat, RemoteEntry, RemoteTitles};

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
}

/// Deserialize an optional field, turning a value of the wrong shape into
/// `None` instead of failing the whole entry.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// ── User lookup ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "User")]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: u64,
}

// ── User list queries ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaListCollectionResponse {
    #[serde(rename = "MediaListCollection")]
    pub media_list_collection: Option<MediaListCollection>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListCollection {
    #[serde(default)]
    pub lists: Vec<MediaListGroup>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListGroup {
    #[serde(default)]
    pub entries: Vec<MediaListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub progress: Option<u32>,
    pub media: AniListMedia,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListMedia {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub id_mal: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<AniListTitle>,
    #[serde(default, deserialize_with = "lenient")]
    pub cover_image: Option<CoverImage>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_date: Option<FuzzyDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub synonyms: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub episodes: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub genres: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListTitle {
    pub user_preferred: Option<String>,
    pub romaji: Option<String>,
    pub english: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub extra_large: Option<String>,
}

// ── Progress mutation ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveMediaListEntryResponse {
    #[serde(rename = "SaveMediaListEntry")]
    pub saved: Option<SavedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SavedEntry {
    pub id: u64,
    pub progress: Option<u32>,
    pub status: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

fn map_anilist_format(format: &str) -> MediaFormat {
    match format {
        "MOVIE" => MediaFormat::Movie,
        _ => MediaFormat::Series,
    }
}

impl MediaListCollectionResponse {
    /// Entries of the first list group, in service order. A user without
    /// entries for a status has no groups at all.
    pub fn into_entries(self) -> Vec<MediaListEntry> {
        self.media_list_collection
            .and_then(|c| c.lists.into_iter().next())
            .map(|group| group.entries)
            .unwrap_or_default()
    }
}

impl MediaListEntry {
    pub fn into_remote_entry(self) -> RemoteEntry {
        let media = self.media;
        let titles = media
            .title
            .map(|t| RemoteTitles {
                preferred: t.user_preferred,
                romaji: t.romaji,
                english: t.english,
            })
            .unwrap_or_default();

        RemoteEntry {
            media_id: media.id,
            secondary_id: media.id_mal,
            progress: self.progress.unwrap_or(0),
            episodes: media.episodes,
            format: media
                .format
                .as_deref()
                .map(map_anilist_format)
                .unwrap_or(MediaFormat::Series),
            airing_status: media.status.as_deref().and_then(AiringStatus::from_code),
            titles,
            synonyms: media.synonyms.unwrap_or_default(),
            cover_image: media.cover_image.and_then(|c| c.extra_large),
            synopsis: media.description,
            genres: media.genres,
            duration: media.duration,
            start_date: media.start_date,
            list_status: self.status,
        }
    }
}
