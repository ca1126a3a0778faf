use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::AniListError;
use super::types::{
    GraphQLResponse, MediaListCollectionResponse, MediaListEntry, SaveMediaListEntryResponse,
    UserResponse,
};
use crate::traits::Transport;

pub const API_URL: &str = "https://graphql.anilist.co";

const USER_ID_QUERY: &str = r#"
query ($name: String) {
    User(name: $name) {
        id
    }
}
"#;

const STATUS_LIST_QUERY: &str = r#"
query ($userId: Int, $userName: String, $status: MediaListStatus, $type: MediaType, $sort: [MediaListSort]) {
    MediaListCollection(userId: $userId, userName: $userName, status: $status, type: $type, sort: $sort) {
        lists {
            entries {
                ...mediaListEntry
            }
        }
    }
}

fragment mediaListEntry on MediaList {
    id
    mediaId
    status
    progress
    customLists
    media {
        id
        idMal
        title { userPreferred romaji english }
        coverImage { extraLarge }
        startDate { year month day }
        description
        synonyms
        format
        status
        episodes
        genres
        duration
    }
}
"#;

const SAVE_PROGRESS_MUTATION: &str = r#"
mutation ($mediaId: Int, $progress: Int, $status: MediaListStatus) {
    SaveMediaListEntry(mediaId: $mediaId, progress: $progress, status: $status) {
        id
        progress
        status
    }
}
"#;

/// Parameters of a status-scoped list query.
#[derive(Debug, Clone, Copy)]
pub struct MediaListQuery<'a> {
    /// Sent as `null` before the user id is known; the name alone suffices.
    pub user_id: Option<u64>,
    pub username: &'a str,
    /// `MediaListStatus` code, e.g. `CURRENT`.
    pub status: &'a str,
    /// `MediaListSort` code, e.g. `UPDATED_TIME`.
    pub sort: &'a str,
}

/// AniList GraphQL API client.
pub struct AniListClient<T> {
    transport: T,
    access_token: Option<String>,
}

impl<T: Transport> AniListClient<T> {
    pub fn new(transport: T, access_token: Option<String>) -> Self {
        Self {
            transport,
            access_token,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn graphql_request<R: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
        authorized: bool,
    ) -> Result<R, AniListError> {
        debug!(operation, "AniList GraphQL request");

        let bearer;
        let mut headers = vec![
            ("Content-Type", "application/json"),
            ("Accept", "application/json"),
        ];
        if authorized {
            let token = self
                .access_token
                .as_deref()
                .ok_or(AniListError::MissingToken)?;
            bearer = format!("Bearer {token}");
            headers.push(("Authorization", bearer.as_str()));
        }

        let resp = self
            .transport
            .post_json(
                API_URL,
                &headers,
                &serde_json::json!({
                    "query": query,
                    "variables": variables,
                }),
            )
            .await?;

        // AniList reports GraphQL failures (unknown user, bad token) in the
        // body, usually together with a 4xx status.
        if let Some(errors) = resp
            .body
            .get("errors")
            .and_then(|e| e.as_array())
            .filter(|e| !e.is_empty())
        {
            let message = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join("; ");
            warn!(operation, status = resp.status, %message, "AniList GraphQL error");
            return Err(AniListError::GraphQl {
                status: resp.status,
                message,
            });
        }

        if !resp.is_success() {
            warn!(operation, status = resp.status, "AniList API error");
            return Err(AniListError::Api {
                status: resp.status,
                message: resp.body.to_string(),
            });
        }

        debug!(operation, status = resp.status, "AniList response received");
        let parsed: GraphQLResponse<R> =
            serde_json::from_value(resp.body).map_err(|e| AniListError::Parse(e.to_string()))?;
        parsed
            .data
            .ok_or_else(|| AniListError::Parse(format!("{operation}: response has no data")))
    }

    /// Numeric id of a user, looked up by name.
    pub async fn user_id(&self, username: &str) -> Result<u64, AniListError> {
        let resp: UserResponse = self
            .graphql_request(
                "User",
                USER_ID_QUERY,
                serde_json::json!({ "name": username }),
                false,
            )
            .await?;
        resp.user
            .map(|u| u.id)
            .ok_or_else(|| AniListError::Parse(format!("no user named {username}")))
    }

    /// Entries of one status list, in the order the service returns them.
    pub async fn media_list(
        &self,
        query: &MediaListQuery<'_>,
    ) -> Result<Vec<MediaListEntry>, AniListError> {
        let resp: MediaListCollectionResponse = self
            .graphql_request(
                "MediaListCollection",
                STATUS_LIST_QUERY,
                serde_json::json!({
                    "userId": query.user_id,
                    "userName": query.username,
                    "status": query.status,
                    "type": "ANIME",
                    "sort": [query.sort],
                }),
                false,
            )
            .await?;
        Ok(resp.into_entries())
    }

    /// Set the watched episode count and list status of a media.
    pub async fn save_progress(
        &self,
        media_id: u64,
        progress: u32,
        status: &str,
    ) -> Result<(), AniListError> {
        let resp: SaveMediaListEntryResponse = self
            .graphql_request(
                "SaveMediaListEntry",
                SAVE_PROGRESS_MUTATION,
                serde_json::json!({
                    "mediaId": media_id,
                    "progress": progress,
                    "status": status,
                }),
                true,
            )
            .await?;
        if let Some(saved) = resp.saved {
            debug!(
                entry_id = saved.id,
                progress = ?saved.progress,
                status = ?saved.status,
                "AniList list entry saved"
            );
        }
        Ok(())
    }
}
