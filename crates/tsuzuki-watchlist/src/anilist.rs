//! AniList flavor.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use tsuzuki_api::anilist::types::MediaListEntry;
use tsuzuki_api::anilist::{AniListClient, AniListError, MediaListQuery};
use tsuzuki_api::arm::ArmClient;
use tsuzuki_api::traits::{AiringStatus, RemoteEntry, Transport};
use tsuzuki_core::cache_guard;
use tsuzuki_core::config::AniListConfig;
use tsuzuki_core::metadata::{EpisodeStore, NextUpSource};
use tsuzuki_core::models::{NormalizedItem, SortKey, WatchStatus};

use crate::error::FlavorError;
use crate::flavor::{LoginData, WatchlistFlavor};
use crate::view;

pub const NAME: &str = "anilist";
pub const TITLE: &str = "AniList";
pub const IMAGE: &str = "https://anilist.co/img/icons/logo_full.png";

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Watchlist adapter for AniList, joined with the local episode database.
pub struct AniListFlavor<T, S> {
    client: AniListClient<T>,
    arm: ArmClient<T>,
    store: S,
    username: String,
    user_id: Option<u64>,
    sort: SortKey,
    show_progress: bool,
    clock: fn() -> NaiveDate,
}

impl<T, S> AniListFlavor<T, S>
where
    T: Transport + Clone,
    S: EpisodeStore + NextUpSource,
{
    pub fn from_config(transport: T, store: S, config: &AniListConfig) -> Self {
        Self {
            client: AniListClient::new(transport.clone(), config.access_token.clone()),
            arm: ArmClient::new(transport),
            store,
            username: config.username.clone(),
            user_id: config.user_id,
            sort: config.sort,
            show_progress: true,
            clock: local_today,
        }
    }

    /// Replace the date source of the episode cache guard.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    /// Whether status list names carry `progress/total`.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Entries of one status list, most recent first.
    ///
    /// Unlike [`WatchlistFlavor::get_watchlist_status`] this keeps a failed
    /// request apart from an empty list.
    pub async fn fetch_status(&self, status: WatchStatus) -> Result<Vec<RemoteEntry>, FlavorError> {
        let query = MediaListQuery {
            user_id: self.user_id,
            username: &self.username,
            status: status.code(),
            sort: self.sort.code(),
        };
        let mut entries: Vec<RemoteEntry> = self
            .client
            .media_list(&query)
            .await?
            .into_iter()
            .map(MediaListEntry::into_remote_entry)
            .collect();

        // Service order is ascending by entry id.
        entries.reverse();
        debug!(status = status.code(), count = entries.len(), "Fetched AniList status list");
        Ok(entries)
    }

    /// Turn fetched entries into items, evicting stale episode caches of
    /// releasing shows first.
    pub fn process_status_view(&self, entries: &[RemoteEntry], next_up: bool) -> Vec<NormalizedItem> {
        let today = (self.clock)();
        entries
            .iter()
            .map(|entry| {
                if entry.airing_status == Some(AiringStatus::Releasing) {
                    cache_guard::invalidate_if_stale(&self.store, entry.media_id, today);
                }
                if next_up {
                    let meta = self
                        .store
                        .next_up_meta("", entry.progress, entry.media_id)
                        .unwrap_or_else(|e| {
                            warn!(media_id = entry.media_id, error = %e, "Next-up metadata lookup failed");
                            Default::default()
                        });
                    view::to_next_up_item(entry, &meta)
                } else {
                    view::to_view_item(entry, self.show_progress)
                }
            })
            .collect()
    }

    /// AniList id of a Kitsu media. A missing mapping is an error.
    pub async fn resolve_kitsu_id(&self, kitsu_id: &str) -> Result<u64, FlavorError> {
        Ok(self.arm.kitsu_to_anilist(kitsu_id).await?)
    }
}

impl<T, S> WatchlistFlavor for AniListFlavor<T, S>
where
    T: Transport + Clone,
    S: EpisodeStore + NextUpSource,
{
    fn name(&self) -> &'static str {
        NAME
    }

    fn title(&self) -> &'static str {
        TITLE
    }

    fn image(&self) -> &'static str {
        IMAGE
    }

    async fn login(&self) -> Result<Option<LoginData>, FlavorError> {
        match self.client.user_id(&self.username).await {
            Ok(user_id) => {
                info!(username = %self.username, user_id, "Resolved AniList user");
                Ok(Some(LoginData { user_id }))
            }
            Err(AniListError::GraphQl { message, .. }) => {
                warn!(username = %self.username, %message, "AniList rejected user lookup");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_watchlist_status(&self, status: WatchStatus) -> Vec<NormalizedItem> {
        match self.fetch_status(status).await {
            Ok(entries) => self.process_status_view(&entries, status.is_next_up()),
            Err(e) => {
                warn!(status = status.code(), error = %e, "AniList status list unavailable");
                Vec::new()
            }
        }
    }

    async fn watchlist_update(&self, media_id: u64, episode: u32) {
        match self
            .client
            .save_progress(media_id, episode, WatchStatus::Current.code())
            .await
        {
            Ok(()) => info!(media_id, episode, "AniList progress updated"),
            Err(e) => warn!(media_id, episode, error = %e, "AniList progress update failed"),
        }
    }
}
