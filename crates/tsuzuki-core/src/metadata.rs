//! Collaborator seams for locally cached show and episode metadata.
//!
//! [`crate::storage::Storage`] implements both traits; flavors only see the
//! traits so tests can substitute in-memory fakes.

use std::sync::Arc;

use crate::error::TsuzukiError;
use crate::models::{EpisodeRecord, LocalShow};

/// Per-show episode cache.
pub trait EpisodeStore: Send + Sync {
    /// Cached episodes for a show, ordered by episode number.
    fn list_episodes(&self, show_id: u64) -> Result<Vec<EpisodeRecord>, TsuzukiError>;

    /// Drop every cached episode for a show so the next lookup refetches.
    fn remove_episodes(&self, show_id: u64) -> Result<(), TsuzukiError>;
}

/// Artwork known for a local show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowMeta {
    pub fanart: Option<String>,
}

/// Title and thumbnail of the episode after the user's progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeMeta {
    pub title: Option<String>,
    pub thumb: Option<String>,
}

/// Answer of a next-up lookup. `show` is `None` when the remote id has no
/// local match; the other parts are then empty as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NextUpMeta {
    pub show: Option<LocalShow>,
    pub show_meta: ShowMeta,
    pub episode: Option<EpisodeMeta>,
}

/// Resolves what a user should watch after `progress` episodes.
pub trait NextUpSource: Send + Sync {
    fn next_up_meta(
        &self,
        hint: &str,
        progress: u32,
        remote_id: u64,
    ) -> Result<NextUpMeta, TsuzukiError>;
}

impl<T: EpisodeStore + ?Sized> EpisodeStore for Arc<T> {
    fn list_episodes(&self, show_id: u64) -> Result<Vec<EpisodeRecord>, TsuzukiError> {
        (**self).list_episodes(show_id)
    }

    fn remove_episodes(&self, show_id: u64) -> Result<(), TsuzukiError> {
        (**self).remove_episodes(show_id)
    }
}

impl<T: NextUpSource + ?Sized> NextUpSource for Arc<T> {
    fn next_up_meta(
        &self,
        hint: &str,
        progress: u32,
        remote_id: u64,
    ) -> Result<NextUpMeta, TsuzukiError> {
        (**self).next_up_meta(hint, progress, remote_id)
    }
}
