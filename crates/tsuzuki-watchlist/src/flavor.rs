//! The contract every tracking-service adapter implements.

use std::future::Future;

use tsuzuki_core::models::{Action, NormalizedItem, WatchStatus};

use crate::error::FlavorError;

/// Account data resolved by [`WatchlistFlavor::login`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginData {
    pub user_id: u64,
}

/// A pluggable watchlist adapter for one tracking service.
pub trait WatchlistFlavor: Send + Sync {
    /// Identifier used in navigation targets, e.g. `anilist`.
    fn name(&self) -> &'static str;

    /// Display name of the service.
    fn title(&self) -> &'static str;

    /// Logo URL of the service.
    fn image(&self) -> &'static str;

    /// Resolve the configured account to its numeric user id.
    ///
    /// `Ok(None)` when the service rejects the lookup.
    fn login(&self) -> impl Future<Output = Result<Option<LoginData>, FlavorError>> + Send;

    /// Status menu: one drill-down item per watch status, in menu order.
    fn watchlist(&self) -> Vec<NormalizedItem> {
        status_menu(self.name())
    }

    /// Items of one status list. Failures degrade to an empty list.
    fn get_watchlist_status(
        &self,
        status: WatchStatus,
    ) -> impl Future<Output = Vec<NormalizedItem>> + Send;

    /// Progress write-back, marking the media as currently watched.
    ///
    /// Nothing is sent until the returned future is awaited, so the caller
    /// decides when (and whether) the remote side effect happens. The result
    /// of the request is logged, never returned.
    fn watchlist_update(&self, media_id: u64, episode: u32) -> impl Future<Output = ()> + Send;
}

/// Status menu items for a provider.
pub fn status_menu(provider: &str) -> Vec<NormalizedItem> {
    WatchStatus::ALL
        .iter()
        .map(|&status| {
            NormalizedItem::new(
                status.label(),
                Action::WatchlistStatusType {
                    provider: provider.to_string(),
                    status,
                },
            )
        })
        .collect()
}
