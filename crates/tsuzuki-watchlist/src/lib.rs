//! Watchlist flavors: one adapter per tracking service, all producing the
//! same [`NormalizedItem`](tsuzuki_core::models::NormalizedItem) views.

pub mod anilist;
pub mod error;
pub mod flavor;
pub mod view;

pub use anilist::AniListFlavor;
pub use error::FlavorError;
pub use flavor::{status_menu, LoginData, WatchlistFlavor};
