mod episode;
mod item;
mod status;

pub use episode::{EpisodeRecord, LocalShow};
pub use item::{Action, InfoLabels, MediaType, NormalizedItem, ParseActionError};
pub use status::{sort_code, status_list, SortKey, UnknownStatus, WatchStatus};
