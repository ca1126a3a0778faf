//! Eviction of cached episode metadata for shows that are still airing.
//!
//! A releasing show gains episodes after its rows were cached. The guard
//! compares the fetch stamp of the first cached row with the date exactly
//! [`STALE_AFTER_DAYS`] ago and drops the show's rows on that day only, so the
//! next lookup refetches them. It is a point-in-time check, not a window.

use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

use crate::metadata::EpisodeStore;

pub const STALE_AFTER_DAYS: i64 = 5;

/// The `YYYY-MM-DD` stamp that marks a cache as stale on `today`.
pub fn stale_boundary(today: NaiveDate) -> String {
    (today - Duration::days(STALE_AFTER_DAYS))
        .format("%Y-%m-%d")
        .to_string()
}

/// Evict the cached episodes of `show_id` if they were stamped exactly on the
/// stale boundary. Returns whether an eviction happened.
///
/// The stamp is read from and the eviction applied to the same show. Read and
/// delete failures are logged and swallowed.
pub fn invalidate_if_stale<S>(store: &S, show_id: u64, today: NaiveDate) -> bool
where
    S: EpisodeStore + ?Sized,
{
    let boundary = stale_boundary(today);

    let episodes = match store.list_episodes(show_id) {
        Ok(episodes) => episodes,
        Err(e) => {
            debug!(show_id, error = %e, "Episode cache unreadable, skipping staleness check");
            return false;
        }
    };
    let Some(first) = episodes.first() else {
        return false;
    };
    if first.last_updated != boundary {
        return false;
    }

    match store.remove_episodes(show_id) {
        Ok(()) => {
            info!(show_id, stamp = %boundary, "Evicted stale episode cache");
            true
        }
        Err(e) => {
            warn!(show_id, error = %e, "Failed to evict stale episode cache");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::error::TsuzukiError;
    use crate::models::EpisodeRecord;
    use crate::storage::Storage;

    #[derive(Default)]
    struct FakeStore {
        episodes: HashMap<u64, Vec<EpisodeRecord>>,
        removed: Mutex<Vec<u64>>,
        fail_reads: bool,
    }

    impl FakeStore {
        fn with_stamp(mut self, show_id: u64, stamp: &str) -> Self {
            self.episodes.insert(show_id, vec![record(show_id, stamp)]);
            self
        }

        fn removed(&self) -> Vec<u64> {
            self.removed.lock().unwrap().clone()
        }
    }

    impl EpisodeStore for FakeStore {
        fn list_episodes(&self, show_id: u64) -> Result<Vec<EpisodeRecord>, TsuzukiError> {
            if self.fail_reads {
                return Err(TsuzukiError::NotFound(format!("show {show_id}")));
            }
            Ok(self.episodes.get(&show_id).cloned().unwrap_or_default())
        }

        fn remove_episodes(&self, show_id: u64) -> Result<(), TsuzukiError> {
            self.removed.lock().unwrap().push(show_id);
            Ok(())
        }
    }

    fn record(show_id: u64, stamp: &str) -> EpisodeRecord {
        EpisodeRecord {
            show_id,
            number: 1,
            title: None,
            thumb: None,
            plot: None,
            aired: None,
            last_updated: stamp.into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_boundary_is_five_days_back() {
        assert_eq!(stale_boundary(today()), "2026-10-14");
        let new_year = NaiveDate::from_ymd_opt(2027, 1, 3).unwrap();
        assert_eq!(stale_boundary(new_year), "2026-12-29");
    }

    #[test]
    fn test_evicts_exactly_once_on_boundary() {
        let store = FakeStore::default().with_stamp(21, "2026-10-14");
        assert!(invalidate_if_stale(&store, 21, today()));
        assert_eq!(store.removed(), [21]);
    }

    #[test]
    fn test_other_stamps_do_not_evict() {
        for stamp in ["2026-10-13", "2026-10-15", "2026-10-19", "2026-10-14 00:00:00"] {
            let store = FakeStore::default().with_stamp(21, stamp);
            assert!(!invalidate_if_stale(&store, 21, today()), "stamp {stamp}");
            assert!(store.removed().is_empty());
        }
    }

    #[test]
    fn test_uncached_or_unreadable_show_is_ignored() {
        let store = FakeStore::default();
        assert!(!invalidate_if_stale(&store, 21, today()));

        let store = FakeStore {
            fail_reads: true,
            ..FakeStore::default()
        }
        .with_stamp(21, "2026-10-14");
        assert!(!invalidate_if_stale(&store, 21, today()));
        assert!(store.removed().is_empty());
    }

    #[test]
    fn test_stamp_and_eviction_use_same_show() {
        // A stale stamp on an unrelated show must not evict this one.
        let store = FakeStore::default()
            .with_stamp(116006, "2026-10-14")
            .with_stamp(21, "2026-10-18");
        assert!(!invalidate_if_stale(&store, 21, today()));
        assert!(store.removed().is_empty());

        // And a stale stamp on this show evicts this show only.
        assert!(invalidate_if_stale(&store, 116006, today()));
        assert_eq!(store.removed(), [116006]);
    }

    #[test]
    fn test_evicts_sqlite_cache() {
        let db = Storage::open_memory().unwrap();
        db.save_episodes(&[record(21, "2026-10-14"), record(22, "2026-10-14")])
            .unwrap();

        assert!(invalidate_if_stale(&db, 21, today()));
        assert!(db.list_episodes(21).unwrap().is_empty());
        assert_eq!(db.list_episodes(22).unwrap().len(), 1);
    }
}
