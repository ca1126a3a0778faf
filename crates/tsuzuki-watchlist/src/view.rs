//! Turning remote list entries into [`NormalizedItem`]s.
//!
//! Every optional field is copied independently through [`fill`]: a missing
//! or malformed source value leaves the target untouched and never fails the
//! item.

use tsuzuki_api::traits::{MediaFormat, RemoteEntry};
use tsuzuki_core::metadata::NextUpMeta;
use tsuzuki_core::models::{Action, InfoLabels, MediaType, NormalizedItem};

/// Upper bound on aliases handed to title matching.
pub const MAX_ALIASES: usize = 3;

/// Synonyms appended to a series' titles before filtering.
const MAX_SYNONYMS: usize = 2;

/// Store `value` in `slot` when there is one, keep the old contents otherwise.
fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn progress_label(entry: &RemoteEntry) -> String {
    format!(
        "{} - {}/{}",
        entry.titles.display(),
        entry.progress,
        entry.episodes_or_zero()
    )
}

fn query_action(entry: &RemoteEntry) -> Action {
    Action::WatchlistQuery {
        media_id: entry.media_id,
        secondary_id: entry.secondary_id,
    }
}

fn movie_action(entry: &RemoteEntry) -> Action {
    Action::PlayMovie {
        media_id: entry.media_id,
        episode: 1,
    }
}

/// Show-level metadata bag of an entry.
pub fn series_info(entry: &RemoteEntry) -> InfoLabels {
    let mut info = InfoLabels::default();
    fill(&mut info.genre, entry.genres.clone());
    fill(&mut info.plot, entry.synopsis.clone());
    fill(&mut info.title, entry.titles.preferred.clone());
    fill(&mut info.duration, entry.duration.and_then(|m| m.checked_mul(60)));
    fill(&mut info.aired, entry.start_date.and_then(|d| d.to_iso()));
    fill(
        &mut info.status,
        entry.airing_status.map(|s| s.as_str().to_string()),
    );
    info
}

/// Drill-down item for a status list row.
///
/// Single-episode movies become a direct play action instead.
pub fn to_view_item(entry: &RemoteEntry, show_progress: bool) -> NormalizedItem {
    let name = if show_progress {
        progress_label(entry)
    } else {
        entry.titles.display().to_string()
    };

    let mut item = NormalizedItem::new(name, query_action(entry));
    item.image = entry.cover_image.clone();
    item.info = series_info(entry);

    if entry.is_single_movie() {
        item.make_leaf(movie_action(entry), MediaType::Movie);
    }
    item
}

/// "Press play" item for the episode after the user's progress.
///
/// With a local show match the item plays the next episode directly.
/// Without one it degrades to the movie leaf or the show-level menu entry.
pub fn to_next_up_item(entry: &RemoteEntry, meta: &NextUpMeta) -> NormalizedItem {
    let next_episode = entry.progress.saturating_add(1);
    let mut name = progress_label(entry);
    let mut image = entry.cover_image.clone();
    let mut play = None;

    if let Some(show) = &meta.show {
        name = format!("Ep. {next_episode}/{}", entry.episodes_or_zero());
        play = Some(Action::Play {
            show_id: show.anilist_id,
            episode: next_episode,
        });
        fill(&mut image, meta.show_meta.fanart.clone());

        // The thumbnail is only trusted alongside a title.
        if let Some(episode) = &meta.episode {
            if let Some(title) = &episode.title {
                name = format!("{name} - {title}");
                fill(&mut image, episode.thumb.clone());
            }
        }
    }

    let mut item = NormalizedItem::new(name.clone(), query_action(entry));
    item.image = image;
    fill(&mut item.info.genre, entry.genres.clone());
    item.info.episode = Some(next_episode);
    item.info.title = Some(name);
    item.info.tvshowtitle = Some(entry.titles.display().to_string());

    if let Some(action) = play {
        item.make_leaf(action, MediaType::Episode);
    } else if entry.is_single_movie() {
        item.make_leaf(movie_action(entry), MediaType::Movie);
    }
    item
}

/// `|`-joined ASCII aliases of an entry for fuzzy matching local metadata.
///
/// Series use their distinct titles plus two synonyms; movies use every
/// title variant. Non-ASCII titles are dropped and at most
/// [`MAX_ALIASES`] survive.
pub fn title_aliases(entry: &RemoteEntry) -> String {
    let titles = entry.titles.variants().into_iter().flatten();

    let candidates: Vec<&str> = if entry.format == MediaFormat::Movie {
        titles.collect()
    } else {
        let mut unique: Vec<&str> = Vec::new();
        for title in titles {
            if !unique.contains(&title) {
                unique.push(title);
            }
        }
        unique.extend(entry.synonyms.iter().take(MAX_SYNONYMS).map(String::as_str));
        unique
    };

    candidates
        .into_iter()
        .filter(|t| !t.is_empty() && t.is_ascii())
        .take(MAX_ALIASES)
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use tsuzuki_api::traits::{AiringStatus, FuzzyDate, RemoteTitles};
    use tsuzuki_core::metadata::{EpisodeMeta, ShowMeta};
    use tsuzuki_core::models::LocalShow;

    use super::*;

    fn frieren(progress: u32) -> RemoteEntry {
        RemoteEntry {
            media_id: 154587,
            secondary_id: Some(52991),
            progress,
            episodes: Some(28),
            format: MediaFormat::Series,
            airing_status: Some(AiringStatus::Finished),
            titles: RemoteTitles {
                preferred: Some("Sousou no Frieren".into()),
                romaji: Some("Sousou no Frieren".into()),
                english: Some("Frieren: Beyond Journey's End".into()),
            },
            synonyms: vec!["Frieren at the Funeral".into(), "葬送のフリーレン".into()],
            cover_image: Some("https://example.com/cover/154587.jpg".into()),
            synopsis: Some("The adventure is over but life goes on.".into()),
            genres: Some(vec!["Adventure".into(), "Drama".into()]),
            duration: Some(24),
            start_date: Some(FuzzyDate {
                year: Some(2023),
                month: Some(9),
                day: Some(29),
            }),
            list_status: Some("CURRENT".into()),
        }
    }

    fn movie() -> RemoteEntry {
        RemoteEntry {
            media_id: 199,
            secondary_id: Some(199),
            progress: 0,
            episodes: Some(1),
            format: MediaFormat::Movie,
            airing_status: Some(AiringStatus::Finished),
            titles: RemoteTitles {
                preferred: Some("Sen to Chihiro no Kamikakushi".into()),
                romaji: Some("Sen to Chihiro no Kamikakushi".into()),
                english: Some("Spirited Away".into()),
            },
            synonyms: vec![],
            cover_image: None,
            synopsis: None,
            genres: None,
            duration: Some(125),
            start_date: None,
            list_status: Some("PLANNING".into()),
        }
    }

    fn local_show() -> LocalShow {
        LocalShow {
            anilist_id: 154587,
            mal_id: Some(52991),
            kitsu_id: None,
            title: "Sousou no Frieren".into(),
            fanart: Some("https://example.com/fanart/154587.jpg".into()),
            poster: None,
        }
    }

    #[test]
    fn test_view_item_series() {
        let mut entry = frieren(5);
        entry.episodes = Some(12);
        let item = to_view_item(&entry, true);

        assert_eq!(item.name, "Sousou no Frieren - 5/12");
        assert!(item.name.ends_with("5/12"));
        assert_eq!(item.action.to_string(), "watchlist_query/154587/52991");
        assert_eq!(item.image.as_deref(), Some("https://example.com/cover/154587.jpg"));
        assert!(item.selectable);
        assert_eq!(item.info.mediatype, MediaType::TvShow);
        assert_eq!(item.info.duration, Some(1440));
        assert_eq!(item.info.aired.as_deref(), Some("2023-09-29"));
        assert_eq!(item.info.status.as_deref(), Some("FINISHED"));
        assert_eq!(item.info.title.as_deref(), Some("Sousou no Frieren"));
        assert_eq!(item.info.genre.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_view_item_unknown_total_is_zero() {
        let mut entry = frieren(7);
        entry.episodes = None;
        let item = to_view_item(&entry, true);
        assert!(item.name.ends_with("/0"));
        assert_eq!(item.name, "Sousou no Frieren - 7/0");
    }

    #[test]
    fn test_view_item_without_progress() {
        let item = to_view_item(&frieren(7), false);
        assert_eq!(item.name, "Sousou no Frieren");
    }

    #[test]
    fn test_view_item_partial_metadata() {
        let mut entry = frieren(1);
        entry.genres = None;
        entry.synopsis = None;
        entry.duration = None;
        entry.airing_status = None;
        entry.secondary_id = None;
        entry.start_date = Some(FuzzyDate {
            year: Some(2026),
            month: None,
            day: None,
        });

        let item = to_view_item(&entry, true);
        assert_eq!(item.info.genre, None);
        assert_eq!(item.info.plot, None);
        assert_eq!(item.info.duration, None);
        assert_eq!(item.info.aired, None);
        assert_eq!(item.info.status, None);
        assert_eq!(item.info.title.as_deref(), Some("Sousou no Frieren"));
        assert_eq!(item.action.to_string(), "watchlist_query/154587/None");
    }

    #[test]
    fn test_view_item_single_episode_movie() {
        let item = to_view_item(&movie(), true);
        assert_eq!(item.action.to_string(), "play_movie/199/1");
        assert_eq!(item.info.mediatype, MediaType::Movie);
        assert!(!item.selectable);
        assert_eq!(item.name, "Sen to Chihiro no Kamikakushi - 0/1");
    }

    #[test]
    fn test_multi_episode_movie_stays_a_menu() {
        let mut entry = movie();
        entry.episodes = Some(3);
        let item = to_view_item(&entry, true);
        assert_eq!(item.info.mediatype, MediaType::TvShow);
        assert!(item.selectable);
    }

    #[test]
    fn test_next_up_without_local_show() {
        let item = to_next_up_item(&frieren(5), &NextUpMeta::default());

        assert_eq!(item.name, "Sousou no Frieren - 5/28");
        assert_eq!(item.info.mediatype, MediaType::TvShow);
        assert!(item.selectable);
        assert_eq!(item.action.to_string(), "watchlist_query/154587/52991");
        assert_eq!(item.info.episode, Some(6));
        assert_eq!(item.info.title.as_deref(), Some("Sousou no Frieren - 5/28"));
        assert_eq!(item.info.tvshowtitle.as_deref(), Some("Sousou no Frieren"));
        assert_eq!(item.image.as_deref(), Some("https://example.com/cover/154587.jpg"));
    }

    #[test]
    fn test_next_up_with_local_show_and_episode() {
        let meta = NextUpMeta {
            show: Some(local_show()),
            show_meta: ShowMeta {
                fanart: local_show().fanart,
            },
            episode: Some(EpisodeMeta {
                title: Some("The Hero's Party".into()),
                thumb: Some("https://example.com/thumb/6.jpg".into()),
            }),
        };
        let item = to_next_up_item(&frieren(5), &meta);

        assert_eq!(item.name, "Ep. 6/28 - The Hero's Party");
        assert_eq!(item.action.to_string(), "play/154587/6");
        assert_eq!(item.info.mediatype, MediaType::Episode);
        assert!(!item.selectable);
        assert_eq!(item.image.as_deref(), Some("https://example.com/thumb/6.jpg"));
        assert_eq!(item.info.tvshowtitle.as_deref(), Some("Sousou no Frieren"));
    }

    #[test]
    fn test_next_up_local_show_without_episode_uses_fanart() {
        let meta = NextUpMeta {
            show: Some(local_show()),
            show_meta: ShowMeta {
                fanart: local_show().fanart,
            },
            episode: None,
        };
        let item = to_next_up_item(&frieren(27), &meta);
        assert_eq!(item.name, "Ep. 28/28");
        assert_eq!(item.image.as_deref(), Some("https://example.com/fanart/154587.jpg"));
    }

    #[test]
    fn test_next_up_episode_fields_are_best_effort() {
        // No fanart, no title: keep remote cover and plain name.
        let meta = NextUpMeta {
            show: Some(local_show()),
            show_meta: ShowMeta::default(),
            episode: Some(EpisodeMeta {
                title: None,
                thumb: Some("https://example.com/thumb/6.jpg".into()),
            }),
        };
        let item = to_next_up_item(&frieren(5), &meta);
        assert_eq!(item.name, "Ep. 6/28");
        assert_eq!(item.image.as_deref(), Some("https://example.com/cover/154587.jpg"));

        // Title without thumbnail: name changes, image stays.
        let meta = NextUpMeta {
            episode: Some(EpisodeMeta {
                title: Some("The Hero's Party".into()),
                thumb: None,
            }),
            ..meta
        };
        let item = to_next_up_item(&frieren(5), &meta);
        assert_eq!(item.name, "Ep. 6/28 - The Hero's Party");
        assert_eq!(item.image.as_deref(), Some("https://example.com/cover/154587.jpg"));
    }

    #[test]
    fn test_next_up_single_episode_movie() {
        let item = to_next_up_item(&movie(), &NextUpMeta::default());
        assert_eq!(item.action.to_string(), "play_movie/199/1");
        assert_eq!(item.info.mediatype, MediaType::Movie);
        assert!(!item.selectable);
        assert_eq!(item.info.episode, Some(1));
    }

    #[test]
    fn test_title_aliases_filters_and_caps() {
        let mut entry = frieren(0);
        entry.titles = RemoteTitles {
            preferred: Some("Title A".into()),
            romaji: Some("Título A".into()),
            english: Some("Unique".into()),
        };
        entry.synonyms = vec!["Syn1".into(), "Syn2".into(), "Syn3".into()];

        let aliases = title_aliases(&entry);
        assert_eq!(aliases, "Title A|Unique|Syn1");
        assert!(aliases.split('|').count() <= MAX_ALIASES);
        assert!(aliases.is_ascii());
    }

    #[test]
    fn test_title_aliases_dedupes_series_titles() {
        assert_eq!(
            title_aliases(&frieren(0)),
            "Sousou no Frieren|Frieren: Beyond Journey's End|Frieren at the Funeral"
        );
    }

    #[test]
    fn test_title_aliases_movie_ignores_synonyms() {
        let mut entry = movie();
        entry.synonyms = vec!["Chihiro".into()];
        assert_eq!(
            title_aliases(&entry),
            "Sen to Chihiro no Kamikakushi|Sen to Chihiro no Kamikakushi|Spirited Away"
        );
    }
}
