use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::TsuzukiError;
use crate::metadata::{EpisodeMeta, EpisodeStore, NextUpMeta, NextUpSource, ShowMeta};
use crate::models::{EpisodeRecord, LocalShow};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

/// SQLite-backed show and episode cache.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, TsuzukiError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, TsuzukiError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves SQLite itself consistent.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Shows ───────────────────────────────────────────────────

    /// Insert a show or refresh its ids, title and artwork.
    pub fn upsert_show(&self, show: &LocalShow) -> Result<(), TsuzukiError> {
        self.conn().execute(
            "INSERT INTO shows (anilist_id, mal_id, kitsu_id, title, fanart, poster)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(anilist_id) DO UPDATE SET
                mal_id = excluded.mal_id,
                kitsu_id = excluded.kitsu_id,
                title = excluded.title,
                fanart = excluded.fanart,
                poster = excluded.poster,
                updated_at = datetime('now')",
            params![
                show.anilist_id as i64,
                show.mal_id.map(|v| v as i64),
                show.kitsu_id.map(|v| v as i64),
                show.title,
                show.fanart,
                show.poster,
            ],
        )?;
        Ok(())
    }

    pub fn get_show(&self, anilist_id: u64) -> Result<Option<LocalShow>, TsuzukiError> {
        self.conn()
            .query_row(
                "SELECT anilist_id, mal_id, kitsu_id, title, fanart, poster
                 FROM shows WHERE anilist_id = ?1",
                params![anilist_id as i64],
                |row| Ok(row_to_show(row)),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find a show by any alias of a `|`-delimited title list
    /// (case-insensitive, first alias with a hit wins).
    pub fn find_show_by_title(&self, aliases: &str) -> Result<Option<LocalShow>, TsuzukiError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT anilist_id, mal_id, kitsu_id, title, fanart, poster
             FROM shows WHERE title LIKE ?1 ORDER BY anilist_id LIMIT 1",
        )?;
        for alias in aliases.split('|').map(str::trim).filter(|a| !a.is_empty()) {
            let found = stmt
                .query_row(params![alias], |row| Ok(row_to_show(row)))
                .optional()?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    // ── Episodes ────────────────────────────────────────────────

    /// Replace cached rows for the given episodes.
    pub fn save_episodes(&self, episodes: &[EpisodeRecord]) -> Result<(), TsuzukiError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO episodes
                 (anilist_id, number, title, thumb, plot, aired, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for ep in episodes {
                stmt.execute(params![
                    ep.show_id as i64,
                    ep.number,
                    ep.title,
                    ep.thumb,
                    ep.plot,
                    ep.aired,
                    ep.last_updated,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_episode(
        &self,
        show_id: u64,
        number: u32,
    ) -> Result<Option<EpisodeRecord>, TsuzukiError> {
        self.conn()
            .query_row(
                "SELECT anilist_id, number, title, thumb, plot, aired, last_updated
                 FROM episodes WHERE anilist_id = ?1 AND number = ?2",
                params![show_id as i64, number],
                |row| Ok(row_to_episode(row)),
            )
            .optional()
            .map_err(Into::into)
    }
}

impl EpisodeStore for Storage {
    fn list_episodes(&self, show_id: u64) -> Result<Vec<EpisodeRecord>, TsuzukiError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT anilist_id, number, title, thumb, plot, aired, last_updated
             FROM episodes WHERE anilist_id = ?1 ORDER BY number",
        )?;
        let rows = stmt
            .query_map(params![show_id as i64], |row| Ok(row_to_episode(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    fn remove_episodes(&self, show_id: u64) -> Result<(), TsuzukiError> {
        let removed = self.conn().execute(
            "DELETE FROM episodes WHERE anilist_id = ?1",
            params![show_id as i64],
        )?;
        tracing::debug!(show_id, removed, "Removed cached episodes");
        Ok(())
    }
}

impl NextUpSource for Storage {
    fn next_up_meta(
        &self,
        hint: &str,
        progress: u32,
        remote_id: u64,
    ) -> Result<NextUpMeta, TsuzukiError> {
        let show = match self.get_show(remote_id)? {
            Some(show) => Some(show),
            None if !hint.is_empty() => self.find_show_by_title(hint)?,
            None => None,
        };
        let Some(show) = show else {
            return Ok(NextUpMeta::default());
        };

        let episode = self
            .get_episode(show.anilist_id, progress.saturating_add(1))?
            .map(|ep| EpisodeMeta {
                title: ep.title,
                thumb: ep.thumb,
            });

        Ok(NextUpMeta {
            show_meta: ShowMeta {
                fanart: show.fanart.clone(),
            },
            show: Some(show),
            episode,
        })
    }
}

// ── Migrations ──────────────────────────────────────────────────

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), TsuzukiError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}

// ── Row mapping helpers ─────────────────────────────────────────

fn row_to_show(row: &rusqlite::Row<'_>) -> LocalShow {
    LocalShow {
        anilist_id: row.get::<_, i64>(0).unwrap_or(0) as u64,
        mal_id: row
            .get::<_, Option<i64>>(1)
            .unwrap_or(None)
            .map(|v| v as u64),
        kitsu_id: row
            .get::<_, Option<i64>>(2)
            .unwrap_or(None)
            .map(|v| v as u64),
        title: row.get(3).unwrap_or_default(),
        fanart: row.get(4).unwrap_or(None),
        poster: row.get(5).unwrap_or(None),
    }
}

fn row_to_episode(row: &rusqlite::Row<'_>) -> EpisodeRecord {
    EpisodeRecord {
        show_id: row.get::<_, i64>(0).unwrap_or(0) as u64,
        number: row.get(1).unwrap_or(0),
        title: row.get(2).unwrap_or(None),
        thumb: row.get(3).unwrap_or(None),
        plot: row.get(4).unwrap_or(None),
        aired: row.get(5).unwrap_or(None),
        last_updated: row.get(6).unwrap_or_default(),
    }
}
