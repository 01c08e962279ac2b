use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use twenty48_core::engine::Score;

use super::{Result, ScoreStore, StorageError};
use crate::ranking::{RankingEntry, RANKING_CAPACITY};

const HIGH_SCORE_KEY: &str = "high_score";

/// SQLite-backed store with `meta` and `ranking` tables.
///
/// Schema:
/// - meta(meta_key TEXT PRIMARY KEY, meta_value TEXT)
/// - ranking(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, score INT)
///
/// Ranking inserts and the capped top-N delete run in one transaction, so a
/// reader never sees more than five rows or a half-applied insert.
pub struct SqliteStore {
    db_path: Option<PathBuf>,
    conn: Connection,
}

impl SqliteStore {
    /// Create or open the database at `path`, ensure schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&db_path)?;
        // journal_mode answers with the resulting mode; the row is not needed.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::with_connection(conn, Some(db_path))
    }

    /// Private database that disappears with the value.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        // Create schema if missing
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                meta_key TEXT PRIMARY KEY,
                meta_value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS ranking (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                score INT NOT NULL
            );
            "#,
        )?;
        Ok(Self { db_path, conn })
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

impl ScoreStore for SqliteStore {
    fn high_score(&self) -> Result<Score> {
        let raw = self
            .conn
            .query_row(
                "SELECT meta_value FROM meta WHERE meta_key = ?1",
                params![HIGH_SCORE_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        match raw {
            None => Ok(0),
            Some(text) => text.parse::<Score>().map_err(|e| {
                StorageError::CorruptedData(format!("high score {text:?}: {e}"))
            }),
        }
    }

    fn set_high_score(&mut self, score: Score) -> Result<()> {
        self.conn.execute(
            "INSERT INTO meta (meta_key, meta_value) VALUES (?1, ?2)
             ON CONFLICT(meta_key) DO UPDATE SET meta_value=excluded.meta_value",
            params![HIGH_SCORE_KEY, score.to_string()],
        )?;
        debug!("stored high score {score}");
        Ok(())
    }

    fn ranking(&self) -> Result<Vec<RankingEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, score FROM ranking ORDER BY score DESC, id ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![RANKING_CAPACITY as i64], |row| {
            Ok(RankingEntry {
                id: row.get::<_, i64>(0)? as u64,
                name: row.get(1)?,
                score: row.get::<_, i64>(2)? as u64,
            })
        })?;
        let entries = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn insert_ranking_entry(&mut self, name: &str, score: Score) -> Result<Vec<RankingEntry>> {
        let score = i64::try_from(score)
            .map_err(|_| StorageError::CorruptedData(format!("score {score} out of range")))?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO ranking (name, score) VALUES (?1, ?2)",
            params![name, score],
        )?;
        let evicted = tx.execute(
            "DELETE FROM ranking WHERE id NOT IN (
                SELECT id FROM ranking ORDER BY score DESC, id ASC LIMIT ?1
             )",
            params![RANKING_CAPACITY as i64],
        )?;
        tx.commit()?;
        debug!("stored ranking entry {name:?} ({score}), evicted {evicted}");
        self.ranking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scores(ranking: &[RankingEntry]) -> Vec<Score> {
        ranking.iter().map(|e| e.score).collect()
    }

    #[test]
    fn high_score_roundtrip_survives_reopen() {
        let td = tempdir().unwrap();
        let path = td.path().join("nested").join("scores.db");
        {
            let mut store = SqliteStore::open(&path).expect("open store");
            assert_eq!(store.high_score().unwrap(), 0);
            store.set_high_score(1024).unwrap();
            store.set_high_score(2048).unwrap();
            assert_eq!(store.db_path(), Some(path.as_path()));
        }
        let store = SqliteStore::open(&path).expect("reopen store");
        assert_eq!(store.high_score().unwrap(), 2048);
    }

    #[test]
    fn ranking_insert_caps_at_five() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for (i, score) in [500, 400, 300, 200, 100].into_iter().enumerate() {
            store.insert_ranking_entry(&format!("p{i}"), score).unwrap();
        }
        let ranking = store.insert_ranking_entry("new", 350).unwrap();
        assert_eq!(scores(&ranking), vec![500, 400, 350, 300, 200]);
        assert_eq!(ranking[2].name, "new");

        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM ranking", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn non_qualifying_insert_is_evicted_immediately() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for score in [500, 400, 300, 200, 100] {
            store.insert_ranking_entry("p", score).unwrap();
        }
        let before = store.ranking().unwrap();
        let after = store.insert_ranking_entry("low", 50).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn ties_are_ordered_by_insertion() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert_ranking_entry("first", 256).unwrap();
        store.insert_ranking_entry("top", 512).unwrap();
        let ranking = store.insert_ranking_entry("second", 256).unwrap();
        let names: Vec<_> = ranking.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["top", "first", "second"]);
        assert!(ranking[1].id < ranking[2].id);
    }

    #[test]
    fn corrupted_high_score_is_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO meta (meta_key, meta_value) VALUES (?1, 'lots')",
                params![HIGH_SCORE_KEY],
            )
            .unwrap();
        assert!(matches!(
            store.high_score(),
            Err(StorageError::CorruptedData(_))
        ));
    }
}
