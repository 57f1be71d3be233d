use std::cell::Cell;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::app_dirs::AppDirs;
use crate::error::StoreError;

/// Key under which the best score is kept.
pub const HIGH_SCORE_KEY: &str = "ghostTypistHighScore";

/// Durable storage for the best score across sessions.
pub trait HighScoreStore {
    /// `Ok(None)` when no score has ever been stored.
    fn load(&self) -> Result<Option<u32>, StoreError>;

    fn persist(&self, score: u32) -> Result<(), StoreError>;
}

/// Key/value table in a SQLite database.
#[derive(Debug)]
pub struct SqliteHighScoreStore {
    conn: Connection,
}

impl SqliteHighScoreStore {
    /// Open the store at the default state location.
    pub fn new() -> Result<Self, StoreError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("ghost_typist.db"));
        Self::open(db_path)
    }

    /// Open (creating if needed) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        Ok(Self { conn })
    }

    /// Remove the stored score, as if the game had never been played.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", [HIGH_SCORE_KEY])?;
        Ok(())
    }
}

impl HighScoreStore for SqliteHighScoreStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [HIGH_SCORE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| StoreError::Corrupt(value))
        })
        .transpose()
    }

    fn persist(&self, score: u32) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![HIGH_SCORE_KEY, score.to_string()],
        )?;
        Ok(())
    }
}

/// Process-local store; optionally refuses every operation.
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    value: Cell<Option<u32>>,
    writes: Cell<usize>,
    unavailable: bool,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self {
            value: Cell::new(Some(score)),
            ..Self::default()
        }
    }

    /// A store whose reads and writes always fail.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<u32> {
        self.value.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Io(std::io::Error::other("store unavailable")));
        }
        Ok(self.value.get())
    }

    fn persist(&self, score: u32) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Io(std::io::Error::other("store unavailable")));
        }
        self.value.set(Some(score));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        (**self).load()
    }

    fn persist(&self, score: u32) -> Result<(), StoreError> {
        (**self).persist(score)
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for std::rc::Rc<S> {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        (**self).load()
    }

    fn persist(&self, score: u32) -> Result<(), StoreError> {
        (**self).persist(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn empty_store_has_no_score() {
        let store = SqliteHighScoreStore::in_memory().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn persist_overwrites_previous_score() {
        let store = SqliteHighScoreStore::in_memory().unwrap();
        store.persist(12).unwrap();
        store.persist(40).unwrap();

        assert_eq!(store.load().unwrap(), Some(40));
    }

    #[test]
    fn score_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.db");

        SqliteHighScoreStore::open(&path).unwrap().persist(77).unwrap();
        let reopened = SqliteHighScoreStore::open(&path).unwrap();

        assert_eq!(reopened.load().unwrap(), Some(77));
    }

    #[test]
    fn clear_removes_score() {
        let store = SqliteHighScoreStore::in_memory().unwrap();
        store.persist(5).unwrap();
        store.clear().unwrap();

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn corrupt_value_is_reported() {
        let store = SqliteHighScoreStore::in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, 'lots')",
                [HIGH_SCORE_KEY],
            )
            .unwrap();

        assert_matches!(store.load(), Err(StoreError::Corrupt(v)) if v == "lots");
    }

    #[test]
    fn unavailable_memory_store_fails_both_ways() {
        let store = MemoryHighScoreStore::unavailable();

        assert!(store.load().is_err());
        assert!(store.persist(3).is_err());
        assert_eq!(store.writes(), 0);
    }
}
