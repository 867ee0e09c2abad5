//! Process-wide key/value store for tracker credentials.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::PreferenceError;

const SCHEMA_V1: &str = include_str!("../../../migrations/001_preferences.sql");

/// A string key/value store. Last writer wins.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    fn delete(&self, key: &str) -> Result<(), PreferenceError>;
}

pub fn track_token_key(tracker_id: i64) -> String {
    format!("track_token_{tracker_id}")
}

pub fn track_username_key(tracker_id: i64) -> String {
    format!("pref_mangasync_username_{tracker_id}")
}

pub fn track_password_key(tracker_id: i64) -> String {
    format!("pref_mangasync_password_{tracker_id}")
}

// ── In-memory ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .write()
            .map_err(|_| PreferenceError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.values
            .write()
            .map_err(|_| PreferenceError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

// ── SQLite ──────────────────────────────────────────────────────

/// SQLite-backed preference store.
pub struct SqlitePreferences {
    conn: Mutex<Connection>,
}

impl SqlitePreferences {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, PreferenceError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA_V1)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, PreferenceError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_V1)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, PreferenceError> {
        let conn = self.conn.lock().map_err(|_| PreferenceError::Poisoned)?;
        Ok(f(&conn)?)
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str) -> Option<String> {
        let value = self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
        });

        match value {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read preference");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
        })?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn PreferenceStore) {
        assert_eq!(store.get("missing"), None);

        store.set("track_token_4", "first").unwrap();
        assert_eq!(store.get("track_token_4").as_deref(), Some("first"));

        // Overwrite.
        store.set("track_token_4", "second").unwrap();
        assert_eq!(store.get("track_token_4").as_deref(), Some("second"));

        store.delete("track_token_4").unwrap();
        assert_eq!(store.get("track_token_4"), None);

        // Deleting an absent key is not an error.
        store.delete("track_token_4").unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryPreferences::new());
    }

    #[test]
    fn test_sqlite_memory_store() {
        exercise(&SqlitePreferences::open_memory().unwrap());
    }

    #[test]
    fn test_sqlite_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");

        {
            let store = SqlitePreferences::open(&path).unwrap();
            store.set(&track_username_key(4), "12345").unwrap();
        }

        let store = SqlitePreferences::open(&path).unwrap();
        assert_eq!(store.get(&track_username_key(4)).as_deref(), Some("12345"));
    }

    #[test]
    fn test_keys_are_scoped_by_tracker() {
        assert_eq!(track_token_key(4), "track_token_4");
        assert_ne!(track_username_key(4), track_username_key(1));
        assert_ne!(track_username_key(4), track_password_key(4));
    }
}
