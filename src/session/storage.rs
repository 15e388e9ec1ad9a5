//! Persistent session tracking
//!
//! A session is a named, append-only set of words that were already put on a
//! printed sheet. Schema:
//! ```text
//! sessions       (session_id, session_name UNIQUE, created_at)
//! words          (word_id, word UNIQUE)
//! session_words  (session_id, word_id, recorded_at)  PRIMARY KEY (session_id, word_id)
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use super::models::SessionSummary;

#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, SessionStoreError>;

/// Read/append access to named sessions.
///
/// Words are compared by their trimmed text. Recording a word that is
/// already in the session is a no-op, never an error. Errors are reserved
/// for storage failures.
pub trait SessionStore {
    /// All words recorded in a session; empty for an unknown session
    fn seen_words(&self, session: &str) -> Result<HashSet<String>>;

    fn is_word_in_session(&self, session: &str, word: &str) -> Result<bool>;

    /// Record one word, creating the session on first use.
    /// Returns whether the word was new to the session.
    fn record_word(&self, session: &str, word: &str) -> Result<bool>;

    /// Record several words, returning how many were new
    fn record_words(&self, session: &str, words: &[&str]) -> Result<usize> {
        let mut added = 0;
        for word in words {
            if self.record_word(session, word)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>>;
}

/// SQLite-backed session store
pub struct SqliteSessionStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteSessionStore {
    /// Open (or create) the session database at the given path.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        Self::init(&conn)?;
        log::debug!("Opened session database {:?}", db_path);

        Ok(Self {
            conn,
            db_path: Some(db_path),
        })
    }

    /// Private in-memory database, gone when the store is dropped
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self { conn, db_path: None })
    }

    /// Default database location (e.g., ~/.local/share/flashsheet/sessions.db)
    pub fn default_db_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("flashsheet").join("sessions.db"))
            .ok_or(SessionStoreError::DataDirNotFound)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS sessions (
                session_id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS words (
                word_id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS session_words (
                session_id INTEGER NOT NULL REFERENCES sessions(session_id),
                word_id INTEGER NOT NULL REFERENCES words(word_id),
                recorded_at TEXT NOT NULL,
                PRIMARY KEY (session_id, word_id)
            );
            "#,
        )?;
        Ok(())
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Insert every word in one transaction; either all are stored or none.
    fn insert_words(&self, session: &str, words: &[&str]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let now = Self::now();

        tx.execute(
            "INSERT OR IGNORE INTO sessions (session_name, created_at) VALUES (?1, ?2)",
            params![session, now],
        )?;
        let session_id: i64 = tx.query_row(
            "SELECT session_id FROM sessions WHERE session_name = ?1",
            params![session],
            |row| row.get(0),
        )?;

        let mut added = 0;
        {
            let mut insert_word = tx.prepare_cached("INSERT OR IGNORE INTO words (word) VALUES (?1)")?;
            let mut word_id = tx.prepare_cached("SELECT word_id FROM words WHERE word = ?1")?;
            let mut link = tx.prepare_cached(
                "INSERT OR IGNORE INTO session_words (session_id, word_id, recorded_at) VALUES (?1, ?2, ?3)",
            )?;

            for word in words {
                let word = word.trim();
                insert_word.execute(params![word])?;
                let id: i64 = word_id.query_row(params![word], |row| row.get(0))?;
                added += link.execute(params![session_id, id, now])?;
            }
        }

        tx.commit()?;
        Ok(added)
    }
}

impl SessionStore for SqliteSessionStore {
    fn seen_words(&self, session: &str) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.word FROM words w
             JOIN session_words sw ON sw.word_id = w.word_id
             JOIN sessions s ON s.session_id = sw.session_id
             WHERE s.session_name = ?1",
        )?;

        let words = stmt
            .query_map(params![session], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(words)
    }

    fn is_word_in_session(&self, session: &str, word: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM session_words sw
                 JOIN sessions s ON s.session_id = sw.session_id
                 JOIN words w ON w.word_id = sw.word_id
                 WHERE s.session_name = ?1 AND w.word = ?2",
                params![session, word.trim()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn record_word(&self, session: &str, word: &str) -> Result<bool> {
        Ok(self.insert_words(session, &[word])? == 1)
    }

    fn record_words(&self, session: &str, words: &[&str]) -> Result<usize> {
        if words.is_empty() {
            return Ok(0);
        }
        self.insert_words(session, words)
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.session_name, COUNT(sw.word_id), MAX(sw.recorded_at)
             FROM sessions s
             LEFT JOIN session_words sw ON sw.session_id = s.session_id
             GROUP BY s.session_id
             ORDER BY s.session_name",
        )?;

        let sessions = stmt
            .query_map([], |row| {
                let last: Option<String> = row.get(2)?;
                Ok(SessionSummary {
                    name: row.get(0)?,
                    word_count: row.get::<_, i64>(1)? as usize,
                    last_recorded: last
                        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SqliteSessionStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteSessionStore::open(temp_dir.path().join("data").join("sessions.db")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let (store, _temp) = create_test_store();

        assert!(store.seen_words("nope").unwrap().is_empty());
        assert!(!store.is_word_in_session("nope", "Haus").unwrap());
        assert!(store.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_record_and_lookup() {
        let (store, _temp) = create_test_store();

        assert!(store.record_word("german", "der Hund").unwrap());
        assert!(store.record_word("german", "die Katze").unwrap());

        let seen = store.seen_words("german").unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("der Hund"));
        assert!(store.is_word_in_session("german", "die Katze").unwrap());
        assert!(!store.is_word_in_session("german", "das Haus").unwrap());
    }

    #[test]
    fn test_duplicate_record_is_noop() {
        let (store, _temp) = create_test_store();

        assert!(store.record_word("s", "Baum").unwrap());
        assert!(!store.record_word("s", "Baum").unwrap());
        assert_eq!(store.seen_words("s").unwrap().len(), 1);

        let added = store.record_words("s", &["Baum", "Blume", "Blume"]).unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.seen_words("s").unwrap().len(), 2);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let (store, _temp) = create_test_store();

        store.record_word("a", "eins").unwrap();
        store.record_word("b", "zwei").unwrap();
        store.record_word("b", "eins").unwrap();

        assert_eq!(store.seen_words("a").unwrap().len(), 1);
        assert_eq!(store.seen_words("b").unwrap().len(), 2);
        assert!(!store.is_word_in_session("a", "zwei").unwrap());
    }

    #[test]
    fn test_words_compare_trimmed() {
        let (store, _temp) = create_test_store();

        store.record_word("kurs", " das Haus ").unwrap();
        assert!(store.is_word_in_session("kurs", "das Haus").unwrap());
        assert!(store.is_word_in_session("kurs", "  das Haus").unwrap());
        assert!(store.seen_words("kurs").unwrap().contains("das Haus"));
        assert!(!store.record_word("kurs", "das Haus").unwrap());
    }

    #[test]
    fn test_db_path() {
        let (store, temp) = create_test_store();
        assert_eq!(store.db_path(), Some(temp.path().join("data").join("sessions.db").as_path()));
        assert!(temp.path().join("data").join("sessions.db").exists());

        let memory = SqliteSessionStore::open_in_memory().unwrap();
        assert_eq!(memory.db_path(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sessions.db");

        {
            let store = SqliteSessionStore::open(path.clone()).unwrap();
            store.record_words("kurs", &["gehen", "kommen"]).unwrap();
        }

        let store = SqliteSessionStore::open(path).unwrap();
        let seen = store.seen_words("kurs").unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("kommen"));
    }

    #[test]
    fn test_list_sessions() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        store.record_words("zeta", &["x", "y"]).unwrap();
        store.record_word("alpha", "z").unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].name, "alpha");
        assert_eq!(sessions[0].word_count, 1);
        assert_eq!(sessions[1].name, "zeta");
        assert_eq!(sessions[1].word_count, 2);
        assert!(sessions[1].last_recorded.is_some());
    }

    #[test]
    fn test_empty_batch_does_not_create_session() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        assert_eq!(store.record_words("ghost", &[]).unwrap(), 0);
        assert!(store.list_sessions().unwrap().is_empty());
    }
}
