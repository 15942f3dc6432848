use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::database::Database;
use crate::error::StoreError;

/// Maximum message length in characters, counted after trimming.
pub const MAX_TEXT_LEN: usize = 280;

/// How many entries a plain listing returns.
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub text: String,
    pub created_at: String,
}

pub struct EntryRepo {
    db: Database,
}

impl EntryRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a new entry. Trims the text first; rejects empty or
    /// over-length input before anything touches the database. The insert
    /// and the read-back of the generated row happen under a single
    /// connection lock, so callers never observe a partial entry.
    #[instrument(skip(self, text))]
    pub fn create(&self, text: &str) -> Result<Entry, StoreError> {
        let trimmed = text.trim();
        let len = trimmed.chars().count();
        if len == 0 || len > MAX_TEXT_LEN {
            return Err(StoreError::Validation(format!(
                "Text must be between 1 and {MAX_TEXT_LEN} characters"
            )));
        }

        self.db.with_conn(|conn| {
            let now = Utc::now().to_rfc3339();
            conn.execute(
                "INSERT INTO entries (text, created_at) VALUES (?1, ?2)",
                rusqlite::params![trimmed, now],
            )?;

            let id = conn.last_insert_rowid();
            let entry = conn.query_row(
                "SELECT id, text, created_at FROM entries WHERE id = ?1",
                [id],
                |row| {
                    Ok(Entry {
                        id: row.get(0)?,
                        text: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )?;
            Ok(entry)
        })
    }

    /// List the newest entries, most recent first. The id tiebreak keeps
    /// ordering stable when two rows share a timestamp.
    #[instrument(skip(self))]
    pub fn list_latest(&self, limit: u32) -> Result<Vec<Entry>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, created_at FROM entries
                 ORDER BY created_at DESC, id DESC LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit as i64], |row| {
                    Ok(Entry {
                        id: row.get(0)?,
                        text: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
