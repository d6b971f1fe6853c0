use chrono::Utc;
use rusqlite::OptionalExtension;
use tracing::debug;

use crate::errors::{HeadlineError, HeadlineResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::PayloadCache;

pub struct SqlitePayloadCache {
    storage: SqliteStorage,
}

impl SqlitePayloadCache {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    /// When the payload for `feed_key` was last saved (RFC 3339)
    pub fn saved_at(&self, feed_key: &str) -> HeadlineResult<Option<String>> {
        let conn = self.storage.connection()?;
        let saved_at = conn
            .query_row(
                "SELECT saved_at FROM payload_cache WHERE feed_key = ?1",
                [feed_key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(saved_at)
    }
}

impl PayloadCache for SqlitePayloadCache {
    fn read(&self, feed_key: &str) -> HeadlineResult<Option<String>> {
        let conn = self
            .storage
            .connection()
            .map_err(|e| HeadlineError::PersistenceReadFailure(e.to_string()))?;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM payload_cache WHERE feed_key = ?1",
                [feed_key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| HeadlineError::PersistenceReadFailure(e.to_string()))?;

        match payload {
            Some(p) if p.contains('\0') => Err(HeadlineError::PersistenceReadFailure(format!(
                "{}: binary content",
                feed_key
            ))),
            other => Ok(other),
        }
    }

    fn save(&self, feed_key: &str, payload: &str) -> HeadlineResult<()> {
        let conn = self
            .storage
            .connection()
            .map_err(|e| HeadlineError::PersistenceWriteFailure(e.to_string()))?;

        conn.execute(
            "INSERT INTO payload_cache (feed_key, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (feed_key) DO UPDATE SET
               payload = excluded.payload,
               saved_at = excluded.saved_at",
            (feed_key, payload, Utc::now().to_rfc3339()),
        )
        .map_err(|e| HeadlineError::PersistenceWriteFailure(e.to_string()))?;

        debug!(feed_key, bytes = payload.len(), "Saved payload");
        Ok(())
    }
}
