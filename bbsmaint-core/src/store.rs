use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::{MaintError, Result};

/// Handle on a btrieve-style SQLite store: one row per key in `data_t`,
/// with the opaque record blob in the `data` column.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(RecordStore { conn })
    }

    /// Fetches the whole record stored under `key`.
    pub fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let row: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT data FROM data_t WHERE key_0 = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match row {
            Some(data) => {
                debug!(key, len = data.len(), "fetched record");
                Ok(data)
            }
            None => Err(MaintError::NotFound(key.to_owned())),
        }
    }

    /// Overwrites the record stored under `key` with the full blob given.
    pub fn store(&self, key: &str, data: &[u8]) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE data_t SET data = ?1 WHERE key_0 = ?2",
            params![data, key],
        )?;
        if updated == 0 {
            // The row vanished between fetch and store. Last-write-wins is
            // the store's concurrency model, so all we do is report it.
            return Err(MaintError::StoreWrite(key.to_owned()));
        }
        debug!(key, len = data.len(), "stored record");
        Ok(())
    }
}
