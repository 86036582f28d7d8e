use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha512};
use tracing::info;

use crate::{MaintError, Result};

/// Keys granted to every new account; extra keys are appended to these.
pub const DEFAULT_ACCOUNT_KEYS: &[&str] = &["NORMAL", "PAYING"];

const SALT_LEN: usize = 32;

/// Handle on the emulator's account database (`mbbs.db`).
pub struct AccountStore {
    conn: Connection,
}

impl AccountStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(AccountStore { conn })
    }

    /// Creates the account tables when they are missing, matching the schema
    /// the emulator lays down on first boot.
    pub fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS Accounts (
                 accountId INTEGER PRIMARY KEY AUTOINCREMENT,
                 userName TEXT NOT NULL UNIQUE,
                 passwordHash TEXT NOT NULL,
                 passwordSalt TEXT NOT NULL,
                 email TEXT,
                 createDate DATETIME,
                 updateDate DATETIME
             );
             CREATE TABLE IF NOT EXISTS AccountKeys (
                 accountKeyId INTEGER PRIMARY KEY AUTOINCREMENT,
                 accountId INTEGER NOT NULL,
                 accountKey TEXT NOT NULL,
                 createDate DATETIME,
                 updateDate DATETIME,
                 FOREIGN KEY (accountId) REFERENCES Accounts (accountId)
             );",
        )?;
        Ok(())
    }

    pub fn account_id(&self, username: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT accountId FROM Accounts WHERE userName = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn account_keys(&self, account_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT accountKey FROM AccountKeys WHERE accountId = ?1 ORDER BY accountKeyId",
        )?;
        let keys = stmt
            .query_map(params![account_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }

    /// Inserts the account row and one key row per entry in `keys`, all in a
    /// single transaction. The password is stored as a base64 SHA-512 digest
    /// of the UTF-8 password bytes followed by a fresh 32-byte random salt.
    pub fn create_account(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
        keys: &[String],
    ) -> Result<i64> {
        if self.account_id(username)?.is_some() {
            return Err(MaintError::AccountExists(username.to_owned()));
        }

        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let hash = hash_password(password, &salt);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO Accounts (userName, passwordHash, passwordSalt, email, createDate, updateDate)
             VALUES (?1, ?2, ?3, ?4, datetime('now'), datetime('now'))",
            params![username, BASE64.encode(hash), BASE64.encode(salt), email],
        )?;
        let account_id = tx.last_insert_rowid();
        for key in keys {
            tx.execute(
                "INSERT INTO AccountKeys (accountId, accountKey, createDate, updateDate)
                 VALUES (?1, ?2, datetime('now'), datetime('now'))",
                params![account_id, key],
            )?;
        }
        tx.commit()?;
        info!(username, account_id, keys = keys.len(), "account created");
        Ok(account_id)
    }

    /// Recomputes the digest from the stored salt; `Some(accountId)` when the
    /// password matches.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<i64>> {
        let row: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT accountId, passwordHash, passwordSalt FROM Accounts WHERE userName = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let Some((account_id, stored_hash, stored_salt)) = row else {
            return Ok(None);
        };
        let salt = BASE64
            .decode(&stored_salt)
            .map_err(|_| MaintError::BadCredentials(username.to_owned()))?;
        let hash = BASE64.encode(hash_password(password, &salt));
        Ok((hash == stored_hash).then_some(account_id))
    }
}

fn hash_password(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha512::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    hasher.finalize().to_vec()
}
