//! SQLite-backed shelf implementation.
//!
//! [`Shelf`] maps string keys to [`Value`]s stored in one table. Every
//! mutation runs in its own IMMEDIATE transaction and is committed before
//! the call returns.

use crate::error::{Error, Result};
use crate::model::Value;
use crate::storage::codec;
use crate::storage::schema::{apply_pragmas, apply_schema};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default busy timeout when another process holds the write lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of keys fetched per page by [`Keys`].
const KEY_PAGE_SIZE: usize = 256;

/// A persistent string-keyed mapping over a SQLite table.
///
/// The handle is exclusive to its owner. Mutating methods take `&mut self`;
/// callers sharing a shelf across threads wrap it in a `Mutex`. Writers in
/// other processes are serialized only by SQLite's own file locking.
#[derive(Debug)]
pub struct Shelf {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl Shelf {
    /// Open or create a shelf at the given path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Open` if the file cannot be opened, is not a SQLite
    /// database, or the table cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a shelf with an optional busy timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Open` on any connection or bootstrap failure.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let timeout = timeout_ms.map_or(DEFAULT_BUSY_TIMEOUT, Duration::from_millis);

        let conn = Connection::open(path)
            .and_then(|conn| {
                conn.busy_timeout(timeout)?;
                apply_pragmas(&conn)?;
                apply_schema(&conn)?;
                Ok(conn)
            })
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "Opened shelf");
        Ok(Self {
            conn: Some(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory shelf (for testing).
    ///
    /// # Errors
    ///
    /// Returns `Error::Open` if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let memory = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory()
            .and_then(|conn| {
                apply_schema(&conn)?;
                Ok(conn)
            })
            .map_err(|source| Error::Open {
                path: memory,
                source,
            })?;

        Ok(Self {
            conn: Some(conn),
            path: None,
        })
    }

    /// Path of the backing file, or `None` for an in-memory shelf.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::UseAfterClose)
    }

    /// Run a write in an IMMEDIATE transaction and commit it.
    ///
    /// Rolls back if the closure fails.
    fn mutate<F, R>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let conn = self.conn.as_mut().ok_or(Error::UseAfterClose)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// The row keeps its original position in iteration order when
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if the value is too large,
    /// `Error::UseAfterClose` on a closed shelf, or a database error.
    pub fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        let blob = codec::encode(value)?;

        self.mutate(|tx| {
            tx.execute(
                "INSERT INTO shelf (key_str, value_str) VALUES (?1, ?2)
                 ON CONFLICT(key_str) DO UPDATE SET value_str = excluded.value_str",
                rusqlite::params![key, blob],
            )
            .map_err(|e| constraint_or_database(e, key))?;
            Ok(())
        })?;

        debug!(key, bytes = blob.len(), "Stored value");
        Ok(())
    }

    /// Look up `key`, returning `None` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the stored cell is not a blob or its bytes
    /// are not a valid encoding.
    pub fn try_get(&self, key: &str) -> Result<Option<Value>> {
        let cell: Option<SqlValue> = self
            .conn()?
            .query_row(
                "SELECT value_str FROM shelf WHERE key_str = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match cell {
            None => Ok(None),
            Some(SqlValue::Blob(blob)) => codec::decode(&blob).map(Some),
            // Shelves from older tools declare `value_str` as nullable TEXT.
            Some(other) => Err(Error::Decode(format!(
                "value_str holds {}, not an encoded blob",
                other.data_type()
            ))),
        }
    }

    /// Look up `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if the key is absent, or
    /// `Error::Decode` if the stored bytes are not a valid blob.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.try_get(key)?.ok_or_else(|| Error::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Look up `key`, falling back to `default` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the stored bytes are not a valid blob.
    pub fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.try_get(key)?.unwrap_or(default))
    }

    /// Remove `key`. Removing an absent key is a no-op.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns `Error::UseAfterClose` on a closed shelf, or a database error.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let removed = self.mutate(|tx| {
            let n = tx.execute("DELETE FROM shelf WHERE key_str = ?1", [key])?;
            Ok(n > 0)
        })?;

        debug!(key, removed, "Deleted key");
        Ok(removed)
    }

    /// Check whether `key` is present.
    ///
    /// # Errors
    ///
    /// Returns `Error::UseAfterClose` on a closed shelf, or a database error.
    pub fn contains(&self, key: &str) -> Result<bool> {
        let exists = self.conn()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM shelf WHERE key_str = ?1)",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// All keys, in first-insertion order.
    ///
    /// # Errors
    ///
    /// Returns `Error::UseAfterClose` on a closed shelf, or a database error.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn()?
            .prepare("SELECT key_str FROM shelf ORDER BY id")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }

    /// Number of records.
    ///
    /// # Errors
    ///
    /// Returns `Error::UseAfterClose` on a closed shelf, or a database error.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM shelf", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| {
            Error::ConstraintViolation(format!("negative row count {count}"))
        })
    }

    /// Whether the shelf holds no records.
    ///
    /// # Errors
    ///
    /// Returns `Error::UseAfterClose` on a closed shelf, or a database error.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Lazily iterate over keys in first-insertion order.
    ///
    /// Keys are read a page at a time. Each call starts a fresh scan of the
    /// current table; changes made between pages may or may not be seen.
    ///
    /// # Errors
    ///
    /// Returns `Error::UseAfterClose` on a closed shelf.
    pub fn iter(&self) -> Result<Keys<'_>> {
        Ok(Keys {
            conn: self.conn()?,
            last_id: 0,
            page: VecDeque::new(),
            exhausted: false,
        })
    }

    /// Commit and release the connection.
    ///
    /// Calling `close` again is a no-op. Every other operation on a closed
    /// shelf fails with `Error::UseAfterClose`.
    ///
    /// # Errors
    ///
    /// Returns a database error if the connection refuses to close; the
    /// shelf is closed regardless.
    pub fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
        }
        conn.close().map_err(|(_, e)| Error::Database(e))?;

        debug!(path = ?self.path, "Closed shelf");
        Ok(())
    }
}

impl Drop for Shelf {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "Failed to close shelf cleanly");
        }
    }
}

/// Map a unique-constraint failure on `key_str` to `ConstraintViolation`.
///
/// The upsert makes this unreachable on a well-formed table; seeing it
/// means the table was modified outside the shelf.
fn constraint_or_database(err: rusqlite::Error, key: &str) -> Error {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => {
            Error::ConstraintViolation(format!("duplicate record for key {key}: {err}"))
        }
        _ => Error::Database(err),
    }
}

/// Lazy key iterator returned by [`Shelf::iter`].
///
/// Pages through the table by internal id, so it never holds a statement
/// open between calls to `next`.
pub struct Keys<'a> {
    conn: &'a Connection,
    last_id: i64,
    page: VecDeque<String>,
    exhausted: bool,
}

impl Keys<'_> {
    fn fetch_page(&mut self) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, key_str FROM shelf WHERE id > ?1 ORDER BY id LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(rusqlite::params![self.last_id, KEY_PAGE_SIZE], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        trace!(after = self.last_id, fetched = rows.len(), "Fetched key page");

        if rows.len() < KEY_PAGE_SIZE {
            self.exhausted = true;
        }
        if let Some((id, _)) = rows.last() {
            self.last_id = *id;
        }
        self.page.extend(rows.into_iter().map(|(_, key)| key));
        Ok(())
    }
}

impl Iterator for Keys<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page.is_empty() && !self.exhausted {
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        self.page.pop_front().map(Ok)
    }
}
