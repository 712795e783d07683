//! Key-value blob repository contracts and implementations.
//!
//! # Responsibility
//! - Store whole serialized aggregates under fixed keys.
//! - Provide a durable SQLite backend and a volatile in-memory backend.
//!
//! # Invariants
//! - Blank keys are rejected before touching storage.
//! - `put_blob` is an upsert; there is no partial update.

use crate::db::DbError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for blob persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid blob key: `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for whole-value blob storage.
pub trait BlobRepository {
    fn get_blob(&self, key: &str) -> RepoResult<Option<Vec<u8>>>;
    fn put_blob(&self, key: &str, value: &[u8]) -> RepoResult<()>;
    /// Returns whether a value was removed.
    fn delete_blob(&self, key: &str) -> RepoResult<bool>;
    /// Stored keys in ascending order.
    fn keys(&self) -> RepoResult<Vec<String>>;
}

impl<T: BlobRepository + ?Sized> BlobRepository for &T {
    fn get_blob(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        (**self).get_blob(key)
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        (**self).put_blob(key, value)
    }

    fn delete_blob(&self, key: &str) -> RepoResult<bool> {
        (**self).delete_blob(key)
    }

    fn keys(&self) -> RepoResult<Vec<String>> {
        (**self).keys()
    }
}

impl<T: BlobRepository + ?Sized> BlobRepository for Rc<T> {
    fn get_blob(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        (**self).get_blob(key)
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        (**self).put_blob(key, value)
    }

    fn delete_blob(&self, key: &str) -> RepoResult<bool> {
        (**self).delete_blob(key)
    }

    fn keys(&self) -> RepoResult<Vec<String>> {
        (**self).keys()
    }
}

/// SQLite-backed blob repository over the `blobs` table.
pub struct SqliteBlobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BlobRepository for SqliteBlobRepository<'_> {
    fn get_blob(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let key = validate_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        let key = validate_key(key)?;
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn delete_blob(&self, key: &str) -> RepoResult<bool> {
        let key = validate_key(key)?;
        let removed = self
            .conn
            .execute("DELETE FROM blobs WHERE key = ?1;", [key])?;
        Ok(removed > 0)
    }

    fn keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM blobs ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

/// Volatile blob repository for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBlobRepository {
    blobs: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl BlobRepository for MemoryBlobRepository {
    fn get_blob(&self, key: &str) -> RepoResult<Option<Vec<u8>>> {
        let key = validate_key(key)?;
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> RepoResult<()> {
        let key = validate_key(key)?;
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_blob(&self, key: &str) -> RepoResult<bool> {
        let key = validate_key(key)?;
        Ok(self.blobs.borrow_mut().remove(key).is_some())
    }

    fn keys(&self) -> RepoResult<Vec<String>> {
        Ok(self.blobs.borrow().keys().cloned().collect())
    }
}

fn validate_key(key: &str) -> RepoResult<&str> {
    if key.trim().is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(key)
}
