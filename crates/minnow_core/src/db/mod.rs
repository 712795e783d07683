//! SQLite file backing the key-value blob store.
//!
//! The database holds a single `blobs` table; item and checkup aggregates are
//! JSON values inside it. Opening a connection migrates the table layout and
//! then checks that `blobs` is actually present, so a foreign SQLite file with
//! a matching `user_version` is refused instead of failing on first write.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub const BLOB_TABLE: &str = "blobs";

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate the blob store file.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build than this one.
    NewerBlobSchema { found: u32, supported: u32 },
    /// Migrations report done but the `blobs` table does not exist.
    MissingBlobTable { schema_version: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "blob store sqlite error: {err}"),
            Self::NewerBlobSchema { found, supported } => write!(
                f,
                "`{BLOB_TABLE}` schema v{found} comes from a newer build; this build migrates up to v{supported}"
            ),
            Self::MissingBlobTable { schema_version } => write!(
                f,
                "no `{BLOB_TABLE}` table at schema v{schema_version}; not a Min-Now store"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::NewerBlobSchema { .. } | Self::MissingBlobTable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
