use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use diesel::prelude::*;
use lazy_static::lazy_static;
use log::debug;
use thiserror::Error;

pub type DbConnection = SqliteConnection;

/// URL SQLite treats as a private, in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Clone, Error, Debug, PartialEq)]
pub enum DbError {
    #[error("Could not connect to '{}'. Root cause: {}.", url, cause)]
    Connection { url: String, cause: String },

    #[error("There was a schema error on table '{}'. Root cause: {}.", table, cause)]
    Schema { table: String, cause: String },

    #[error("'{}' cannot be used as a table name.", name)]
    InvalidTableName { name: String },

    #[error("There is no book with ordinal {}.", ordinal)]
    UnknownBook { ordinal: i32 },

    #[error("'{}' is not a valid Bible reference.", reference)]
    InvalidReference { reference: String },

    #[error("Verse range {}-{} is invalid; the start must come before the end.", start, end)]
    InvalidRange { start: i32, end: i32 },

    #[error("'{}' was not found.", book)]
    BookNotFound { book: String },

    #[error("'{}' was not found.", reference)]
    VerseNotFound { reference: String },

    #[error("Could not read verses from '{}'. Root cause: {}.", path, cause)]
    Source { path: String, cause: String },

    #[error("There was a database error. Root cause: {:?}.", cause)]
    Other { cause: String },
}

impl DbError {
    /// Whether the request was well formed but names something absent from
    /// the corpus, as opposed to a parse or storage failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::VerseNotFound { .. } | DbError::BookNotFound { .. }
        )
    }
}

lazy_static! {
    /// Single-writer discipline for the store: ingestion holds the write side
    /// for a whole batch, queries hold the read side.
    static ref STORE_LOCK: RwLock<()> = RwLock::new(());
}

pub(crate) fn read_lock() -> RwLockReadGuard<'static, ()> {
    STORE_LOCK.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock() -> RwLockWriteGuard<'static, ()> {
    STORE_LOCK.write().unwrap_or_else(PoisonError::into_inner)
}

/// Establishes a non-pooled SQLite connection, creating the file if needed.
///
/// The connection is closed when it is dropped.
pub fn establish_connection(db_url: &str) -> Result<DbConnection, DbError> {
    debug!("Connecting to {}", db_url);
    SqliteConnection::establish(db_url).map_err(|e| DbError::Connection {
        url: db_url.to_string(),
        cause: e.to_string(),
    })
}

/// Establishes a connection to a store that must already exist.
pub fn open_existing(db_url: &str) -> Result<DbConnection, DbError> {
    if db_url != IN_MEMORY && !Path::new(db_url).is_file() {
        return Err(DbError::Connection {
            url: db_url.to_string(),
            cause: "no such database file".to_string(),
        });
    }
    establish_connection(db_url)
}

pub mod books;
pub mod convert;
pub mod ingest;
pub mod models;
mod schema;
mod sword_drill;
pub mod table_name;
#[cfg(test)]
mod test;

pub use sword_drill::{BibleDatabase, SwordDrill, SwordDrillable};
