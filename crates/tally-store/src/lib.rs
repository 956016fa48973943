//! Persistence layer for tallyd
//!
//! Provides an append-only archive of day-state snapshots and named
//! events. Rows are appended and queried, never updated or deleted;
//! callers needing "the" state for a day take the most recently
//! created snapshot row.

mod records;
mod sqlite;
mod traits;

pub use records::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
