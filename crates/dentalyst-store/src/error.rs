//! # Store Errors
//!
//! Failures raised by store implementations. The API layer maps these to
//! HTTP responses: `Unavailable` → 503, `DuplicateName` → 400, the rest
//! → 500 with details logged server-side only.

use thiserror::Error;
use uuid::Uuid;

/// A record-store failure.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database is not connected; the operation was refused without
    /// queueing. Carries the connection state name for logging.
    #[error("database unavailable (connection state: {0})")]
    Unavailable(String),

    /// An insert or rename collided with an existing consultant name.
    #[error("a consultant named {0:?} already exists")]
    DuplicateName(String),

    /// A stored row failed domain parsing (e.g. an unknown category
    /// string written by an older schema).
    #[error("corrupt record {id}: {detail}")]
    CorruptRecord {
        /// Primary key of the offending row.
        id: Uuid,
        /// What failed to parse.
        detail: String,
    },

    /// Any other database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether this error means the service should answer 503.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
