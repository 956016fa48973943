//! Error taxonomy for tally operations

use thiserror::Error;

use crate::Username;

/// Core error type for mutation and lookup operations.
///
/// These are surfaced to the HTTP layer as values so it can map them
/// to status codes; they never escape as panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error("User not found: {0}")]
    UserNotFound(Username),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Not a numeric field: {0}")]
    NotNumeric(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl TallyError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
