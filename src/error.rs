//! Error types for the board sync engine

use thiserror::Error;

/// Board sync error
///
/// Transport failures never appear here from a write operation: the sync
/// controller recovers them by committing against the fallback cache. What
/// does appear is terminal — reported to the caller with no state mutated.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Input rejected before any I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller is not authenticated and registered
    #[error("Not authorized: sign in and complete registration first")]
    Unauthorized,

    /// The user already holds this vote on this listing
    #[error("Duplicate vote on listing {0}")]
    DuplicateVote(u64),

    /// The remote authority explicitly refused the operation
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// Listing id is not present in the store
    #[error("Listing not found: {0}")]
    NotFound(u64),

    /// Fallback cache fault
    #[error("Cache error: {0}")]
    Cache(#[from] sled::Error),

    /// Snapshot encode/decode fault
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;
