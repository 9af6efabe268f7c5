//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A ledger row holds a status or timestamp this version cannot read.
    #[error("corrupt ledger row {id}: {detail}")]
    CorruptRow {
        /// Primary key of the offending row.
        id: i64,
        /// What failed to parse.
        detail: String,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
