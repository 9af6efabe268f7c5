//! Error types for SMTP operations.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on the underlying connection.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS negotiation error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Server rejected a command.
    #[error("server replied {code}: {message}")]
    Rejected {
        /// Reply code (e.g. 550).
        code: u16,
        /// Message text from the server.
        message: String,
    },

    /// Malformed or unexpected server response.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Syntactically invalid envelope address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Creates a rejection error from a reply code and message.
    #[must_use]
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Returns true if the server rejected a command permanently (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code >= 500 && *code < 600)
    }
}
