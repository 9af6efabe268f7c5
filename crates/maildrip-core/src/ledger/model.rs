//! Ledger row types.

use chrono::{DateTime, Utc};

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The server accepted the message.
    Sent,
    /// The transport session failed at some step.
    Failed,
    /// The address never made it to the network: it failed validation.
    Invalid,
}

impl DeliveryStatus {
    /// The text stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Invalid => "invalid",
        }
    }

    /// Parses a stored status value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(Self::Sent),
            "failed" => Some(Self::Failed),
            "invalid" => Some(Self::Invalid),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One appended row: a single attempt for a single address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    /// Autoincrement row id; doubles as attempt order.
    pub id: i64,
    /// The recipient address exactly as it appeared in the input.
    pub email: String,
    /// Outcome of the attempt.
    pub status: DeliveryStatus,
    /// Insertion time, assigned by the database.
    pub timestamp: DateTime<Utc>,
}
