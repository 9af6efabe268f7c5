//! Append-only delivery ledger.
//!
//! One row per attempt, never updated or deleted. "Already sent" is the
//! existence of at least one `sent` row for the exact address string, which
//! is what makes interrupted runs safely resumable.

mod model;
mod repository;

pub use model::{DeliveryRecord, DeliveryStatus};
pub use repository::DeliveryLedger;
