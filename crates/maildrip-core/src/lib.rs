//! # maildrip-core
//!
//! Business logic for the maildrip bulk sender:
//!
//! - [`DeliveryLedger`] - append-only SQLite record of per-recipient
//!   outcomes, the source of truth that makes reruns safe
//! - [`is_valid_address`] - syntactic address filter applied before any
//!   network round trip
//! - [`Transport`] / [`SmtpTransport`] - one full SMTP exchange per message,
//!   with one error kind per protocol step
//! - [`Pacer`] / [`ThrottlePacer`] - randomized delay between successful
//!   sends
//! - [`Campaign`] - the delivery loop tying the above together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod campaign;
mod config;
mod error;
pub mod ledger;
mod message;
mod pace;
mod transport;
mod validate;

pub use campaign::{Campaign, RunSummary};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use ledger::{DeliveryLedger, DeliveryRecord, DeliveryStatus};
pub use maildrip_smtp::TlsVersion;
pub use message::build_message;
pub use pace::{Pacer, ThrottlePacer};
pub use transport::{SmtpTransport, Transport, TransportError};
pub use validate::is_valid_address;
