//! # maildrip-smtp
//!
//! A small SMTP submission client (RFC 5321) built for one job: deliver a
//! single message over an authenticated, encrypted session.
//!
//! The session is modeled with the type-state pattern, so the protocol
//! sequencing is checked at compile time:
//!
//! ```text
//! Plain ── starttls() ──→ Secured ── auth_plain() ──→ Authed
//!                                                        │
//!          Payload ←── data() ── Recipient ←── rcpt_to() ── Envelope ←── mail_from()
//! ```
//!
//! `auth_plain` is only available on a [`Secured`] session; there is no way
//! to write a credential to a plaintext wire.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use maildrip_smtp::{Address, Session, TlsVersion, wire};
//!
//! # async fn run() -> maildrip_smtp::Result<()> {
//! let wire = wire::connect("smtp.example.com", 587).await?;
//! let session = Session::handshake(wire, "localhost").await?;
//! let tls = Arc::new(TlsVersion::Tls12.client_config());
//! let session = session.starttls("smtp.example.com", tls).await?;
//! let session = session.auth_plain("user@example.com", "password").await?;
//!
//! let session = session.mail_from(&Address::new("user@example.com")?).await?;
//! let session = session.rcpt_to(&Address::new("someone@example.org")?).await?;
//! let session = session.data().await?;
//! let session = session.finish(b"Subject: Hi\r\n\r\nHello!\r\n").await?;
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod command;
mod error;
pub mod reply;
mod session;
pub mod wire;

/// Re-export for building custom [`rustls::ClientConfig`] values (private
/// trust roots, test certificates) to pass to [`Session::starttls`].
pub use rustls;

pub use address::Address;
pub use command::Command;
pub use error::{Error, Result};
pub use reply::{Reply, ReplyCode};
pub use session::{Authed, Envelope, Payload, Plain, Recipient, Secured, Session};
pub use wire::{TlsVersion, Wire, connect};
