//! Type-state SMTP session.
//!
//! A session is consumed by every transition; on failure the value is
//! dropped and the connection closed, so a half-finished exchange can
//! never be resumed or reused.

use crate::address::Address;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::reply::{self, Reply, ReplyCode};
use crate::wire::Wire;
use base64::Engine;
use rustls::ClientConfig;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// State marker: greeting read and EHLO exchanged, wire still plaintext.
#[derive(Debug)]
pub struct Plain;

/// State marker: STARTTLS completed, wire encrypted.
#[derive(Debug)]
pub struct Secured;

/// State marker: authenticated over the encrypted wire.
#[derive(Debug)]
pub struct Authed;

/// State marker: envelope sender declared.
#[derive(Debug)]
pub struct Envelope;

/// State marker: envelope recipient accepted.
#[derive(Debug)]
pub struct Recipient;

/// State marker: DATA accepted, server expects the message payload.
#[derive(Debug)]
pub struct Payload;

/// An SMTP session in state `S`.
#[derive(Debug)]
pub struct Session<S> {
    wire: Wire,
    _state: PhantomData<S>,
}

impl Session<Plain> {
    /// Reads the server greeting and sends EHLO.
    ///
    /// # Errors
    ///
    /// Returns an error if the greeting is missing or either exchange is
    /// rejected.
    pub async fn handshake(mut wire: Wire, local_name: &str) -> Result<Self> {
        let greeting = read_reply(&mut wire).await?;
        if greeting.code != ReplyCode::SERVICE_READY {
            return Err(Error::rejected(greeting.code.as_u16(), greeting.text()));
        }

        exchange(
            &mut wire,
            Command::Ehlo {
                name: local_name.to_string(),
            },
        )
        .await?
        .require_success()?;

        Ok(Self {
            wire,
            _state: PhantomData,
        })
    }

    /// Upgrades the connection to TLS and repeats EHLO on the new channel.
    ///
    /// Nothing sensitive has crossed the wire yet; if the upgrade fails the
    /// session is dropped and the plaintext connection closed unused.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses STARTTLS, the handshake fails,
    /// or the post-upgrade EHLO is rejected.
    pub async fn starttls(
        mut self,
        hostname: &str,
        tls: Arc<ClientConfig>,
    ) -> Result<Session<Secured>> {
        exchange(&mut self.wire, Command::StartTls)
            .await?
            .require_success()?;

        let mut wire = self.wire.seal(hostname, tls).await?;

        // EHLO state negotiated in the clear must be discarded (RFC 3207).
        exchange(
            &mut wire,
            Command::Ehlo {
                name: hostname.to_string(),
            },
        )
        .await?
        .require_success()?;

        Ok(Session {
            wire,
            _state: PhantomData,
        })
    }
}

impl Session<Secured> {
    /// Authenticates with AUTH PLAIN over the encrypted channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials.
    pub async fn auth_plain(mut self, username: &str, password: &str) -> Result<Session<Authed>> {
        let credentials = format!("\0{username}\0{password}");
        let payload = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        exchange(&mut self.wire, Command::AuthPlain { payload })
            .await?
            .require_success()?;

        Ok(Session {
            wire: self.wire,
            _state: PhantomData,
        })
    }
}

impl Session<Authed> {
    /// Declares the envelope sender.
    ///
    /// # Errors
    ///
    /// Returns an error if MAIL FROM is rejected.
    pub async fn mail_from(mut self, from: &Address) -> Result<Session<Envelope>> {
        exchange(&mut self.wire, Command::MailFrom { from: from.clone() })
            .await?
            .require_success()?;

        Ok(Session {
            wire: self.wire,
            _state: PhantomData,
        })
    }
}

impl Session<Envelope> {
    /// Declares the envelope recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if RCPT TO is rejected.
    pub async fn rcpt_to(mut self, to: &Address) -> Result<Session<Recipient>> {
        exchange(&mut self.wire, Command::RcptTo { to: to.clone() })
            .await?
            .require_success()?;

        Ok(Session {
            wire: self.wire,
            _state: PhantomData,
        })
    }
}

impl Session<Recipient> {
    /// Sends DATA and waits for the 354 go-ahead.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not invite the payload.
    pub async fn data(mut self) -> Result<Session<Payload>> {
        let reply = exchange(&mut self.wire, Command::Data).await?;
        if reply.code != ReplyCode::START_DATA {
            return Err(Error::rejected(reply.code.as_u16(), reply.text()));
        }

        Ok(Session {
            wire: self.wire,
            _state: PhantomData,
        })
    }
}

impl Session<Payload> {
    /// Streams the message and terminates it with the `.` line.
    ///
    /// Line endings are normalized to CRLF and leading dots are stuffed
    /// per RFC 5321 §4.5.2.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the server rejects the
    /// message.
    pub async fn finish(mut self, message: &[u8]) -> Result<Session<Secured>> {
        for line in message.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.first() == Some(&b'.') {
                self.wire.write_all(b".").await?;
            }
            self.wire.write_all(line).await?;
            self.wire.write_all(b"\r\n").await?;
        }
        self.wire.write_all(b".\r\n").await?;

        read_reply(&mut self.wire).await?.require_success()?;

        Ok(Session {
            wire: self.wire,
            _state: PhantomData,
        })
    }
}

impl<S> Session<S> {
    /// Sends QUIT and closes the connection. Available from any state.
    ///
    /// # Errors
    ///
    /// Returns an error if the server replies with something other than a
    /// success or closing code. The connection is closed either way.
    pub async fn quit(mut self) -> Result<()> {
        let reply = exchange(&mut self.wire, Command::Quit).await?;
        if !reply.is_success() && reply.code != ReplyCode::CLOSING {
            return Err(Error::rejected(reply.code.as_u16(), reply.text()));
        }
        Ok(())
    }
}

async fn exchange(wire: &mut Wire, cmd: Command) -> Result<Reply> {
    wire.write_all(&cmd.serialize()).await?;
    read_reply(wire).await
}

async fn read_reply(wire: &mut Wire) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let line = wire.read_line().await?;
        if line.is_empty() {
            continue;
        }

        let is_final = reply::is_final_line(&line);
        lines.push(line);

        if is_final {
            break;
        }
    }

    let reply = reply::parse(&lines)?;
    trace!(code = reply.code.as_u16(), "server reply");
    Ok(reply)
}
