//! Transport: one full SMTP exchange per message.

use crate::config::SessionConfig;
use crate::message::build_message;
use async_trait::async_trait;
use maildrip_smtp::rustls::ClientConfig;
use maildrip_smtp::{Address, Session, connect};
use std::sync::Arc;
use tracing::warn;

/// Name this client identifies itself with in EHLO.
const LOCAL_NAME: &str = "localhost";

/// A transport session failure, one variant per fallible protocol step.
///
/// The step at which the exchange died determines the variant; every
/// variant aborts the remaining steps for that recipient only. The
/// connection itself is closed on all paths because the session value is
/// consumed. QUIT has no variant: once the message is accepted, a close
/// error is logged rather than surfaced.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Dial, greeting, or EHLO failed; nothing was negotiated.
    #[error("connect failed: {0}")]
    Connect(#[source] maildrip_smtp::Error),

    /// The TLS upgrade failed; no credential touched the wire.
    #[error("STARTTLS failed: {0}")]
    StartTls(#[source] maildrip_smtp::Error),

    /// The server rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(#[source] maildrip_smtp::Error),

    /// The envelope sender was rejected.
    #[error("MAIL FROM rejected: {0}")]
    MailFrom(#[source] maildrip_smtp::Error),

    /// The envelope recipient was rejected.
    #[error("RCPT TO rejected: {0}")]
    RcptTo(#[source] maildrip_smtp::Error),

    /// The DATA phase or the message body was rejected.
    #[error("message not accepted: {0}")]
    Data(#[source] maildrip_smtp::Error),
}

/// Delivers a single message to a single recipient.
///
/// The delivery loop only depends on this trait, so tests can substitute a
/// transport that records invocations instead of opening sockets.
#[async_trait]
pub trait Transport {
    /// Runs one complete delivery attempt. No retries happen at this level.
    async fn deliver(
        &self,
        config: &SessionConfig,
        recipient: &str,
        body: &str,
    ) -> Result<(), TransportError>;
}

/// The production transport: STARTTLS SMTP submission with AUTH PLAIN.
#[derive(Clone, Default)]
pub struct SmtpTransport {
    tls: Option<Arc<ClientConfig>>,
}

impl SmtpTransport {
    /// Creates the transport with the default trust roots; the minimum TLS
    /// version comes from the per-run [`SessionConfig`].
    #[must_use]
    pub const fn new() -> Self {
        Self { tls: None }
    }

    /// Creates a transport with an explicit TLS client configuration,
    /// overriding the default webpki trust roots. Needed when the server's
    /// certificate chains to a private authority.
    #[must_use]
    pub fn with_tls_config(tls: Arc<ClientConfig>) -> Self {
        Self { tls: Some(tls) }
    }
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn deliver(
        &self,
        config: &SessionConfig,
        recipient: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        let wire = connect(&config.host, config.port)
            .await
            .map_err(TransportError::Connect)?;

        let session = Session::handshake(wire, LOCAL_NAME)
            .await
            .map_err(TransportError::Connect)?;

        let tls = self
            .tls
            .clone()
            .unwrap_or_else(|| Arc::new(config.min_tls.client_config()));
        let session = session
            .starttls(&config.host, tls)
            .await
            .map_err(TransportError::StartTls)?;

        let session = session
            .auth_plain(&config.sender, &config.password)
            .await
            .map_err(TransportError::Auth)?;

        let from = Address::new(&config.sender).map_err(TransportError::MailFrom)?;
        let session = session
            .mail_from(&from)
            .await
            .map_err(TransportError::MailFrom)?;

        let to = Address::new(recipient).map_err(TransportError::RcptTo)?;
        let session = session.rcpt_to(&to).await.map_err(TransportError::RcptTo)?;

        let session = session.data().await.map_err(TransportError::Data)?;
        let message = build_message(config, recipient, body);
        let session = session
            .finish(message.as_bytes())
            .await
            .map_err(TransportError::Data)?;

        // The server has accepted the message; a noisy QUIT must not turn
        // the attempt into a failure and trigger a resend on the next run.
        if let Err(err) = session.quit().await {
            warn!(%err, "quit failed after message acceptance");
        }
        Ok(())
    }
}
