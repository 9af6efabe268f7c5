//! Low-level connection handling: plaintext TCP and the STARTTLS upgrade.

use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

static TLS13_ONLY: &[&rustls::SupportedProtocolVersion] = &[&rustls::version::TLS13];

/// Minimum TLS protocol version accepted during the STARTTLS upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVersion {
    /// Accept TLS 1.2 or newer.
    #[default]
    Tls12,
    /// Require TLS 1.3.
    Tls13,
}

impl TlsVersion {
    const fn protocol_versions(self) -> &'static [&'static rustls::SupportedProtocolVersion] {
        match self {
            Self::Tls12 => rustls::ALL_VERSIONS,
            Self::Tls13 => TLS13_ONLY,
        }
    }

    /// Client configuration trusting the bundled webpki roots, with the
    /// negotiated protocol version bounded below by this minimum.
    #[must_use]
    pub fn client_config(self) -> ClientConfig {
        let root_store = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };

        ClientConfig::builder_with_protocol_versions(self.protocol_versions())
            .with_root_certificates(root_store)
            .with_no_client_auth()
    }
}

/// The connection to the server, before or after the TLS upgrade.
#[derive(Debug)]
pub enum Wire {
    /// Plaintext TCP. Carries commands and replies only, never credentials.
    Clear(BufReader<TcpStream>),
    /// TLS-encrypted connection.
    Sealed(Box<BufReader<tokio_rustls::client::TlsStream<TcpStream>>>),
}

impl Wire {
    /// Reads one CRLF-terminated line, with the terminator stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the peer closed the connection.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = match self {
            Self::Clear(reader) => reader.read_line(&mut line).await?,
            Self::Sealed(reader) => reader.read_line(&mut line).await?,
        };
        if n == 0 {
            return Err(Error::Protocol("connection closed by server".into()));
        }
        Ok(line.trim_end().to_string())
    }

    /// Writes and flushes raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Self::Clear(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
            Self::Sealed(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
        }
        Ok(())
    }

    /// Performs the TLS handshake over the existing TCP connection.
    ///
    /// The server certificate is verified against `hostname` using the
    /// root store carried in `tls`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is already encrypted, the
    /// hostname is not a valid server name, or the handshake fails.
    pub async fn seal(self, hostname: &str, tls: Arc<ClientConfig>) -> Result<Self> {
        let tcp = match self {
            Self::Clear(reader) => reader.into_inner(),
            Self::Sealed(_) => return Err(Error::Protocol("connection already encrypted".into())),
        };

        let server_name = ServerName::try_from(hostname.to_string())
            .map_err(|_| Error::Protocol(format!("invalid server name: {hostname}")))?;

        let stream = TlsConnector::from(tls).connect(server_name, tcp).await?;
        debug!(hostname, "tls established");
        Ok(Self::Sealed(Box::new(BufReader::new(stream))))
    }
}

/// Opens a plaintext TCP connection to `host:port`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(host: &str, port: u16) -> Result<Wire> {
    let stream = TcpStream::connect((host, port)).await?;
    debug!(host, port, "connected");
    Ok(Wire::Clear(BufReader::new(stream)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tls13_minimum_offers_only_tls13() {
        let versions = TlsVersion::Tls13.protocol_versions();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, rustls::ProtocolVersion::TLSv1_3);
    }

    #[test]
    fn default_minimum_accepts_earlier_versions() {
        assert_eq!(TlsVersion::default(), TlsVersion::Tls12);
        assert_eq!(
            TlsVersion::Tls12.protocol_versions().len(),
            rustls::ALL_VERSIONS.len()
        );
    }
}
