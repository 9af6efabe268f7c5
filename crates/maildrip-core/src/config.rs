//! Run configuration.

use maildrip_smtp::TlsVersion;

/// Settings for one sending run.
///
/// Built once before the delivery loop starts and borrowed by every
/// transport invocation; nothing mutates it mid-run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// SMTP server host name. Also used to verify the server certificate.
    pub host: String,
    /// SMTP submission port (typically 587).
    pub port: u16,
    /// Sender address; doubles as the AUTH username and the From header.
    pub sender: String,
    /// Sender password, only ever written to the encrypted channel.
    pub password: String,
    /// Subject line shared by every message in the run.
    pub subject: String,
    /// Minimum TLS version accepted during the STARTTLS upgrade.
    pub min_tls: TlsVersion,
}
