//! Environment configuration.

use anyhow::{Context, Result};
use maildrip_core::{SessionConfig, TlsVersion};
use std::env;

/// Loads the session configuration from the environment, reading a `.env`
/// file first if one exists.
///
/// # Errors
///
/// Returns an error naming the variable if any required one is missing or
/// the port is not a number. A run cannot start half-configured, so the
/// caller treats this as fatal.
pub fn load() -> Result<SessionConfig> {
    // A missing .env file is fine; the variables may come from the real
    // environment (systemd unit, container, CI).
    dotenv::dotenv().ok();

    let port = required("SMTP_PORT")?;
    let port = port
        .parse::<u16>()
        .with_context(|| format!("SMTP_PORT is not a valid port number: {port:?}"))?;

    Ok(SessionConfig {
        host: required("SMTP_SERVER")?,
        port,
        sender: required("SENDER_EMAIL")?,
        password: required("SENDER_PASS")?,
        subject: required("EMAIL_SUBJECT")?,
        min_tls: TlsVersion::Tls12,
    })
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("missing required environment variable {name}"))
}
