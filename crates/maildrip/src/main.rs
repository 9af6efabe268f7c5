//! maildrip - bulk email sender with paced delivery and a resumable ledger.
//!
//! Reads recipients from a CSV file, loads a static HTML template, and
//! delivers one message per recipient over an authenticated STARTTLS SMTP
//! session. Outcomes are appended to a SQLite ledger; rerunning the same
//! list skips every address that already has a `sent` row.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod roster;

use anyhow::{Context, Result};
use clap::Parser;
use maildrip_core::{Campaign, DeliveryLedger, SmtpTransport, ThrottlePacer};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "maildrip", version, about)]
struct Cli {
    /// CSV file with recipient addresses in the first column.
    #[arg(long, default_value = "recipients.csv")]
    recipients: PathBuf,

    /// HTML file sent verbatim as the message body.
    #[arg(long, default_value = "email.html")]
    template: PathBuf,

    /// SQLite file holding the delivery ledger.
    #[arg(long, default_value = "emails.db")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maildrip=info,maildrip_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Everything from here to the loop is fatal on failure: a run cannot
    // start without its config, ledger, roster, and template.
    let session = config::load()?;

    let ledger = DeliveryLedger::open(&cli.database.display().to_string())
        .await
        .with_context(|| format!("opening delivery ledger {}", cli.database.display()))?;

    let recipients = roster::load(&cli.recipients)?;
    info!(
        count = recipients.len(),
        path = %cli.recipients.display(),
        "loaded recipients"
    );

    let body = std::fs::read_to_string(&cli.template)
        .with_context(|| format!("reading template {}", cli.template.display()))?;

    let mut campaign = Campaign::new(
        &session,
        &body,
        &ledger,
        SmtpTransport::new(),
        ThrottlePacer::default(),
    );
    let summary = campaign.run(&recipients).await;

    info!(%summary, "run complete");
    Ok(())
}
