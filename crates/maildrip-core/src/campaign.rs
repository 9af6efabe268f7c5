//! The delivery loop.

use crate::config::SessionConfig;
use crate::ledger::{DeliveryLedger, DeliveryStatus};
use crate::pace::Pacer;
use crate::transport::Transport;
use crate::validate::is_valid_address;
use tracing::{error, info, warn};

/// Per-outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages accepted by the server.
    pub sent: usize,
    /// Transport attempts that failed at some step.
    pub failed: usize,
    /// Addresses rejected by validation, never attempted.
    pub invalid: usize,
    /// Addresses skipped because a `sent` row already existed.
    pub skipped: usize,
}

impl RunSummary {
    /// Number of recipients processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.sent + self.failed + self.invalid + self.skipped
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sent, {} failed, {} invalid, {} skipped",
            self.sent, self.failed, self.invalid, self.skipped
        )
    }
}

/// One sending run over a recipient list.
///
/// Strictly sequential: one recipient at a time, one transport session at a
/// time, and the only suspension point is the pacing sleep after a
/// successful send. The ledger is consulted fresh for every recipient, so
/// an interrupted run can simply be restarted.
#[derive(Debug)]
pub struct Campaign<'a, T, P> {
    config: &'a SessionConfig,
    body: &'a str,
    ledger: &'a DeliveryLedger,
    transport: T,
    pacer: P,
}

impl<'a, T: Transport, P: Pacer> Campaign<'a, T, P> {
    /// Assembles a campaign from its collaborators.
    pub const fn new(
        config: &'a SessionConfig,
        body: &'a str,
        ledger: &'a DeliveryLedger,
        transport: T,
        pacer: P,
    ) -> Self {
        Self {
            config,
            body,
            ledger,
            transport,
            pacer,
        }
    }

    /// Processes every recipient in input order and returns the counts.
    ///
    /// Nothing a single recipient does can abort the run: transport and
    /// ledger-write failures are logged and the loop moves on.
    pub async fn run(&mut self, recipients: &[String]) -> RunSummary {
        log_worst_case(recipients.len());

        let mut summary = RunSummary::default();
        let total = recipients.len();

        for (index, recipient) in recipients.iter().enumerate() {
            info!(%recipient, "processing {}/{total}", index + 1);

            // Fail open on lookup errors: a duplicate send is recoverable,
            // a silently skipped recipient is not.
            match self.ledger.was_sent(recipient).await {
                Ok(true) => {
                    info!(%recipient, "already sent, skipping");
                    summary.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(%recipient, %err, "ledger lookup failed, assuming not sent");
                }
            }

            if !is_valid_address(recipient) {
                warn!(%recipient, "invalid address format");
                self.record(recipient, DeliveryStatus::Invalid).await;
                summary.invalid += 1;
                continue;
            }

            match self
                .transport
                .deliver(self.config, recipient, self.body)
                .await
            {
                Err(err) => {
                    error!(%recipient, %err, "delivery failed");
                    self.record(recipient, DeliveryStatus::Failed).await;
                    summary.failed += 1;
                }
                Ok(()) => {
                    self.record(recipient, DeliveryStatus::Sent).await;
                    summary.sent += 1;

                    // Only genuine transmissions are throttled; skip and
                    // failure paths move on immediately.
                    let pause = self.pacer.interval();
                    info!(%recipient, "sent, pausing {}s before next send", pause.as_secs());
                    tokio::time::sleep(pause).await;
                }
            }
        }

        summary
    }

    /// Appends an outcome row, logging instead of propagating on failure.
    /// Losing one row only risks a duplicate send on a future run.
    async fn record(&self, recipient: &str, status: DeliveryStatus) {
        if let Err(err) = self.ledger.record(recipient, status).await {
            warn!(%recipient, %status, %err, "failed to record outcome");
        }
    }
}

/// Logs the worst-case duration for the run, assuming the maximum pacing
/// delay rounds up to a minute per recipient. Purely informational.
fn log_worst_case(recipient_count: usize) {
    let max_secs = recipient_count * 60;
    let max_mins = max_secs / 60;
    let max_hours = max_mins / 60;
    info!(
        recipients = recipient_count,
        "sending will take at most {max_secs}s ({max_mins}m / {max_hours}h)"
    );
}
