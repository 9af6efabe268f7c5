//! SQLite-backed delivery ledger.

use chrono::NaiveDateTime;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use super::model::{DeliveryRecord, DeliveryStatus};
use crate::{Error, Result};

/// Durable mapping from recipient address to past delivery outcomes.
///
/// The table is append-only; the only queries are "does a `sent` row exist
/// for this address" and the insert of a new attempt row.
pub struct DeliveryLedger {
    pool: SqlitePool,
}

impl DeliveryLedger {
    /// Opens (creating if needed) the ledger at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created. Both are fatal to a run: without a working ledger
    /// every rerun would re-send the whole list.
    pub async fn open(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let ledger = Self { pool };
        ledger.initialize().await?;
        Ok(ledger)
    }

    /// Creates an in-memory ledger for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let ledger = Self { pool };
        ledger.initialize().await?;
        Ok(ledger)
    }

    /// Idempotent schema creation.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS emails (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                status TEXT NOT NULL,
                timestamp TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_emails_email_status
            ON emails(email, status)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns true iff at least one `sent` row exists for this exact
    /// address string.
    ///
    /// Failed and invalid rows do not count: an address that failed
    /// yesterday is still eligible today, so the query filters on status
    /// rather than mere presence.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. The delivery loop maps that to
    /// "not yet sent" - a duplicate send is preferred over a missed one.
    pub async fn was_sent(&self, email: &str) -> Result<bool> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS count
            FROM emails
            WHERE email = ? AND status = 'sent'
            ",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Appends one attempt row. The timestamp is assigned by the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record(&self, email: &str, status: DeliveryStatus) -> Result<()> {
        sqlx::query(r"INSERT INTO emails (email, status) VALUES (?, ?)")
            .bind(email)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All attempt rows for an address, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    /// A row this version cannot read is reported, not silently dropped;
    /// hiding it would misrepresent the address's history.
    pub async fn history(&self, email: &str) -> Result<Vec<DeliveryRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, email, status, timestamp
            FROM emails
            WHERE email = ?
            ORDER BY id
            ",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.get("id");
            let status: String = row.get("status");
            let timestamp: String = row.get("timestamp");

            let status = DeliveryStatus::parse(&status).ok_or_else(|| Error::CorruptRow {
                id,
                detail: format!("unknown status {status:?}"),
            })?;
            let timestamp = NaiveDateTime::parse_from_str(&timestamp, "%Y-%m-%d %H:%M:%S")
                .map_err(|err| Error::CorruptRow {
                    id,
                    detail: format!("timestamp {timestamp:?}: {err}"),
                })?
                .and_utc();

            records.push(DeliveryRecord {
                id,
                email: row.get("email"),
                status,
                timestamp,
            });
        }

        Ok(records)
    }

    /// Total number of rows in the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn len(&self) -> Result<u64> {
        let row = sqlx::query(r"SELECT COUNT(*) AS count FROM emails")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.get("count");
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Returns true if the ledger has no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

impl std::fmt::Debug for DeliveryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryLedger").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_ledger_knows_nothing() {
        let ledger = DeliveryLedger::in_memory().await.unwrap();
        assert!(!ledger.was_sent("a@x.com").await.unwrap());
        assert!(ledger.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn sent_row_marks_address_as_sent() {
        let ledger = DeliveryLedger::in_memory().await.unwrap();
        ledger.record("a@x.com", DeliveryStatus::Sent).await.unwrap();

        assert!(ledger.was_sent("a@x.com").await.unwrap());
        assert!(!ledger.was_sent("b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn failed_and_invalid_rows_do_not_count_as_sent() {
        let ledger = DeliveryLedger::in_memory().await.unwrap();
        ledger
            .record("a@x.com", DeliveryStatus::Failed)
            .await
            .unwrap();
        ledger
            .record("b@x.com", DeliveryStatus::Invalid)
            .await
            .unwrap();

        assert!(!ledger.was_sent("a@x.com").await.unwrap());
        assert!(!ledger.was_sent("b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn failed_then_sent_is_sent() {
        // Append-only: a later sent row coexists with the earlier failure.
        let ledger = DeliveryLedger::in_memory().await.unwrap();
        ledger
            .record("a@x.com", DeliveryStatus::Failed)
            .await
            .unwrap();
        ledger.record("a@x.com", DeliveryStatus::Sent).await.unwrap();

        assert!(ledger.was_sent("a@x.com").await.unwrap());

        let history = ledger.history("a@x.com").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, DeliveryStatus::Failed);
        assert_eq!(history[1].status, DeliveryStatus::Sent);
        assert!(history[0].id < history[1].id);
    }

    #[tokio::test]
    async fn schema_creation_is_idempotent_and_rows_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.db");
        let path = path.to_str().unwrap();

        {
            let ledger = DeliveryLedger::open(path).await.unwrap();
            ledger.record("a@x.com", DeliveryStatus::Sent).await.unwrap();
        }

        // Reopening runs CREATE TABLE IF NOT EXISTS again and must see the
        // previous run's rows.
        let ledger = DeliveryLedger::open(path).await.unwrap();
        assert!(ledger.was_sent("a@x.com").await.unwrap());
        assert_eq!(ledger.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn history_reports_rows_with_an_unknown_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.db");
        let path = path.to_str().unwrap();

        let ledger = DeliveryLedger::open(path).await.unwrap();
        ledger.record("a@x.com", DeliveryStatus::Sent).await.unwrap();

        // A row written by some other tool, with a status this version
        // does not know.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&format!("sqlite:{path}"))
            .await
            .unwrap();
        sqlx::query(r"INSERT INTO emails (email, status) VALUES ('a@x.com', 'pending')")
            .execute(&pool)
            .await
            .unwrap();

        let err = ledger.history("a@x.com").await.unwrap_err();
        assert!(matches!(err, Error::CorruptRow { .. }));

        // The good-status queries are unaffected.
        assert!(ledger.was_sent("a@x.com").await.unwrap());
        assert_eq!(ledger.len().await.unwrap(), 2);
    }
}
