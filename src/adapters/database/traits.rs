//! Database abstraction traits
//!
//! The health checker reads replication bookkeeping through
//! [`ReplicationCatalog`]; the exporter and orchestrator reach the reporting
//! views through [`ReportDatabase`] and the [`RowCursor`] it opens.

use crate::domain::{ReplicationSummary, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

/// One result row in text form, `None` for SQL NULL
pub type TextRow = Vec<Option<String>>;

/// Read access to replication state recorded on the replica
#[async_trait]
pub trait ReplicationCatalog: Send + Sync {
    /// Tables in the configured publication, summary table excluded
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog query fails.
    async fn published_tables(&self) -> Result<Vec<String>>;

    /// Summary rows written for `summary_date`
    ///
    /// # Errors
    ///
    /// Returns an error if the summary table cannot be read.
    async fn replication_summaries(&self, summary_date: NaiveDate)
        -> Result<Vec<ReplicationSummary>>;

    /// Reference WAL position as text, `None` when the server reports none
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn current_wal_lsn(&self) -> Result<Option<String>>;

    /// Rows of `table` created strictly before `end`
    async fn count_created_before(&self, table: &str, end: NaiveDateTime) -> Result<i64>;

    /// Rows of `table` whose update timestamp lies in `[start, end)`
    async fn count_updated_between(
        &self,
        table: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<i64>;
}

/// Access to the reporting data sources
#[async_trait]
pub trait ReportDatabase: Send + Sync {
    /// Executes a refresh command to completion
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails; nothing is retried.
    async fn refresh(&self, command: &str) -> Result<()>;

    /// Opens a forward-only, read-only cursor fetching `chunk_size` rows per round trip
    ///
    /// Column names are available as soon as this returns, including for
    /// empty results.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be prepared or executed.
    async fn open_cursor(&self, query: &str, chunk_size: usize) -> Result<Box<dyn RowCursor>>;
}

/// Server-side cursor over one query result
///
/// A cursor dropped without [`RowCursor::close`] must not hand its
/// connection back in an open transaction.
#[async_trait]
pub trait RowCursor: Send {
    /// Column names in projection order
    fn columns(&self) -> &[String];

    /// Next batch of rows, `None` once the result is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Vec<TextRow>>>;

    /// Closes the cursor and ends its transaction
    async fn close(self: Box<Self>) -> Result<()>;
}
