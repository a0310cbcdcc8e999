//! PostgreSQL adapter implementing database traits
//!
//! Implements [`ReplicationCatalog`] and [`ReportDatabase`] over a
//! [`PostgreSQLClient`].

use crate::adapters::database::traits::{ReplicationCatalog, ReportDatabase, RowCursor};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::cursor::PgChunkedCursor;
use crate::config::{ReplicationConfig, WalSource};
use crate::domain::{ReplicationSummary, ReportingError, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// PostgreSQL implementation of the database traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
    replication: ReplicationConfig,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient, replication: ReplicationConfig) -> Self {
        Self::new_with_arc(Arc::new(client), replication)
    }

    /// Create a new PostgreSQL adapter with an Arc-wrapped client
    pub fn new_with_arc(client: Arc<PostgreSQLClient>, replication: ReplicationConfig) -> Self {
        Self {
            client,
            replication,
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    fn qualified(&self, table: &str) -> String {
        format!(
            "{}.{}",
            quote_ident(&self.replication.schema),
            quote_ident(table)
        )
    }
}

#[async_trait]
impl ReplicationCatalog for PostgreSQLAdapter {
    async fn published_tables(&self) -> Result<Vec<String>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT tablename::text FROM pg_publication_tables \
                 WHERE pubname = $1 AND schemaname = $2 AND tablename <> $3 \
                 ORDER BY tablename",
                &[
                    &self.replication.publication_name,
                    &self.replication.schema,
                    &self.replication.summary_table,
                ],
            )
            .await?;

        Ok(rows.iter().map(|row| row.get::<_, String>(0)).collect())
    }

    async fn replication_summaries(
        &self,
        summary_date: NaiveDate,
    ) -> Result<Vec<ReplicationSummary>> {
        let sql = format!(
            "SELECT table_name::text, record_count::bigint, updated_count::bigint, wal_lsn::text \
             FROM {} WHERE summary_date = $1 ORDER BY table_name",
            self.qualified(&self.replication.summary_table)
        );

        let conn = self.client.get_connection().await?;
        let rows = conn.query(&sql, &[&summary_date]).await?;

        Ok(rows
            .iter()
            .map(|row| {
                ReplicationSummary::new(
                    row.get::<_, String>(0),
                    row.get::<_, i64>(1),
                    row.get::<_, i64>(2),
                    row.get::<_, Option<String>>(3).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn current_wal_lsn(&self) -> Result<Option<String>> {
        let conn = self.client.get_connection().await?;
        let row = match self.replication.wal_source {
            WalSource::Subscription => {
                conn.query_opt(
                    "SELECT latest_end_lsn::text FROM pg_stat_subscription \
                     WHERE subname = $1 AND relid IS NULL LIMIT 1",
                    &[&self.replication.subscription_name],
                )
                .await?
            }
            WalSource::Current => {
                conn.query_opt("SELECT pg_current_wal_lsn()::text", &[])
                    .await?
            }
        };

        Ok(row.and_then(|r| r.get::<_, Option<String>>(0)))
    }

    async fn count_created_before(&self, table: &str, end: NaiveDateTime) -> Result<i64> {
        let sql = format!(
            "SELECT count(*) FROM {} WHERE created_on < $1::timestamp",
            self.qualified(table)
        );
        let conn = self.client.get_connection().await?;
        let row = conn.query_one(&sql, &[&end]).await?;
        Ok(row.get(0))
    }

    async fn count_updated_between(
        &self,
        table: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<i64> {
        let sql = format!(
            "SELECT count(*) FROM {} WHERE updated_on >= $1::timestamp AND updated_on < $2::timestamp",
            self.qualified(table)
        );
        let conn = self.client.get_connection().await?;
        let row = conn.query_one(&sql, &[&start, &end]).await?;
        Ok(row.get(0))
    }
}

#[async_trait]
impl ReportDatabase for PostgreSQLAdapter {
    async fn refresh(&self, command: &str) -> Result<()> {
        if command.trim().is_empty() {
            return Err(ReportingError::Validation(
                "refresh command is empty".to_string(),
            ));
        }
        let conn = self.client.get_connection().await?;
        conn.batch_execute(command).await?;
        Ok(())
    }

    async fn open_cursor(&self, query: &str, chunk_size: usize) -> Result<Box<dyn RowCursor>> {
        let conn = self.client.get_connection().await?;
        let cursor = PgChunkedCursor::open(conn, query, chunk_size).await?;
        Ok(Box::new(cursor))
    }
}

/// Quotes an identifier, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("claim", "\"claim\"" ; "plain")]
    #[test_case("Claim", "\"Claim\"" ; "case preserved")]
    #[test_case("we\"ird", "\"we\"\"ird\"" ; "embedded quote")]
    fn test_quote_ident(input: &str, expected: &str) {
        assert_eq!(quote_ident(input), expected);
    }
}
