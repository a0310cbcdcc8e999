//! Replication health gate
//!
//! Reconciles the externally written replication summary for yesterday
//! against the replica itself. Three checks run in order and all of them
//! always run, so one report carries every problem found:
//!
//! 1. every published table has a summary row
//! 2. no summary's WAL position is ahead of the reference position
//! 3. every summary's counts match the live table
//!
//! A table whose counts cannot be queried fails the count check for that
//! table only; the remaining tables are still reconciled.

use super::clock::Clock;
use super::report::{ReplicationHealthReport, WAL_SOURCE_KEY};
use crate::adapters::database::ReplicationCatalog;
use crate::domain::{ReplicationSummary, ReportingError, Result, WalLsn};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Runs the replication health checks
pub struct ReplicationHealthChecker {
    catalog: Arc<dyn ReplicationCatalog>,
    clock: Arc<dyn Clock>,
}

impl ReplicationHealthChecker {
    pub fn new(catalog: Arc<dyn ReplicationCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock }
    }

    /// Checks replication as of yesterday
    ///
    /// # Errors
    ///
    /// Returns an error only when the replica cannot be queried. Failed
    /// checks are reported in the returned report, not as errors.
    pub async fn check_health(&self) -> Result<ReplicationHealthReport> {
        let as_of = self
            .clock
            .today()
            .pred_opt()
            .ok_or_else(|| ReportingError::Other("no day precedes the current date".to_string()))?;
        let (start, end) = day_window(as_of)?;

        tracing::info!(summary_date = %as_of, "Checking replication health");

        let mut report = ReplicationHealthReport::new(as_of);

        let mut summaries = self.catalog.replication_summaries(as_of).await?;
        summaries.sort_by(|a, b| a.table_name.cmp(&b.table_name));

        self.check_missing_tables(&summaries, &mut report).await?;
        self.check_wal_progress(&summaries, &mut report).await?;
        self.check_counts(&summaries, start, end, &mut report).await;

        if report.healthy {
            tracing::info!(summary_date = %as_of, "{}", report.summary());
        } else {
            tracing::warn!(
                summary_date = %as_of,
                wal_lsn_ok = report.wal_lsn_ok,
                table_summary_ok = report.table_summary_ok,
                table_counts_ok = report.table_counts_ok,
                "{}",
                report.summary()
            );
        }

        Ok(report)
    }

    async fn check_missing_tables(
        &self,
        summaries: &[ReplicationSummary],
        report: &mut ReplicationHealthReport,
    ) -> Result<()> {
        let summarized: BTreeSet<&str> = summaries.iter().map(|s| s.table_name.as_str()).collect();
        let published: BTreeSet<String> = self.catalog.published_tables().await?.into_iter().collect();

        for table in published.iter().filter(|t| !summarized.contains(t.as_str())) {
            report.record_missing_summary(table);
        }
        Ok(())
    }

    async fn check_wal_progress(
        &self,
        summaries: &[ReplicationSummary],
        report: &mut ReplicationHealthReport,
    ) -> Result<()> {
        let Some(current_text) = self.catalog.current_wal_lsn().await? else {
            report.record_wal_unusable(
                WAL_SOURCE_KEY,
                "Current WAL LSN is unavailable".to_string(),
            );
            return Ok(());
        };

        let current = match WalLsn::parse(&current_text) {
            Ok(lsn) => lsn,
            Err(e) => {
                report.record_wal_unusable(WAL_SOURCE_KEY, e);
                return Ok(());
            }
        };

        for summary in summaries {
            match summary.lsn() {
                Ok(recorded) if recorded > current => {
                    report.record_wal_ahead(&summary.table_name, &summary.wal_lsn, &current_text);
                }
                Ok(_) => {}
                Err(e) => report.record_wal_unusable(&summary.table_name, e),
            }
        }
        Ok(())
    }

    async fn check_counts(
        &self,
        summaries: &[ReplicationSummary],
        start: NaiveDateTime,
        end: NaiveDateTime,
        report: &mut ReplicationHealthReport,
    ) {
        for summary in summaries {
            let table = summary.table_name.as_str();
            let (records, updated) = match self.live_counts(table, start, end).await {
                Ok(counts) => counts,
                Err(e) => {
                    tracing::warn!(table, error = %e, "Count query failed");
                    report.record_count_query_failed(table, &e);
                    continue;
                }
            };

            tracing::debug!(
                table,
                expected_records = summary.record_count,
                expected_updated = summary.updated_count,
                records,
                updated,
                "Reconciled table counts"
            );

            if records != summary.record_count || updated != summary.updated_count {
                report.record_count_mismatch(
                    table,
                    (summary.record_count, summary.updated_count),
                    (records, updated),
                );
            }
        }
    }

    async fn live_counts(
        &self,
        table: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(i64, i64)> {
        let records = self.catalog.count_created_before(table, end).await?;
        let updated = self.catalog.count_updated_between(table, start, end).await?;
        Ok((records, updated))
    }
}

/// `[start of day, start of next day)`
fn day_window(day: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let next = day
        .succ_opt()
        .ok_or_else(|| ReportingError::Other(format!("no day follows {day}")))?;
    Ok((day.and_time(chrono::NaiveTime::MIN), next.and_time(chrono::NaiveTime::MIN)))
}
