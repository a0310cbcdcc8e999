//! Replication health report
//!
//! Built fresh by every health check and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Key used for failures that concern the WAL source rather than a table
pub const WAL_SOURCE_KEY: &str = "wal_source";

/// Outcome of one replication health check
///
/// `failed_checks` maps table name to reason and is ordered by table name.
/// It is non-empty exactly when `healthy` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationHealthReport {
    /// Date whose summaries were reconciled
    pub summary_date: NaiveDate,

    /// No check recorded a failure
    pub healthy: bool,

    /// No summary is ahead of the reference WAL position
    pub wal_lsn_ok: bool,

    /// Every published table has a summary
    pub table_summary_ok: bool,

    /// Every summary matches the live counts
    pub table_counts_ok: bool,

    /// Table name to failure reason
    pub failed_checks: BTreeMap<String, String>,
}

impl ReplicationHealthReport {
    /// Starts a report with every check passing
    pub fn new(summary_date: NaiveDate) -> Self {
        Self {
            summary_date,
            healthy: true,
            wal_lsn_ok: true,
            table_summary_ok: true,
            table_counts_ok: true,
            failed_checks: BTreeMap::new(),
        }
    }

    /// A published table has no summary row for the date
    pub fn record_missing_summary(&mut self, table: &str) {
        self.table_summary_ok = false;
        self.add_failure(table, "Missing replication summary for table".to_string());
    }

    /// A summary's WAL position is ahead of the reference position
    pub fn record_wal_ahead(&mut self, table: &str, recorded: &str, current: &str) {
        self.wal_lsn_ok = false;
        self.add_failure(
            table,
            format!("WAL LSN in summary ({recorded}) is ahead of current WAL ({current})"),
        );
    }

    /// A WAL position could not be read or parsed
    pub fn record_wal_unusable(&mut self, key: &str, reason: String) {
        self.wal_lsn_ok = false;
        self.add_failure(key, reason);
    }

    /// Live counts differ from the summary
    pub fn record_count_mismatch(&mut self, table: &str, expected: (i64, i64), actual: (i64, i64)) {
        self.table_counts_ok = false;
        self.add_failure(
            table,
            format!(
                "Count mismatch — expected ({}/{}), actual ({}/{})",
                expected.0, expected.1, actual.0, actual.1
            ),
        );
    }

    /// Live counts for a summarized table could not be queried
    pub fn record_count_query_failed(&mut self, table: &str, error: &impl std::fmt::Display) {
        self.table_counts_ok = false;
        self.add_failure(table, format!("Count query failed: {error}"));
    }

    // A table failing several checks keeps every reason
    fn add_failure(&mut self, key: &str, reason: String) {
        self.healthy = false;
        self.failed_checks
            .entry(key.to_string())
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(&reason);
            })
            .or_insert(reason);
    }

    /// Whether exporting may go ahead
    ///
    /// With `ignore_row_count_mismatch`, a report whose only failures are
    /// count mismatches is accepted. WAL and missing-table failures never are.
    pub fn is_acceptable(&self, ignore_row_count_mismatch: bool) -> bool {
        self.healthy
            || (ignore_row_count_mismatch
                && self.wal_lsn_ok
                && self.table_summary_ok
                && !self.table_counts_ok)
    }

    /// Human-readable verdict
    pub fn summary(&self) -> String {
        if self.healthy {
            return format!("Replication is healthy for {}", self.summary_date);
        }

        let mut text = String::from("Replication issues found:\n");
        for (table, reason) in &self.failed_checks {
            let _ = writeln!(text, " - {table}: {reason}");
        }
        text
    }
}
