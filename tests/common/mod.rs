//! In-memory fakes for the database and object store seams

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use claims_reporting::adapters::database::{ReplicationCatalog, ReportDatabase, RowCursor, TextRow};
use claims_reporting::adapters::storage::{ensure_csv, object_key, ObjectUploader};
use claims_reporting::domain::{ReplicationSummary, ReportingError, Result, UploadError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Replica catalog backed by fixed answers
#[derive(Default)]
pub struct FakeCatalog {
    pub published: Vec<String>,
    pub summaries: Vec<ReplicationSummary>,
    pub current_wal: Option<String>,
    /// table -> (records created before end, rows updated within the day)
    pub live_counts: HashMap<String, (i64, i64)>,
    /// Tables whose count queries fail
    pub unreadable: HashSet<String>,
    pub summary_dates: Mutex<Vec<NaiveDate>>,
    pub count_windows: Mutex<Vec<(String, NaiveDateTime, Option<NaiveDateTime>)>>,
}

impl FakeCatalog {
    /// Three tables whose summaries match their live counts exactly
    pub fn healthy() -> Self {
        let tables = [("claim", 3, 1), ("claim_summary_fee", 2, 0), ("client", 5, 2)];
        Self {
            published: tables.iter().map(|(t, _, _)| t.to_string()).collect(),
            summaries: tables
                .iter()
                .map(|(t, r, u)| ReplicationSummary::new(*t, *r, *u, "0/16B3748"))
                .collect(),
            current_wal: Some("0/16B3800".to_string()),
            live_counts: tables
                .iter()
                .map(|(t, r, u)| (t.to_string(), (*r, *u)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_live_counts(mut self, table: &str, records: i64, updated: i64) -> Self {
        self.live_counts.insert(table.to_string(), (records, updated));
        self
    }

    pub fn with_summary_wal(mut self, table: &str, wal: &str) -> Self {
        for summary in self.summaries.iter_mut().filter(|s| s.table_name == table) {
            summary.wal_lsn = wal.to_string();
        }
        self
    }

    pub fn without_summary(mut self, table: &str) -> Self {
        self.summaries.retain(|s| s.table_name != table);
        self
    }

    /// Adds a summary for a table that no longer exists on the replica
    pub fn with_dropped_table(mut self, table: &str) -> Self {
        self.summaries
            .push(ReplicationSummary::new(table, 1, 0, "0/16B3748"));
        self.unreadable.insert(table.to_string());
        self
    }

    fn check_readable(&self, table: &str) -> Result<()> {
        if self.unreadable.contains(table) {
            return Err(ReportingError::Database(format!(
                "relation \"claims.{table}\" does not exist"
            )));
        }
        Ok(())
    }

    pub fn with_current_wal(mut self, wal: Option<&str>) -> Self {
        self.current_wal = wal.map(str::to_string);
        self
    }
}

#[async_trait]
impl ReplicationCatalog for FakeCatalog {
    async fn published_tables(&self) -> Result<Vec<String>> {
        Ok(self.published.clone())
    }

    async fn replication_summaries(&self, summary_date: NaiveDate) -> Result<Vec<ReplicationSummary>> {
        self.summary_dates.lock().unwrap().push(summary_date);
        Ok(self.summaries.clone())
    }

    async fn current_wal_lsn(&self) -> Result<Option<String>> {
        Ok(self.current_wal.clone())
    }

    async fn count_created_before(&self, table: &str, end: NaiveDateTime) -> Result<i64> {
        self.check_readable(table)?;
        self.count_windows
            .lock()
            .unwrap()
            .push((table.to_string(), end, None));
        Ok(self.live_counts.get(table).map(|c| c.0).unwrap_or(0))
    }

    async fn count_updated_between(
        &self,
        table: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<i64> {
        self.check_readable(table)?;
        self.count_windows
            .lock()
            .unwrap()
            .push((table.to_string(), start, Some(end)));
        Ok(self.live_counts.get(table).map(|c| c.1).unwrap_or(0))
    }
}

/// Query result served by [`FakeDatabase`]
#[derive(Clone, Default)]
pub struct FakeResult {
    pub columns: Vec<String>,
    pub rows: Vec<TextRow>,
    /// Fail when asked for the chunk with this index
    pub fail_at_chunk: Option<usize>,
}

impl FakeResult {
    pub fn new(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(|v| v.map(str::to_string)).collect())
                .collect(),
            fail_at_chunk: None,
        }
    }

    pub fn failing_at_chunk(mut self, chunk: usize) -> Self {
        self.fail_at_chunk = Some(chunk);
        self
    }
}

/// Reporting database that records every call
#[derive(Default)]
pub struct FakeDatabase {
    pub results: HashMap<String, FakeResult>,
    pub failing_refreshes: HashSet<String>,
    pub refreshes: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<(String, usize)>>,
    pub closed: Arc<Mutex<usize>>,
}

impl FakeDatabase {
    pub fn with_result(mut self, query: &str, result: FakeResult) -> Self {
        self.results.insert(query.to_string(), result);
        self
    }

    pub fn with_failing_refresh(mut self, command: &str) -> Self {
        self.failing_refreshes.insert(command.to_string());
        self
    }

    pub fn refresh_calls(&self) -> Vec<String> {
        self.refreshes.lock().unwrap().clone()
    }

    pub fn opened_queries(&self) -> Vec<String> {
        self.opened.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn closed_cursors(&self) -> usize {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl ReportDatabase for FakeDatabase {
    async fn refresh(&self, command: &str) -> Result<()> {
        self.refreshes.lock().unwrap().push(command.to_string());
        if self.failing_refreshes.contains(command) {
            return Err(ReportingError::Database(format!(
                "relation does not exist: {command}"
            )));
        }
        Ok(())
    }

    async fn open_cursor(&self, query: &str, chunk_size: usize) -> Result<Box<dyn RowCursor>> {
        self.opened
            .lock()
            .unwrap()
            .push((query.to_string(), chunk_size));
        let result = self
            .results
            .get(query)
            .cloned()
            .ok_or_else(|| ReportingError::Database(format!("syntax error in: {query}")))?;

        Ok(Box::new(FakeCursor {
            columns: result.columns,
            chunks: result
                .rows
                .chunks(chunk_size.max(1))
                .map(<[TextRow]>::to_vec)
                .collect(),
            next: 0,
            fail_at_chunk: result.fail_at_chunk,
            closed: self.closed.clone(),
        }))
    }
}

struct FakeCursor {
    columns: Vec<String>,
    chunks: Vec<Vec<TextRow>>,
    next: usize,
    fail_at_chunk: Option<usize>,
    closed: Arc<Mutex<usize>>,
}

#[async_trait]
impl RowCursor for FakeCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn next_chunk(&mut self) -> Result<Option<Vec<TextRow>>> {
        if self.fail_at_chunk == Some(self.next) {
            return Err(ReportingError::Database("connection reset".to_string()));
        }
        let chunk = self.chunks.get(self.next).cloned();
        self.next += 1;
        Ok(chunk)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        *self.closed.lock().unwrap() += 1;
        Ok(())
    }
}

/// One captured upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub local_file: PathBuf,
    pub file_name: String,
    pub contents: String,
}

/// Uploader that reads the artifact back into memory
#[derive(Default)]
pub struct RecordingUploader {
    pub failing: HashSet<String>,
    pub uploads: Mutex<Vec<Upload>>,
}

impl RecordingUploader {
    pub fn failing_for(file_name: &str) -> Self {
        Self {
            failing: [file_name.to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectUploader for RecordingUploader {
    async fn upload(&self, local_file: &Path, file_name: &str) -> std::result::Result<String, UploadError> {
        ensure_csv(local_file, file_name)?;
        let contents = tokio::fs::read_to_string(local_file)
            .await
            .map_err(|e| UploadError::Io {
                path: local_file.to_path_buf(),
                message: e.to_string(),
            })?;
        self.uploads.lock().unwrap().push(Upload {
            local_file: local_file.to_path_buf(),
            file_name: file_name.to_string(),
            contents,
        });
        if self.failing.contains(file_name) {
            return Err(UploadError::Transfer("access denied".to_string()));
        }
        Ok(object_key("reports", file_name))
    }
}
