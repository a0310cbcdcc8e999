//! Server-side cursor over a pooled connection
//!
//! The cursor owns its connection for its whole life:
//! `BEGIN READ ONLY`, `DECLARE ... NO SCROLL CURSOR`, repeated
//! `FETCH FORWARD n`, then `CLOSE` and `COMMIT`. Results travel over the
//! simple-query protocol so every value arrives as text, which is what the
//! CSV writer needs.

use crate::adapters::database::traits::{RowCursor, TextRow};
use crate::domain::{ReportingError, Result};
use async_trait::async_trait;
use deadpool_postgres::Object;
use tokio_postgres::SimpleQueryMessage;
use uuid::Uuid;

/// Forward-only cursor fetching a fixed number of rows per round trip
pub struct PgChunkedCursor {
    /// `None` once closed
    conn: Option<Object>,
    name: String,
    columns: Vec<String>,
    state: FetchState,
}

impl PgChunkedCursor {
    /// Opens a cursor for `query` on `conn`
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the query
    /// fails. The connection is discarded in that case.
    pub async fn open(conn: Object, query: &str, chunk_size: usize) -> Result<Self> {
        let name = format!("report_cursor_{}", Uuid::new_v4().simple());
        let mut cursor = Self {
            conn: Some(conn),
            name,
            columns: Vec::new(),
            state: FetchState::new(chunk_size),
        };

        let declare = format!(
            "BEGIN READ ONLY; DECLARE {} NO SCROLL CURSOR FOR {}",
            cursor.name,
            query.trim().trim_end_matches(';')
        );
        cursor.connection()?.batch_execute(&declare).await?;

        let (columns, rows) = cursor.fetch().await?;
        cursor.columns = columns;
        cursor.state.pending = Some(rows);

        tracing::debug!(cursor = %cursor.name, columns = cursor.columns.len(), "Cursor opened");
        Ok(cursor)
    }

    fn connection(&self) -> Result<&Object> {
        self.conn
            .as_ref()
            .ok_or_else(|| ReportingError::Database(format!("cursor {} is closed", self.name)))
    }

    async fn fetch(&mut self) -> Result<(Vec<String>, Vec<TextRow>)> {
        let sql = format!("FETCH FORWARD {} FROM {}", self.state.chunk_size, self.name);
        let messages = self.connection()?.simple_query(&sql).await?;

        let mut described: Option<Vec<String>> = None;
        let mut row_columns: Option<Vec<String>> = None;
        let mut rows: Vec<TextRow> = Vec::new();
        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(description) => {
                    described = Some(description.iter().map(|c| c.name().to_string()).collect());
                }
                SimpleQueryMessage::Row(row) => {
                    if row_columns.is_none() {
                        row_columns =
                            Some(row.columns().iter().map(|c| c.name().to_string()).collect());
                    }
                    rows.push((0..row.len()).map(|i| row.get(i).map(str::to_string)).collect());
                }
                _ => {}
            }
        }

        self.state.fetched(rows.len());
        Ok((resolve_columns(described, row_columns), rows))
    }
}

#[async_trait]
impl RowCursor for PgChunkedCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn next_chunk(&mut self) -> Result<Option<Vec<TextRow>>> {
        match self.state.next_step() {
            NextStep::Emit(rows) => Ok(Some(rows)),
            NextStep::Done => Ok(None),
            NextStep::Fetch => {
                let (_, rows) = self.fetch().await?;
                Ok((!rows.is_empty()).then_some(rows))
            }
        }
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        let sql = format!("CLOSE {}; COMMIT", self.name);
        self.connection()?.batch_execute(&sql).await?;

        // Connection is back outside any transaction and may be reused
        self.conn.take();
        tracing::debug!(cursor = %self.name, "Cursor closed");
        Ok(())
    }
}

impl Drop for PgChunkedCursor {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            // Still inside the read-only transaction: close the connection
            // instead of returning it to the pool
            tracing::warn!(cursor = %self.name, "Cursor dropped before close, discarding connection");
            drop(Object::take(conn));
        }
    }
}

/// What `next_chunk` does next
#[derive(Debug, PartialEq, Eq)]
enum NextStep {
    Emit(Vec<TextRow>),
    Fetch,
    Done,
}

/// Chunk bookkeeping, independent of the connection
#[derive(Debug)]
struct FetchState {
    chunk_size: usize,
    /// First chunk, fetched while opening to learn the column names
    pending: Option<Vec<TextRow>>,
    exhausted: bool,
}

impl FetchState {
    fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            pending: None,
            exhausted: false,
        }
    }

    /// A batch shorter than the chunk size is the last one
    fn fetched(&mut self, rows: usize) {
        if rows < self.chunk_size {
            self.exhausted = true;
        }
    }

    fn next_step(&mut self) -> NextStep {
        if let Some(rows) = self.pending.take() {
            if !rows.is_empty() {
                return NextStep::Emit(rows);
            }
        }
        if self.exhausted {
            NextStep::Done
        } else {
            NextStep::Fetch
        }
    }
}

/// The row description wins; rows only fill in when it is absent
fn resolve_columns(described: Option<Vec<String>>, from_rows: Option<Vec<String>>) -> Vec<String> {
    described.or(from_rows).unwrap_or_default()
}
