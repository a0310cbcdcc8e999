//! Streaming query-to-CSV export
//!
//! Rows move from a server-side cursor to the CSV writer one chunk at a
//! time, so memory use is bounded by the chunk size regardless of the
//! result size.

use super::csv_writer::CsvStreamWriter;
use crate::adapters::database::{ReportDatabase, RowCursor};
use crate::domain::ExportError;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Exports query results as CSV
pub struct StreamingCsvExporter {
    database: Arc<dyn ReportDatabase>,
    chunk_size: usize,
    flush_interval: usize,
}

impl StreamingCsvExporter {
    /// `chunk_size` rows are fetched per round trip; the output is flushed
    /// every `flush_interval` rows
    pub fn new(database: Arc<dyn ReportDatabase>, chunk_size: usize, flush_interval: usize) -> Self {
        Self {
            database,
            chunk_size,
            flush_interval,
        }
    }

    /// Writes the result of `query` to `destination` and returns the row count
    ///
    /// The header is always written, so an empty result yields a header-only
    /// file. `destination` is shut down before this returns, on success and
    /// on failure.
    ///
    /// # Errors
    ///
    /// - [`ExportError::EmptyQuery`] if `query` is blank
    /// - [`ExportError::Query`] if the cursor cannot be opened or advanced
    /// - [`ExportError::Io`] if writing to `destination` fails
    pub async fn export<W>(&self, query: &str, mut destination: W) -> Result<u64, ExportError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        if query.trim().is_empty() {
            let _ = destination.shutdown().await;
            return Err(ExportError::EmptyQuery);
        }

        let mut writer = CsvStreamWriter::new(destination, self.flush_interval);
        let streamed = self.stream(query, &mut writer).await;
        let closed = writer.close().await;

        let rows = streamed?;
        closed?;
        Ok(rows)
    }

    /// Exports into a newly created file at `path`
    ///
    /// # Errors
    ///
    /// Same as [`StreamingCsvExporter::export`], plus [`ExportError::Io`] if
    /// the file cannot be created.
    pub async fn export_to_file(&self, query: &str, path: &Path) -> Result<u64, ExportError> {
        if query.trim().is_empty() {
            return Err(ExportError::EmptyQuery);
        }
        let file = tokio::fs::File::create(path).await?;
        self.export(query, file).await
    }

    async fn stream<W>(
        &self,
        query: &str,
        writer: &mut CsvStreamWriter<W>,
    ) -> Result<u64, ExportError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut cursor = self
            .database
            .open_cursor(query, self.chunk_size)
            .await?;

        // On error the cursor is dropped unclosed and its connection discarded
        write_rows(cursor.as_mut(), writer).await?;

        cursor.close().await?;

        Ok(writer.rows_written())
    }
}

async fn write_rows<W>(
    cursor: &mut dyn RowCursor,
    writer: &mut CsvStreamWriter<W>,
) -> Result<(), ExportError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_header(cursor.columns()).await?;

    let mut chunk_index = 0_u64;
    while let Some(rows) = cursor.next_chunk().await? {
        chunk_index += 1;
        for row in &rows {
            writer.write_row(row).await?;
        }
        crate::log_chunk_progress!(chunk_index, writer.rows_written());
    }

    writer.flush().await?;
    Ok(())
}
