//! Buffered CSV writer over an async sink
//!
//! Fields are separated by `,` and records end with `\n`. A field is quoted
//! when it contains the separator, a double quote, CR or LF; embedded quotes
//! are doubled. SQL NULL is written as an empty field.

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// Writes CSV records to `W`, flushing every `flush_interval` rows
///
/// One line buffer is reused for every record.
pub struct CsvStreamWriter<W: AsyncWrite + Unpin + Send> {
    inner: BufWriter<W>,
    line: String,
    flush_interval: usize,
    unflushed_rows: usize,
    rows_written: u64,
}

impl<W: AsyncWrite + Unpin + Send> CsvStreamWriter<W> {
    /// Wraps `sink`; a `flush_interval` of zero is treated as one
    pub fn new(sink: W, flush_interval: usize) -> Self {
        Self {
            inner: BufWriter::new(sink),
            line: String::new(),
            flush_interval: flush_interval.max(1),
            unflushed_rows: 0,
            rows_written: 0,
        }
    }

    /// Writes the header record
    pub async fn write_header(&mut self, columns: &[String]) -> std::io::Result<()> {
        self.line.clear();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.line.push(SEPARATOR);
            }
            push_field(&mut self.line, column);
        }
        self.line.push('\n');
        self.inner.write_all(self.line.as_bytes()).await
    }

    /// Writes one data record
    pub async fn write_row(&mut self, row: &[Option<String>]) -> std::io::Result<()> {
        self.line.clear();
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                self.line.push(SEPARATOR);
            }
            if let Some(value) = value {
                push_field(&mut self.line, value);
            }
        }
        self.line.push('\n');
        self.inner.write_all(self.line.as_bytes()).await?;

        self.rows_written += 1;
        self.unflushed_rows += 1;
        if self.unflushed_rows >= self.flush_interval {
            self.inner.flush().await?;
            self.unflushed_rows = 0;
        }
        Ok(())
    }

    /// Flushes buffered records to the sink
    pub async fn flush(&mut self) -> std::io::Result<()> {
        self.unflushed_rows = 0;
        self.inner.flush().await
    }

    /// Shuts the sink down, writing out anything still buffered
    pub async fn close(&mut self) -> std::io::Result<()> {
        self.inner.shutdown().await
    }

    /// Data records written so far, header excluded
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Returns the underlying sink
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

fn push_field(line: &mut String, value: &str) {
    let needs_quoting = value
        .chars()
        .any(|c| c == SEPARATOR || c == QUOTE || c == '\r' || c == '\n');

    if needs_quoting {
        line.push(QUOTE);
        for c in value.chars() {
            if c == QUOTE {
                line.push(QUOTE);
            }
            line.push(c);
        }
        line.push(QUOTE);
    } else {
        line.push_str(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test_case("plain", "plain" ; "no quoting")]
    #[test_case("y,z", "\"y,z\"" ; "separator")]
    #[test_case("say \"hi\"", "\"say \"\"hi\"\"\"" ; "quotes doubled")]
    #[test_case("line\nbreak", "\"line\nbreak\"" ; "line feed")]
    #[test_case("carriage\rreturn", "\"carriage\rreturn\"" ; "carriage return")]
    #[test_case("", "" ; "empty")]
    fn test_push_field(input: &str, expected: &str) {
        let mut line = String::new();
        push_field(&mut line, input);
        assert_eq!(line, expected);
    }

    #[tokio::test]
    async fn test_header_and_rows() {
        let mut writer = CsvStreamWriter::new(Vec::new(), 1000);
        writer.write_header(&columns(&["a", "b", "c"])).await.unwrap();
        writer
            .write_row(&row(&[Some("1"), Some("x"), Some("y,z")]))
            .await
            .unwrap();
        writer.flush().await.unwrap();

        assert_eq!(writer.rows_written(), 1);
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "a,b,c\n1,x,\"y,z\"\n");
    }

    #[tokio::test]
    async fn test_null_is_empty_field() {
        let mut writer = CsvStreamWriter::new(Vec::new(), 1000);
        writer.write_row(&row(&[None, Some("2"), None])).await.unwrap();
        writer.close().await.unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, ",2,\n");
    }

    #[tokio::test]
    async fn test_zero_flush_interval_treated_as_one() {
        let writer = CsvStreamWriter::new(Vec::new(), 0);
        assert_eq!(writer.flush_interval, 1);
    }
}
