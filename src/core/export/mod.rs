//! CSV export
//!
//! - [`CsvStreamWriter`] turns text rows into CSV records
//! - [`StreamingCsvExporter`] drives a database cursor through the writer

pub mod csv_writer;
pub mod exporter;

pub use csv_writer::CsvStreamWriter;
pub use exporter::StreamingCsvExporter;
