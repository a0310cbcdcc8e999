//! Report definition domain model
//!
//! A [`ReportDefinition`] describes one exported report: where its data lives,
//! how that data is refreshed, what is exported and under which file name.

use serde::{Deserialize, Serialize};

/// Static description of one report
///
/// # Examples
///
/// ```
/// use claims_reporting::domain::report::ReportDefinition;
///
/// let report = ReportDefinition::for_materialized_view(
///     "REPORT012",
///     "claims.mvw_report_012",
///     "report_012.csv",
/// );
/// assert_eq!(report.refresh_command, "REFRESH MATERIALIZED VIEW claims.mvw_report_012");
/// assert_eq!(report.export_query, "SELECT * FROM claims.mvw_report_012");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// Display name used in logs and the run summary
    pub report_name: String,

    /// View or table the export reads from
    pub data_source_name: String,

    /// Statement executed before the export to bring the data source up to date
    pub refresh_command: String,

    /// Query whose result becomes the CSV
    pub export_query: String,

    /// Object name under the `reports/` prefix
    pub file_name: String,
}

impl ReportDefinition {
    /// Creates a definition with every field given explicitly
    pub fn new(
        report_name: impl Into<String>,
        data_source_name: impl Into<String>,
        refresh_command: impl Into<String>,
        export_query: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            report_name: report_name.into(),
            data_source_name: data_source_name.into(),
            refresh_command: refresh_command.into(),
            export_query: export_query.into(),
            file_name: file_name.into(),
        }
    }

    /// Creates a definition backed by a materialized view
    ///
    /// Refreshes with `REFRESH MATERIALIZED VIEW` and exports every column.
    pub fn for_materialized_view(
        report_name: impl Into<String>,
        view_name: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        let view_name = view_name.into();
        Self {
            report_name: report_name.into(),
            refresh_command: default_refresh_command(&view_name),
            export_query: default_export_query(&view_name),
            data_source_name: view_name,
            file_name: file_name.into(),
        }
    }

    /// Replaces the refresh command, e.g. with a stored function call
    pub fn with_refresh_command(mut self, command: impl Into<String>) -> Self {
        self.refresh_command = command.into();
        self
    }

    /// Replaces the export query
    pub fn with_export_query(mut self, query: impl Into<String>) -> Self {
        self.export_query = query.into();
        self
    }

    /// Checks the definition is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.report_name.trim().is_empty() {
            return Err("report_name cannot be empty".to_string());
        }
        if self.data_source_name.trim().is_empty() {
            return Err(format!(
                "report '{}': data_source_name cannot be empty",
                self.report_name
            ));
        }
        if self.refresh_command.trim().is_empty() {
            return Err(format!(
                "report '{}': refresh_command cannot be empty",
                self.report_name
            ));
        }
        if self.export_query.trim().is_empty() {
            return Err(format!(
                "report '{}': export_query cannot be empty",
                self.report_name
            ));
        }
        if !self.file_name.ends_with(".csv") {
            return Err(format!(
                "report '{}': file_name must end with .csv, got '{}'",
                self.report_name, self.file_name
            ));
        }
        if self.file_name.contains('/') || self.file_name.contains('\\') {
            return Err(format!(
                "report '{}': file_name must not contain path separators",
                self.report_name
            ));
        }
        Ok(())
    }
}

/// Refresh statement used when a report does not configure one
pub fn default_refresh_command(data_source_name: &str) -> String {
    format!("REFRESH MATERIALIZED VIEW {data_source_name}")
}

/// Export query used when a report does not configure one
pub fn default_export_query(data_source_name: &str) -> String {
    format!("SELECT * FROM {data_source_name}")
}
