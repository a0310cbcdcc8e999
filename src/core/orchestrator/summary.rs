//! Run summary and reporting
//!
//! One [`ReportOutcome`] per attempted report, collected into a [`RunSummary`].

use crate::core::health::ReplicationHealthReport;
use crate::domain::ReportDefinition;
use serde::Serialize;
use std::time::Duration;

/// How one report ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
    /// Exported and uploaded
    Succeeded { rows: u64, object_key: String },
    /// Refresh command failed; nothing was exported
    RefreshFailed { error: String },
    /// Export into the temporary artifact failed
    ExportFailed { error: String },
    /// Artifact was produced but the upload failed
    UploadFailed { rows: u64, error: String },
}

impl ReportStatus {
    /// Stage name used in logs
    pub fn stage(&self) -> &'static str {
        match self {
            ReportStatus::Succeeded { .. } => "done",
            ReportStatus::RefreshFailed { .. } => "refresh",
            ReportStatus::ExportFailed { .. } => "export",
            ReportStatus::UploadFailed { .. } => "upload",
        }
    }
}

/// Result of processing one report
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report_name: String,
    pub file_name: String,
    #[serde(flatten)]
    pub status: ReportStatus,
    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

impl ReportOutcome {
    pub fn new(report: &ReportDefinition, status: ReportStatus, duration: Duration) -> Self {
        Self {
            report_name: report.report_name.clone(),
            file_name: report.file_name.clone(),
            status,
            duration,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ReportStatus::Succeeded { .. })
    }
}

/// Summary of one complete run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Health verdict; `None` when the gate is disabled
    pub health: Option<ReplicationHealthReport>,

    /// Outcomes in report order
    pub outcomes: Vec<ReportOutcome>,

    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty run summary
    pub fn new(health: Option<ReplicationHealthReport>) -> Self {
        Self {
            health,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_outcome(&mut self, outcome: ReportOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Every report succeeded
    pub fn is_successful(&self) -> bool {
        self.failed() == 0
    }

    /// Rows exported across successful reports
    pub fn total_rows(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                ReportStatus::Succeeded { rows, .. } => rows,
                _ => 0,
            })
            .sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            reports = self.outcomes.len(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            total_rows = self.total_rows(),
            duration_ms = self.duration.as_millis() as u64,
            "Report run completed"
        );

        for outcome in self.outcomes.iter().filter(|o| !o.is_success()) {
            tracing::warn!(
                report = %outcome.report_name,
                stage = outcome.status.stage(),
                "Report did not complete"
            );
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ReportDefinition {
        ReportDefinition::for_materialized_view("REPORT000", "claims.mvw_report_000", "report_000.csv")
    }

    #[test]
    fn test_run_summary_counts() {
        let mut summary = RunSummary::new(None);
        summary.add_outcome(ReportOutcome::new(
            &report(),
            ReportStatus::Succeeded {
                rows: 10,
                object_key: "reports/report_000.csv".to_string(),
            },
            Duration::from_millis(5),
        ));
        summary.add_outcome(ReportOutcome::new(
            &report(),
            ReportStatus::RefreshFailed {
                error: "boom".to_string(),
            },
            Duration::from_millis(1),
        ));

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total_rows(), 10);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_empty_summary_is_successful() {
        let summary = RunSummary::new(None).with_duration(Duration::from_secs(2));
        assert!(summary.is_successful());
        assert_eq!(summary.duration, Duration::from_secs(2));
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = ReportOutcome::new(
            &report(),
            ReportStatus::UploadFailed {
                rows: 3,
                error: "denied".to_string(),
            },
            Duration::from_millis(42),
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "upload_failed");
        assert_eq!(json["rows"], 3);
        assert_eq!(json["duration"], 42);
        assert_eq!(json["report_name"], "REPORT000");
    }

    #[test]
    fn test_stage_names() {
        let status = ReportStatus::ExportFailed {
            error: "x".to_string(),
        };
        assert_eq!(status.stage(), "export");
    }
}
