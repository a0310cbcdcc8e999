//! Integration tests for the replication health gate

mod common;

use common::{date, FakeCatalog};
use claims_reporting::core::health::{FixedClock, ReplicationHealthChecker, ReplicationHealthReport};
use std::sync::Arc;

async fn check(catalog: FakeCatalog) -> ReplicationHealthReport {
    check_with(Arc::new(catalog)).await
}

async fn check_with(catalog: Arc<FakeCatalog>) -> ReplicationHealthReport {
    let checker = ReplicationHealthChecker::new(catalog, Arc::new(FixedClock(date(2024, 6, 1))));
    checker.check_health().await.expect("health check should run")
}

#[tokio::test]
async fn test_matching_summaries_are_healthy() {
    let report = check(FakeCatalog::healthy()).await;

    assert!(report.healthy);
    assert!(report.wal_lsn_ok && report.table_summary_ok && report.table_counts_ok);
    assert!(report.failed_checks.is_empty());
    assert_eq!(report.summary(), "Replication is healthy for 2024-05-31");
}

#[tokio::test]
async fn test_summary_date_is_yesterday() {
    let catalog = Arc::new(FakeCatalog::healthy());
    let report = check_with(catalog.clone()).await;

    assert_eq!(report.summary_date, date(2024, 5, 31));
    assert_eq!(*catalog.summary_dates.lock().unwrap(), vec![date(2024, 5, 31)]);
}

#[tokio::test]
async fn test_counts_use_day_window() {
    let catalog = Arc::new(FakeCatalog::healthy());
    check_with(catalog.clone()).await;

    let windows = catalog.count_windows.lock().unwrap().clone();
    let start = date(2024, 5, 31).and_hms_opt(0, 0, 0).unwrap();
    let end = date(2024, 6, 1).and_hms_opt(0, 0, 0).unwrap();

    assert!(windows.contains(&("claim".to_string(), end, None)));
    assert!(windows.contains(&("claim".to_string(), start, Some(end))));
}

#[tokio::test]
async fn test_count_mismatch_reports_single_table() {
    let report = check(FakeCatalog::healthy().with_live_counts("claim", 2, 1)).await;

    assert!(!report.healthy);
    assert!(!report.table_counts_ok);
    assert!(report.wal_lsn_ok);
    assert!(report.table_summary_ok);
    assert_eq!(report.failed_checks.len(), 1);
    assert_eq!(
        report.failed_checks["claim"],
        "Count mismatch — expected (3/1), actual (2/1)"
    );
}

#[tokio::test]
async fn test_updated_count_mismatch_detected() {
    let report = check(FakeCatalog::healthy().with_live_counts("client", 5, 3)).await;

    assert_eq!(
        report.failed_checks["client"],
        "Count mismatch — expected (5/2), actual (5/3)"
    );
}

#[tokio::test]
async fn test_missing_summary_for_published_table() {
    let report = check(FakeCatalog::healthy().without_summary("client")).await;

    assert!(!report.healthy);
    assert!(!report.table_summary_ok);
    assert!(report.table_counts_ok);
    assert_eq!(
        report.failed_checks["client"],
        "Missing replication summary for table"
    );
}

#[tokio::test]
async fn test_summary_ahead_of_current_wal() {
    let report = check(FakeCatalog::healthy().with_summary_wal("claim_summary_fee", "1/0")).await;

    assert!(!report.healthy);
    assert!(!report.wal_lsn_ok);
    assert!(report.table_counts_ok);
    assert_eq!(
        report.failed_checks["claim_summary_fee"],
        "WAL LSN in summary (1/0) is ahead of current WAL (0/16B3800)"
    );
}

#[tokio::test]
async fn test_wal_compared_numerically() {
    // "0/9" sorts after "0/10" as text but is numerically behind it
    let catalog = FakeCatalog::healthy()
        .with_summary_wal("claim", "0/9")
        .with_summary_wal("client", "0/9")
        .with_summary_wal("claim_summary_fee", "0/9")
        .with_current_wal(Some("0/10"));
    let report = check(catalog).await;

    assert!(report.wal_lsn_ok);
    assert!(report.healthy);
}

#[tokio::test]
async fn test_unavailable_wal_fails_wal_check() {
    let report = check(FakeCatalog::healthy().with_current_wal(None)).await;

    assert!(!report.healthy);
    assert!(!report.wal_lsn_ok);
    assert_eq!(
        report.failed_checks["wal_source"],
        "Current WAL LSN is unavailable"
    );
}

#[tokio::test]
async fn test_all_checks_run_and_accumulate() {
    let catalog = FakeCatalog::healthy()
        .without_summary("client")
        .with_summary_wal("claim", "FF/0")
        .with_live_counts("claim", 4, 1)
        .with_live_counts("claim_summary_fee", 1, 0);
    let report = check(catalog).await;

    assert!(!report.wal_lsn_ok && !report.table_summary_ok && !report.table_counts_ok);
    assert_eq!(
        report.failed_checks.keys().collect::<Vec<_>>(),
        vec!["claim", "claim_summary_fee", "client"]
    );
    assert!(report.failed_checks["claim"].contains("; Count mismatch"));
    assert!(report.summary().starts_with("Replication issues found:\n - claim: WAL LSN"));
}

#[tokio::test]
async fn test_failed_count_query_keeps_other_results() {
    let catalog = FakeCatalog::healthy()
        .with_live_counts("claim", 2, 1)
        .with_live_counts("client", 5, 3)
        .with_dropped_table("aaa_legacy");
    let report = check(catalog).await;

    assert!(!report.healthy);
    assert!(!report.table_counts_ok);
    assert!(report.wal_lsn_ok && report.table_summary_ok);
    assert_eq!(
        report.failed_checks.keys().collect::<Vec<_>>(),
        vec!["aaa_legacy", "claim", "client"]
    );
    assert_eq!(
        report.failed_checks["aaa_legacy"],
        "Count query failed: Database error: relation \"claims.aaa_legacy\" does not exist"
    );
    assert_eq!(
        report.failed_checks["claim"],
        "Count mismatch — expected (3/1), actual (2/1)"
    );
    assert_eq!(
        report.failed_checks["client"],
        "Count mismatch — expected (5/2), actual (5/3)"
    );
}

#[tokio::test]
async fn test_repeated_checks_are_identical() {
    let catalog = Arc::new(FakeCatalog::healthy().with_live_counts("claim", 2, 1));

    let first = check_with(catalog.clone()).await;
    let second = check_with(catalog).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_mismatch_only_report_is_acceptable_with_escape_hatch() {
    let counts_only = check(FakeCatalog::healthy().with_live_counts("claim", 2, 1)).await;
    assert!(!counts_only.is_acceptable(false));
    assert!(counts_only.is_acceptable(true));

    let wal_ahead = check(
        FakeCatalog::healthy()
            .with_live_counts("claim", 2, 1)
            .with_summary_wal("claim", "1/0"),
    )
    .await;
    assert!(!wal_ahead.is_acceptable(true));
}
