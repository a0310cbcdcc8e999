//! CLI command implementations

pub mod check;
pub mod run;
pub mod validate;

use super::exit_code;
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::config::ReportingConfig;
use crate::domain::ReportingError;
use std::sync::Arc;

/// Opens the pool and proves one connection works
///
/// On failure returns the exit code to terminate with.
pub(crate) async fn connect(config: &ReportingConfig) -> Result<Arc<PostgreSQLAdapter>, i32> {
    let client = PostgreSQLClient::new(config.postgresql.clone()).map_err(|e| {
        tracing::error!(error = %e, "Failed to create PostgreSQL client");
        eprintln!("Failed to initialize database client: {e}");
        exit_code_for(&e)
    })?;

    if let Err(e) = client.test_connection().await {
        tracing::error!(error = %e, database = %client.connection_string_safe(), "Database unreachable");
        eprintln!("Failed to connect to {}: {e}", client.connection_string_safe());
        return Err(exit_code::CONNECTION);
    }

    Ok(Arc::new(PostgreSQLAdapter::new(
        client,
        config.replication.clone(),
    )))
}

/// Maps an error escaping a command to its exit code
pub fn exit_code_for(error: &ReportingError) -> i32 {
    match error {
        ReportingError::Configuration(_) | ReportingError::Validation(_) => {
            exit_code::CONFIGURATION
        }
        ReportingError::ReplicationUnhealthy(_) => exit_code::ABORTED,
        ReportingError::Database(_) => exit_code::CONNECTION,
        _ => exit_code::FATAL,
    }
}
