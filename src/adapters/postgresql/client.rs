//! PostgreSQL client implementation
//!
//! Connection pooling over the replica with optional TLS.

use crate::config::schema::PostgreSQLConfig;
use crate::config::redact_connection_string;
use crate::domain::{ReportingError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;

/// Pooled PostgreSQL client
///
/// Every connection handed out has the configured `statement_timeout`
/// applied to its session.
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until the first call to
    /// [`PostgreSQLClient::get_connection`].
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid, the TLS
    /// connector cannot be built or the pool cannot be created.
    pub fn new(config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                ReportingError::Configuration(format!(
                    "Invalid PostgreSQL connection string: {e}"
                ))
            })?;

        pg_config.ssl_mode(ssl_mode(&config.ssl_mode)?);
        pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
            ReportingError::Configuration(format!("Failed to build TLS connector: {e}"))
        })?;
        let tls = MakeTlsConnector::new(connector);

        let manager = Manager::from_config(
            pg_config,
            tls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .build()
            .map_err(|e| {
                ReportingError::Database(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| ReportingError::Database(format!("Connection test failed: {e}")))?;

        tracing::info!(
            database = %self.connection_string_safe(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a connection from the pool with the session statement timeout set
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(|e| {
            ReportingError::Database(format!("Failed to get connection from pool: {e}"))
        })?;

        client
            .batch_execute(&statement_timeout_sql(self.config.statement_timeout_seconds))
            .await
            .map_err(|e| {
                ReportingError::Database(format!("Failed to set statement timeout: {e}"))
            })?;

        Ok(client)
    }

    /// Get the connection string (without password)
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(&self.config.connection_string)
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn ssl_mode(value: &str) -> Result<SslMode> {
    match value {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(ReportingError::Configuration(format!(
            "Unsupported postgresql.ssl_mode '{other}'"
        ))),
    }
}

fn statement_timeout_sql(seconds: u64) -> String {
    format!("SET statement_timeout = {}", seconds * 1000)
}
