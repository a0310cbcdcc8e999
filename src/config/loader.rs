//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ReportingConfig, WalSource};
use super::secret::secret_string;
use crate::domain::errors::ReportingError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ReportingConfig
/// 4. Applies environment variable overrides (REPORTING_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ReportingError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use claims_reporting::config::loader::load_config;
///
/// let config = load_config("claims-reporting.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ReportingConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ReportingError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ReportingError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Same as [`load_config`] for configuration already held in memory
pub fn load_config_from_str(contents: &str) -> Result<ReportingConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ReportingConfig = toml::from_str(&contents)
        .map_err(|e| ReportingError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ReportingError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ReportingError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Comment lines are copied untouched
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ReportingError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReportingError::Configuration(format!("Invalid value for {key}: '{val}'"))),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using the REPORTING_* prefix
///
/// Environment variables follow the pattern: REPORTING_<SECTION>_<KEY>,
/// for example REPORTING_STORAGE_BUCKET or REPORTING_EXPORT_DATA_CHUNK_SIZE.
fn apply_env_overrides(config: &mut ReportingConfig) -> Result<()> {
    // Application
    if let Ok(val) = std::env::var("REPORTING_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // PostgreSQL
    if let Ok(val) = std::env::var("REPORTING_POSTGRESQL_CONNECTION_STRING") {
        config.postgresql.connection_string = secret_string(val);
    }
    if let Some(val) = env_parse("REPORTING_POSTGRESQL_MAX_CONNECTIONS")? {
        config.postgresql.max_connections = val;
    }
    if let Some(val) = env_parse("REPORTING_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS")? {
        config.postgresql.statement_timeout_seconds = val;
    }
    if let Ok(val) = std::env::var("REPORTING_POSTGRESQL_SSL_MODE") {
        config.postgresql.ssl_mode = val;
    }

    // Replication
    if let Some(val) = env_parse("REPORTING_REPLICATION_ENABLED")? {
        config.replication.enabled = val;
    }
    if let Ok(val) = std::env::var("REPORTING_REPLICATION_SCHEMA") {
        config.replication.schema = val;
    }
    if let Ok(val) = std::env::var("REPORTING_REPLICATION_PUBLICATION_NAME") {
        config.replication.publication_name = val;
    }
    if let Ok(val) = std::env::var("REPORTING_REPLICATION_SUBSCRIPTION_NAME") {
        config.replication.subscription_name = val;
    }
    if let Ok(val) = std::env::var("REPORTING_REPLICATION_WAL_SOURCE") {
        config.replication.wal_source = match val.to_lowercase().as_str() {
            "subscription" => WalSource::Subscription,
            "current" => WalSource::Current,
            other => {
                return Err(ReportingError::Configuration(format!(
                    "Invalid value for REPORTING_REPLICATION_WAL_SOURCE: '{other}'"
                )))
            }
        };
    }
    if let Some(val) = env_parse("REPORTING_REPLICATION_IGNORE_ROW_COUNT_MISMATCH")? {
        config.replication.ignore_row_count_mismatch = val;
    }

    // Export
    if let Some(val) = env_parse("REPORTING_EXPORT_DATA_CHUNK_SIZE")? {
        config.export.data_chunk_size = val;
    }
    if let Some(val) = env_parse("REPORTING_EXPORT_BUFFER_FLUSH_FREQUENCY")? {
        config.export.buffer_flush_frequency = val;
    }
    if let Ok(val) = std::env::var("REPORTING_EXPORT_TEMP_DIR") {
        config.export.temp_dir = Some(PathBuf::from(val));
    }

    // Storage
    if let Some(val) = env_parse("REPORTING_STORAGE_ENABLED")? {
        config.storage.enabled = val;
    }
    if let Ok(val) = std::env::var("REPORTING_STORAGE_BUCKET") {
        config.storage.bucket = val;
    }
    if let Ok(val) = std::env::var("REPORTING_STORAGE_REGION") {
        config.storage.region = Some(val);
    }
    if let Ok(val) = std::env::var("REPORTING_STORAGE_ENDPOINT_URL") {
        config.storage.endpoint_url = Some(val);
    }

    // Logging
    if let Some(val) = env_parse("REPORTING_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("REPORTING_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
