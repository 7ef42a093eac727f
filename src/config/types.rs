//! Configuration types.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_PORT;
use crate::store::{default_store_path, DEFAULT_READ_CONNECTIONS};
use crate::weather::{QueryOptions, StationDirectory};

/// How error bodies are mapped to HTTP status codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatus {
    /// Every error body is served with 200 OK.
    Legacy,
    /// Not found is 404, timeouts 504, store failures 500.
    #[default]
    Http,
}

/// Fact store location and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Number of read-only connections.
    pub read_connections: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            read_connections: DEFAULT_READ_CONNECTIONS,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable permissive CORS.
    pub cors_permissive: bool,
    /// Time budget for each query, in milliseconds.
    pub query_timeout_ms: u64,
    /// Status code mapping for error bodies.
    pub error_status: ErrorStatus,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors_permissive: true,
            query_timeout_ms: 5000,
            error_status: ErrorStatus::default(),
        }
    }
}

/// Query behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// Only list stations and dates whose observations carry every measurement.
    pub require_complete_records: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WeatherConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub query: QueryConfig,
    /// Extra or replacement station names, by identifier.
    pub stations: HashMap<String, String>,
}

impl WeatherConfig {
    /// Query engine options derived from this configuration.
    #[must_use]
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            require_complete_records: self.query.require_complete_records,
            timeout: Duration::from_millis(self.server.query_timeout_ms),
        }
    }

    /// Built-in station directory with configured overrides applied.
    #[must_use]
    pub fn station_directory(&self) -> StationDirectory {
        StationDirectory::builtin().with_overrides(&self.stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.error_status, ErrorStatus::Http);
        assert_eq!(config.store.read_connections, 4);
        assert!(config.store.path.ends_with("facts.db"));
        assert!(!config.query.require_complete_records);
        assert!(config.stations.is_empty());
    }

    #[test]
    fn test_query_options() {
        let mut config = WeatherConfig::default();
        config.server.query_timeout_ms = 250;
        config.query.require_complete_records = true;

        let options = config.query_options();
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert!(options.require_complete_records);
    }

    #[test]
    fn test_station_directory_overrides() {
        let mut config = WeatherConfig::default();
        config
            .stations
            .insert("12345".to_string(), "TEST FIELD".to_string());

        let directory = config.station_directory();
        assert_eq!(directory.resolve("12345"), "TEST FIELD");
        assert_eq!(directory.resolve("07005"), "ABBEVILLE");
    }

    #[test]
    fn test_error_status_deserialize() {
        let config: ServerConfig = toml::from_str(r#"error_status = "legacy""#).unwrap();
        assert_eq!(config.error_status, ErrorStatus::Legacy);
        assert_eq!(config.port, 8080);
    }
}
