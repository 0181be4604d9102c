//! Process configuration.
//!
//! Loaded once at startup and passed down to whatever needs it; nothing in the
//! crate reads configuration from a global.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_LEVEL: &str = "info";
const MEMORY_DATABASE: &str = ":memory:";

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where records are stored and how many pooled connections to keep.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub location: DatabaseLocation,
    pub pool_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    /// Private in-process database, lost on exit
    Memory,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STUDENTHUB_PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),

    #[error("STUDENTHUB_POOL_SIZE must be a positive integer, got '{0}'")]
    InvalidPoolSize(String),

    #[error("STUDENTHUB_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("could not determine the user data directory; set STUDENTHUB_DATABASE")]
    NoDataDirectory,
}

impl AppConfig {
    /// Read `.env` (if present) and the `STUDENTHUB_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("STUDENTHUB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("STUDENTHUB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let pool_size = match lookup("STUDENTHUB_POOL_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidPoolSize(raw)),
            },
            None => DEFAULT_POOL_SIZE,
        };

        let location = match lookup("STUDENTHUB_DATABASE") {
            Some(raw) => DatabaseLocation::parse(&raw),
            None => DatabaseLocation::File(default_database_path()?),
        };

        let log_level =
            lookup("STUDENTHUB_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                location,
                pool_size,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

impl DatabaseLocation {
    /// `:memory:` selects an in-process database, anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(MEMORY_DATABASE) {
            Self::Memory
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            location: DatabaseLocation::Memory,
            pool_size: 1,
        }
    }
}

/// Default database file: {DATA_DIR}/studenthub/studenthub.db
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDirectory)?;
    Ok(data_dir.join("studenthub").join("studenthub.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_are_used() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STUDENTHUB_HOST", "0.0.0.0"),
            ("STUDENTHUB_PORT", "9090"),
            ("STUDENTHUB_DATABASE", "/tmp/records.db"),
            ("STUDENTHUB_POOL_SIZE", "4"),
            ("STUDENTHUB_LOG_LEVEL", "debug"),
        ]))
        .expect("config loads");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.database.location,
            DatabaseLocation::File(PathBuf::from("/tmp/records.db"))
        );
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn defaults_apply_when_keys_missing() {
        let config = AppConfig::from_lookup(lookup(&[("STUDENTHUB_DATABASE", ":memory:")]))
            .expect("config loads with defaults");

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.location, DatabaseLocation::Memory);
        assert_eq!(config.database.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn rejects_bad_numbers() {
        let port = AppConfig::from_lookup(lookup(&[
            ("STUDENTHUB_DATABASE", ":memory:"),
            ("STUDENTHUB_PORT", "http"),
        ]));
        assert!(matches!(port, Err(ConfigError::InvalidPort(_))));

        let pool = AppConfig::from_lookup(lookup(&[
            ("STUDENTHUB_DATABASE", ":memory:"),
            ("STUDENTHUB_POOL_SIZE", "0"),
        ]));
        assert!(matches!(pool, Err(ConfigError::InvalidPoolSize(_))));
    }

    #[test]
    fn accepts_localhost_host() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 3000,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }
}
