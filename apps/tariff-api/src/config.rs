//! Tariff API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first by `main`.
//!
//! | Variable                  | Default   | Meaning                              |
//! |---------------------------|-----------|--------------------------------------|
//! | `TARIFF_HOST`             | `0.0.0.0` | Listen address                       |
//! | `TARIFF_PORT`             | `8000`    | Listen port                          |
//! | `TARIFF_DB_PATH`          | unset     | SQLite file; unset = memory only     |
//! | `TARIFF_MAX_UPLOAD_BYTES` | `1048576` | Upload body limit                    |
//! | `TARIFF_INGEST_MODE`      | `merge`   | Default mode for uploads             |

use std::env;
use std::path::PathBuf;

use tariff_core::IngestMode;

/// Default upload body limit (1 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Tariff API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffConfig {
    /// Listen address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// SQLite database file (optional)
    pub db_path: Option<PathBuf>,

    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,

    /// Mode used when an upload doesn't pass `?mode=`
    pub ingest_mode: IngestMode,
}

impl Default for TariffConfig {
    fn default() -> Self {
        TariffConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            db_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            ingest_mode: IngestMode::Merge,
        }
    }
}

impl TariffConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = TariffConfig::default();

        let config = TariffConfig {
            host: lookup("TARIFF_HOST").unwrap_or(defaults.host),

            port: match lookup("TARIFF_PORT") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TARIFF_PORT".to_string()))?,
                None => defaults.port,
            },

            db_path: lookup("TARIFF_DB_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),

            max_upload_bytes: match lookup("TARIFF_MAX_UPLOAD_BYTES") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TARIFF_MAX_UPLOAD_BYTES".to_string()))?,
                None => defaults.max_upload_bytes,
            },

            ingest_mode: match lookup("TARIFF_INGEST_MODE") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TARIFF_INGEST_MODE".to_string()))?,
                None => defaults.ingest_mode,
            },
        };

        if config.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue("TARIFF_MAX_UPLOAD_BYTES".to_string()));
        }

        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TariffConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TariffConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = TariffConfig::from_lookup(lookup(&[
            ("TARIFF_HOST", "127.0.0.1"),
            ("TARIFF_PORT", "9000"),
            ("TARIFF_DB_PATH", "/tmp/tariffs.db"),
            ("TARIFF_MAX_UPLOAD_BYTES", "2048"),
            ("TARIFF_INGEST_MODE", "replace"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/tariffs.db")));
        assert_eq!(config.max_upload_bytes, 2048);
        assert_eq!(config.ingest_mode, IngestMode::Replace);
    }

    #[test]
    fn test_invalid_values() {
        assert!(TariffConfig::from_lookup(lookup(&[("TARIFF_PORT", "eighty")])).is_err());
        assert!(TariffConfig::from_lookup(lookup(&[("TARIFF_INGEST_MODE", "append")])).is_err());
        assert!(TariffConfig::from_lookup(lookup(&[("TARIFF_MAX_UPLOAD_BYTES", "0")])).is_err());
    }

    #[test]
    fn test_blank_db_path_means_memory_only() {
        let config = TariffConfig::from_lookup(lookup(&[("TARIFF_DB_PATH", "  ")])).unwrap();
        assert!(config.db_path.is_none());
    }
}
