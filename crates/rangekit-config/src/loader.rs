//! Configuration loader with layered sources.

use crate::{ClientConfig, LoggingConfig};
use config::{Config, Environment, File};
use rangekit_core::{RangeError, RangeResult};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Loads client configuration from layered sources.
///
/// Sources, in override order:
/// 1. Serde defaults.
/// 2. A TOML file (`rangekit.toml`, or the path in `RANGEKIT_CONFIG`).
/// 3. Environment variables with the `RANGEKIT_` prefix
///    (`RANGEKIT_DATA__POLL_PERIOD_SECS=10`).
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unreadable sources or invalid
    /// values.
    pub fn load() -> RangeResult<ClientConfig> {
        let path =
            std::env::var("RANGEKIT_CONFIG").unwrap_or_else(|_| "rangekit.toml".to_string());
        Self::load_from(&path)
    }

    /// Loads and validates configuration, reading the given TOML file if
    /// it exists.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::load`].
    pub fn load_from(path: &str) -> RangeResult<ClientConfig> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let mut builder = Config::builder();

        if Path::new(path).exists() {
            debug!(path, "Loading config file");
            builder = builder.add_source(File::with_name(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("RANGEKIT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| RangeError::configuration(e.to_string()))?;

        let client_config: ClientConfig = config
            .try_deserialize()
            .map_err(|e| RangeError::configuration(e.to_string()))?;

        client_config.validate()?;
        Ok(client_config)
    }
}

/// Initializes the global tracing subscriber from logging configuration.
///
/// `RUST_LOG` overrides the configured level. Safe to call once per
/// process; later calls fail quietly if a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    if config.json {
        let _ = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = ConfigLoader::load_from("does-not-exist.toml").unwrap();
        assert_eq!(config.data.default_page_size, 10);
        assert_eq!(config.data.poll_period_secs, 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rangekit.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[data]").unwrap();
        writeln!(file, "default_page_size = 50").unwrap();
        writeln!(file, "poll_period_secs = 30").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"debug\"").unwrap();

        let config = ConfigLoader::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.data.default_page_size, 50);
        assert_eq!(config.data.poll_period_secs, 30);
        assert_eq!(config.logging.level, "debug");
        // Untouched section keeps its default.
        assert_eq!(config.data.page_size_ttl_days, 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rangekit.toml");
        std::fs::write(&path, "[data]\ndefault_page_size = 0\n").unwrap();

        let result = ConfigLoader::load_from(path.to_str().unwrap());
        assert!(matches!(result, Err(RangeError::Configuration(_))));
    }
}
