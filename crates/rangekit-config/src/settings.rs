//! Configuration structures.

use rangekit_core::{RangeError, RangeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for a Rangekit-based client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Data-access tuning.
    #[serde(default)]
    pub data: DataConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Validates loaded values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero page size or poll period.
    pub fn validate(&self) -> RangeResult<()> {
        if self.data.default_page_size == 0 {
            return Err(RangeError::configuration("default_page_size must be nonzero"));
        }
        if self.data.poll_period_secs == 0 {
            return Err(RangeError::configuration("poll_period_secs must be nonzero"));
        }
        if self.data.page_size_ttl_days <= 0 {
            return Err(RangeError::configuration("page_size_ttl_days must be positive"));
        }
        Ok(())
    }
}

/// Data-access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Page size used when a view has no stored preference.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Fixed delay between polling refreshes, in seconds.
    #[serde(default = "default_poll_period_secs")]
    pub poll_period_secs: u64,

    /// Registry key the page-size blob is stored under.
    #[serde(default = "default_registry_key")]
    pub storage_registry_key: String,

    /// Retention of stored page sizes, in days.
    #[serde(default = "default_page_size_ttl_days")]
    pub page_size_ttl_days: i64,
}

impl DataConfig {
    /// The polling period as a [`Duration`].
    #[must_use]
    pub const fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_period_secs)
    }
}

fn default_page_size() -> usize {
    10
}

fn default_poll_period_secs() -> u64 {
    5
}

fn default_registry_key() -> String {
    "rangekit.page-sizes".to_string()
}

fn default_page_size_ttl_days() -> i64 {
    30
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            poll_period_secs: default_poll_period_secs(),
            storage_registry_key: default_registry_key(),
            page_size_ttl_days: default_page_size_ttl_days(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `rangekit=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
