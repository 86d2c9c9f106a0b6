//! # Rangekit Config
//!
//! Layered configuration loading for the data-access stack: serde
//! defaults, an optional TOML file, then `RANGEKIT_`-prefixed environment
//! variables, plus the tracing-subscriber bootstrap.

pub mod loader;
pub mod settings;

pub use loader::{init_tracing, ConfigLoader};
pub use settings::{ClientConfig, DataConfig, LoggingConfig};
