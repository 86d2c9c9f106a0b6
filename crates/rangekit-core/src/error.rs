//! Unified error types for all layers of the data-access stack.

use thiserror::Error;

/// Unified error type for Rangekit operations.
///
/// Covers the three failure families the stack distinguishes: transport
/// failures surfaced by fetch functions (recoverable, reported through
/// `has_error`), persistence failures from the key-value store, and
/// configuration errors raised during startup wiring.
#[derive(Error, Debug)]
pub enum RangeError {
    /// A fetch function failed. The paging layer treats any such failure
    /// as an opaque error signal; it never inspects transport details.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The durable key-value store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid wiring or configuration detected at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An outgoing request failed validation before it was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No mapping is registered for a DTO/model pair that a caller
    /// decided to require.
    #[error("No mapping registered: {source_type} -> {target_type}")]
    MissingMapping {
        source_type: &'static str,
        target_type: &'static str,
    },

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RangeError {
    /// Creates a fetch error.
    #[must_use]
    pub fn fetch<T: Into<String>>(message: T) -> Self {
        Self::Fetch(message.into())
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage<T: Into<String>>(message: T) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a missing-mapping error for a source/target type pair.
    #[must_use]
    pub fn missing_mapping(source_type: &'static str, target_type: &'static str) -> Self {
        Self::MissingMapping {
            source_type,
            target_type,
        }
    }

    /// Checks if this error is transient.
    ///
    /// Transient errors surface as `has_error = true` on a paginated
    /// service and are expected to clear on a later fetch; configuration
    /// and mapping errors are programmer errors and are not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Storage(_))
    }
}
