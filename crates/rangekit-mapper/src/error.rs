//! Mapper error types.

use crate::registry::Direction;
use thiserror::Error;

/// Result type for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Mapper-related errors.
///
/// `DuplicateMapping` and `DuplicateField` are configuration errors: they
/// can only come from wrong registration code and are meant to surface at
/// startup, not in a hot path.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A mapping for this (source, target, direction) triple already exists.
    #[error("Duplicate {direction} mapping: {source_type} -> {target_type}")]
    DuplicateMapping {
        source_type: &'static str,
        target_type: &'static str,
        direction: Direction,
    },

    /// A field name appears twice within one list of a mapping spec.
    #[error("Duplicate field in mapping spec: {0}")]
    DuplicateField(String),

    /// The source value serialized to something other than a JSON object.
    #[error("Source did not serialize to a JSON object: {0}")]
    NotAnObject(&'static str),

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
