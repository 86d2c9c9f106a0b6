//! Result type aliases for Rangekit.

use crate::RangeError;

/// A specialized `Result` type for Rangekit operations.
pub type RangeResult<T> = Result<T, RangeError>;
