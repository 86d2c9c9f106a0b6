//! Wire DTOs, snake_case-keyed as received from the platform API.

mod sandbox_dto;
mod training_dto;

pub use sandbox_dto::{SandboxPoolCreateDto, SandboxPoolDto};
pub use training_dto::{
    TrainingDefinitionDto, TrainingDefinitionUpdateDto, TrainingRunDto,
};

use rangekit_core::{RangeError, RangeResult};
use validator::Validate;

/// Validates an outgoing request DTO, converting field errors into a
/// single validation error.
///
/// # Errors
///
/// Returns [`RangeError::Validation`] listing the failing fields.
pub fn validate_request<T: Validate>(request: &T) -> RangeResult<()> {
    request
        .validate()
        .map_err(|e| RangeError::validation(e.to_string()))
}
