//! Sandbox-pool DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A sandbox pool as served by the platform API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxPoolDto {
    pub id: u64,
    pub definition_id: u64,
    pub size: u64,
    pub max_size: u64,
    pub locked: bool,
    pub created_by: String,
}

/// Outgoing create request for a sandbox pool.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SandboxPoolCreateDto {
    pub definition_id: u64,

    #[validate(range(min = 1, max = 200, message = "Pool size must be 1-200 sandboxes"))]
    pub max_size: u64,
}
