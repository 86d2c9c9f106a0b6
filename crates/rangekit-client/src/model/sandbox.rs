//! Sandbox pool model.

use serde::{Deserialize, Serialize};

/// A pool of sandboxes backing a training definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SandboxPool {
    pub id: u64,
    pub definition_id: u64,
    /// Sandboxes currently allocated in the pool.
    pub size: u64,
    pub max_size: u64,
    /// Remaining capacity, derived from `max_size - size`.
    pub free_slots: u64,
    pub locked: bool,
    pub created_by: String,
}

impl SandboxPool {
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free_slots == 0
    }
}
