//! Training-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A training definition as served by the platform API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDefinitionDto {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub state: String,
    pub level_ids: Vec<u64>,
    pub estimated_duration: u64,
    pub last_edited: DateTime<Utc>,
    pub last_edited_by: String,
}

/// Outgoing update request for a training definition.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrainingDefinitionUpdateDto {
    pub id: u64,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Estimated duration must be at least a minute"))]
    pub estimated_duration: u64,
}

/// A training run as served by the platform API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRunDto {
    pub id: u64,
    pub definition_id: u64,
    pub trainee_name: String,
    pub state: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub event_log_reference: Option<String>,
}
