//! Training definition and training run models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a training definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefinitionState {
    Unreleased,
    Released,
    Archived,
}

impl DefinitionState {
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Unreleased)
    }
}

/// Lifecycle state of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Running,
    Finished,
    Archived,
}

/// A training definition as the application works with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDefinition {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub state: DefinitionState,
    /// Number of levels, derived from the wire-side level id list.
    pub level_count: u64,
    /// Estimated completion time in minutes.
    pub estimated_duration: u64,
    pub last_edited: DateTime<Utc>,
    pub last_edited_by: String,
}

/// One trainee's pass through a training definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRun {
    pub id: u64,
    pub definition_id: u64,
    pub trainee_name: String,
    pub state: RunState,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Elapsed run time in seconds, present once the run has ended.
    pub duration_seconds: Option<i64>,
    pub event_log_reference: Option<String>,
}

impl TrainingRun {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self.state, RunState::Running)
    }
}
