//! The mapping composition root.
//!
//! All DTO/model pairs the client works with are registered here, in one
//! place, so a duplicate or missing registration surfaces at startup
//! rather than deep inside a fetch path.

use crate::dto::{
    SandboxPoolCreateDto, SandboxPoolDto, TrainingDefinitionDto, TrainingDefinitionUpdateDto,
    TrainingRunDto,
};
use crate::model::{SandboxPool, TrainingDefinition, TrainingRun};
use chrono::DateTime;
use rangekit_core::{RangeError, RangeResult};
use rangekit_mapper::{FieldMappingSpec, MapperRegistry};
use serde_json::{json, Value};

/// Builds the registry with every mapping the client uses.
///
/// # Errors
///
/// Returns a configuration error if a spec or registration is invalid;
/// this indicates a programming mistake and should abort startup.
pub fn build_registry() -> RangeResult<MapperRegistry> {
    let registry = MapperRegistry::builder()
        .register_read::<TrainingDefinitionDto, TrainingDefinition>(&definition_read_spec()?)
        .map_err(startup)?
        .register_write::<TrainingDefinition, TrainingDefinitionUpdateDto>(
            &definition_write_spec()?,
        )
        .map_err(startup)?
        .register_read::<SandboxPoolDto, SandboxPool>(&pool_read_spec()?)
        .map_err(startup)?
        .register_write::<SandboxPool, SandboxPoolCreateDto>(&pool_write_spec()?)
        .map_err(startup)?
        .register_read::<TrainingRunDto, TrainingRun>(&run_read_spec()?)
        .map_err(startup)?
        .build();
    Ok(registry)
}

fn definition_read_spec() -> RangeResult<FieldMappingSpec> {
    FieldMappingSpec::builder()
        .direct([
            "id",
            "title",
            "description",
            "state",
            "estimatedDuration",
            "lastEdited",
            "lastEditedBy",
        ])
        .custom("levelCount", |dto| {
            dto.get("level_ids")
                .and_then(Value::as_array)
                .map_or(json!(0), |ids| json!(ids.len()))
        })
        .build()
        .map_err(startup)
}

fn definition_write_spec() -> RangeResult<FieldMappingSpec> {
    FieldMappingSpec::builder()
        .direct(["id", "title", "description", "estimatedDuration"])
        .build()
        .map_err(startup)
}

fn pool_read_spec() -> RangeResult<FieldMappingSpec> {
    FieldMappingSpec::builder()
        .direct(["id", "definitionId", "size", "maxSize", "locked", "createdBy"])
        .custom("freeSlots", |dto| {
            let size = dto.get("size").and_then(Value::as_u64).unwrap_or(0);
            let max = dto.get("max_size").and_then(Value::as_u64).unwrap_or(0);
            json!(max.saturating_sub(size))
        })
        .build()
        .map_err(startup)
}

fn pool_write_spec() -> RangeResult<FieldMappingSpec> {
    FieldMappingSpec::builder()
        .direct(["definitionId", "maxSize"])
        .build()
        .map_err(startup)
}

fn run_read_spec() -> RangeResult<FieldMappingSpec> {
    FieldMappingSpec::builder()
        .direct([
            "id",
            "definitionId",
            "traineeName",
            "state",
            "startTime",
            "endTime",
            "eventLogReference",
        ])
        .custom("durationSeconds", |dto| {
            let start = dto.get("start_time").and_then(parse_instant);
            let end = dto.get("end_time").and_then(parse_instant);
            match (start, end) {
                (Some(start), Some(end)) => json!((end - start).num_seconds()),
                _ => Value::Null,
            }
        })
        .build()
        .map_err(startup)
}

fn parse_instant(value: &Value) -> Option<DateTime<chrono::Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

fn startup(err: impl std::fmt::Display) -> RangeError {
    RangeError::configuration(format!("mapping registration failed: {err}"))
}
