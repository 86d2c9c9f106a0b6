//! # Rangekit Client
//!
//! The domain band of the cyber-range training platform: wire DTOs
//! (snake_case keys), domain models (camelCase keys), the mapper
//! composition root, and the paginated services UI collaborators
//! subscribe to. Transport stays behind the [`api::DtoPageApi`] trait, so
//! the whole crate is HTTP-agnostic.

pub mod api;
pub mod dto;
pub mod mappings;
pub mod model;
pub mod services;

pub use mappings::build_registry;
pub use services::{
    storage_from_config, SandboxPoolService, TrainingDefinitionService, TrainingRunService,
};
