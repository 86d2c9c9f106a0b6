//! Domain models, camelCase-keyed for the rest of the application.

mod sandbox;
mod training;

pub use sandbox::SandboxPool;
pub use training::{DefinitionState, RunState, TrainingDefinition, TrainingRun};
