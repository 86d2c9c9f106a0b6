//! # Rangekit Mapper
//!
//! A registry-based framework for converting between wire DTOs
//! (snake_case JSON keys) and domain models (camelCase JSON keys) without
//! per-field boilerplate for the common case.
//!
//! Mappings are declared as a [`FieldMappingSpec`] — a list of directly
//! mapped field names whose wire key is derived by case translation, plus
//! named custom extraction functions for fields that need more than a key
//! rename. Specs are registered per (source type, target type, direction)
//! on a [`MapperRegistryBuilder`]; registering the same triple twice is a
//! fatal configuration error. The built [`MapperRegistry`] is immutable
//! and is meant to be constructed once, at startup, and shared.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = MapperRegistry::builder()
//!     .register_read::<UserDto, User>(
//!         &FieldMappingSpec::builder()
//!             .direct(["id", "fullName", "mail"])
//!             .build()?,
//!     )?
//!     .build();
//!
//! let user: Option<User> = registry.convert_read(&dto)?;
//! ```

pub mod case;
pub mod error;
pub mod registry;
pub mod spec;
pub mod transform;

pub use case::{camel_to_snake, snake_to_camel};
pub use error::{MapperError, MapperResult};
pub use registry::{Direction, MapperRegistry, MapperRegistryBuilder};
pub use spec::{FieldExtractor, FieldMappingSpec, FieldMappingSpecBuilder};
pub use transform::{build_read_transform, build_write_transform, TransformFn};
