//! The process-wide mapper registry.
//!
//! Built once at startup through [`MapperRegistryBuilder`] and immutable
//! afterwards; all lookups are read-only. There is deliberately no hidden
//! module-level singleton: the composition root builds the registry and
//! hands it to whoever needs it.

use crate::error::{MapperError, MapperResult};
use crate::spec::FieldMappingSpec;
use crate::transform::{build_read_transform, build_write_transform, TransformFn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use tracing::debug;

/// Mapping direction.
///
/// Read converts incoming wire DTOs into models; write converts outgoing
/// models into wire DTOs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// DTO -> model.
    Read,
    /// Model -> DTO.
    Write,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

struct Registration {
    transform: TransformFn,
    source_type: &'static str,
    target_type: &'static str,
}

type RegistrationMap = HashMap<(TypeId, TypeId), Registration>;

/// Builder collecting mapper registrations before the registry is sealed.
#[derive(Default)]
pub struct MapperRegistryBuilder {
    read: RegistrationMap,
    write: RegistrationMap,
}

impl std::fmt::Debug for MapperRegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperRegistryBuilder")
            .field("read", &self.read.len())
            .field("write", &self.write.len())
            .finish()
    }
}

impl MapperRegistryBuilder {
    /// Registers a read (DTO -> model) mapping for the `(S, T)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::DuplicateMapping`] if a read mapping for
    /// this pair is already registered. This is a programmer error meant
    /// to surface during startup, not a runtime condition to recover from.
    pub fn register_read<S: 'static, T: 'static>(
        mut self,
        spec: &FieldMappingSpec,
    ) -> MapperResult<Self> {
        let transform = build_read_transform(spec);
        Self::insert::<S, T>(&mut self.read, Direction::Read, transform)?;
        Ok(self)
    }

    /// Registers a write (model -> DTO) mapping for the `(S, T)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::DuplicateMapping`] if a write mapping for
    /// this pair is already registered.
    pub fn register_write<S: 'static, T: 'static>(
        mut self,
        spec: &FieldMappingSpec,
    ) -> MapperResult<Self> {
        let transform = build_write_transform(spec);
        Self::insert::<S, T>(&mut self.write, Direction::Write, transform)?;
        Ok(self)
    }

    fn insert<S: 'static, T: 'static>(
        map: &mut RegistrationMap,
        direction: Direction,
        transform: TransformFn,
    ) -> MapperResult<()> {
        let key = (TypeId::of::<S>(), TypeId::of::<T>());
        if map.contains_key(&key) {
            return Err(MapperError::DuplicateMapping {
                source_type: type_name::<S>(),
                target_type: type_name::<T>(),
                direction,
            });
        }
        debug!(
            source = type_name::<S>(),
            target = type_name::<T>(),
            %direction,
            "Registered mapping"
        );
        map.insert(
            key,
            Registration {
                transform,
                source_type: type_name::<S>(),
                target_type: type_name::<T>(),
            },
        );
        Ok(())
    }

    /// Seals the registry.
    #[must_use]
    pub fn build(self) -> MapperRegistry {
        MapperRegistry {
            read: self.read,
            write: self.write,
        }
    }
}

/// Immutable lookup table of registered transforms, keyed by type pair.
pub struct MapperRegistry {
    read: RegistrationMap,
    write: RegistrationMap,
}

impl MapperRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> MapperRegistryBuilder {
        MapperRegistryBuilder::default()
    }

    /// Looks up the read transform for the `(S, T)` pair.
    ///
    /// Returns `None` when no mapping is registered; callers decide
    /// whether that is an error.
    #[must_use]
    pub fn read_transform<S: 'static, T: 'static>(&self) -> Option<TransformFn> {
        self.read
            .get(&(TypeId::of::<S>(), TypeId::of::<T>()))
            .map(|r| r.transform.clone())
    }

    /// Looks up the write transform for the `(S, T)` pair.
    #[must_use]
    pub fn write_transform<S: 'static, T: 'static>(&self) -> Option<TransformFn> {
        self.write
            .get(&(TypeId::of::<S>(), TypeId::of::<T>()))
            .map(|r| r.transform.clone())
    }

    /// Returns true if a read mapping exists for the `(S, T)` pair.
    #[must_use]
    pub fn has_read<S: 'static, T: 'static>(&self) -> bool {
        self.read
            .contains_key(&(TypeId::of::<S>(), TypeId::of::<T>()))
    }

    /// Returns true if a write mapping exists for the `(S, T)` pair.
    #[must_use]
    pub fn has_write<S: 'static, T: 'static>(&self) -> bool {
        self.write
            .contains_key(&(TypeId::of::<S>(), TypeId::of::<T>()))
    }

    /// Converts a DTO value into a model through the registered read
    /// mapping.
    ///
    /// Returns `Ok(None)` when no mapping is registered for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::NotAnObject`] if `source` serializes to a
    /// non-object, or a serialization error if the transformed object does
    /// not deserialize into `T`.
    pub fn convert_read<S, T>(&self, source: &S) -> MapperResult<Option<T>>
    where
        S: Serialize + 'static,
        T: DeserializeOwned + 'static,
    {
        let Some(transform) = self.read_transform::<S, T>() else {
            return Ok(None);
        };
        Self::apply::<S, T>(&transform, source).map(Some)
    }

    /// Converts a model value into a DTO through the registered write
    /// mapping.
    ///
    /// Returns `Ok(None)` when no mapping is registered for the pair.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::convert_read`].
    pub fn convert_write<S, T>(&self, source: &S) -> MapperResult<Option<T>>
    where
        S: Serialize + 'static,
        T: DeserializeOwned + 'static,
    {
        let Some(transform) = self.write_transform::<S, T>() else {
            return Ok(None);
        };
        Self::apply::<S, T>(&transform, source).map(Some)
    }

    fn apply<S: Serialize, T: DeserializeOwned>(
        transform: &TransformFn,
        source: &S,
    ) -> MapperResult<T> {
        let value = serde_json::to_value(source)?;
        let Value::Object(map) = value else {
            return Err(MapperError::NotAnObject(type_name::<S>()));
        };
        let result = transform(&map);
        Ok(serde_json::from_value(Value::Object(result))?)
    }

    /// Returns the number of registered mappings in both directions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read.len() + self.write.len()
    }

    /// Returns true if no mappings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty()
    }
}

impl std::fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let read: Vec<String> = self
            .read
            .values()
            .map(|r| format!("{} -> {}", r.source_type, r.target_type))
            .collect();
        let write: Vec<String> = self
            .write
            .values()
            .map(|r| format!("{} -> {}", r.source_type, r.target_type))
            .collect();
        f.debug_struct("MapperRegistry")
            .field("read", &read)
            .field("write", &write)
            .finish()
    }
}
