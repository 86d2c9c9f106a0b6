//! Declarative field-mapping specifications.

use crate::{MapperError, MapperResult};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A custom extraction function for one target field.
///
/// Receives the whole source object and produces the field's value, for
/// fields that cannot be derived by key-case translation alone.
pub type FieldExtractor = Arc<dyn Fn(&Map<String, Value>) -> Value + Send + Sync>;

/// The declarative description of one mapping.
///
/// Field names are always given in the model-side camelCase spelling; the
/// wire-side key is derived by case translation when the transform runs.
/// A name may appear in both lists, in which case the custom extractor
/// overrides the direct copy.
#[derive(Clone)]
pub struct FieldMappingSpec {
    mapped_properties: Vec<String>,
    mappers: Vec<(String, FieldExtractor)>,
}

impl FieldMappingSpec {
    /// Starts building a spec.
    #[must_use]
    pub fn builder() -> FieldMappingSpecBuilder {
        FieldMappingSpecBuilder::default()
    }

    /// The directly mapped field names.
    #[must_use]
    pub fn mapped_properties(&self) -> &[String] {
        &self.mapped_properties
    }

    /// The custom field extractors.
    #[must_use]
    pub fn mappers(&self) -> &[(String, FieldExtractor)] {
        &self.mappers
    }
}

impl std::fmt::Debug for FieldMappingSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMappingSpec")
            .field("mapped_properties", &self.mapped_properties)
            .field(
                "mappers",
                &self.mappers.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`FieldMappingSpec`].
#[derive(Default)]
pub struct FieldMappingSpecBuilder {
    mapped_properties: Vec<String>,
    mappers: Vec<(String, FieldExtractor)>,
}

impl FieldMappingSpecBuilder {
    /// Adds directly mapped field names.
    #[must_use]
    pub fn direct<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mapped_properties
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds a custom extractor for one field.
    #[must_use]
    pub fn custom<F>(mut self, name: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Value + Send + Sync + 'static,
    {
        self.mappers.push((name.into(), Arc::new(extractor)));
        self
    }

    /// Validates and builds the spec.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::DuplicateField`] if a field name appears
    /// twice within either list.
    pub fn build(self) -> MapperResult<FieldMappingSpec> {
        check_unique(self.mapped_properties.iter())?;
        check_unique(self.mappers.iter().map(|(n, _)| n))?;
        Ok(FieldMappingSpec {
            mapped_properties: self.mapped_properties,
            mappers: self.mappers,
        })
    }
}

fn check_unique<'a, I: Iterator<Item = &'a String>>(names: I) -> MapperResult<()> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(MapperError::DuplicateField(name.clone()));
        }
    }
    Ok(())
}
