//! Transform construction from field-mapping specs.

use crate::case::camel_to_snake;
use crate::spec::FieldMappingSpec;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A pure object-to-object transform produced from a spec.
pub type TransformFn = Arc<dyn Fn(&Map<String, Value>) -> Map<String, Value> + Send + Sync>;

/// Builds the read-direction (DTO -> model) transform.
///
/// For each directly mapped field the model-side camelCase name is
/// translated to the wire-side snake_case key and the value copied over;
/// an absent source key yields `Value::Null`. Custom extractors run after
/// the direct copies, so they take precedence for the same field name.
#[must_use]
pub fn build_read_transform(spec: &FieldMappingSpec) -> TransformFn {
    let direct: Vec<(String, String)> = spec
        .mapped_properties()
        .iter()
        .map(|f| (f.clone(), camel_to_snake(f)))
        .collect();
    let custom = spec.mappers().to_vec();

    Arc::new(move |source| {
        let mut result = Map::with_capacity(direct.len() + custom.len());
        for (field, wire_key) in &direct {
            let value = source.get(wire_key).cloned().unwrap_or(Value::Null);
            result.insert(field.clone(), value);
        }
        for (field, extractor) in &custom {
            result.insert(field.clone(), extractor(source));
        }
        result
    })
}

/// Builds the write-direction (model -> DTO) transform.
///
/// For each directly mapped field the value is read under the camelCase
/// name and written under the translated snake_case key. Custom
/// extractors receive the whole model object and write their result under
/// the translated key, overriding any direct copy.
#[must_use]
pub fn build_write_transform(spec: &FieldMappingSpec) -> TransformFn {
    let direct: Vec<(String, String)> = spec
        .mapped_properties()
        .iter()
        .map(|f| (f.clone(), camel_to_snake(f)))
        .collect();
    let custom: Vec<(String, crate::spec::FieldExtractor)> = spec
        .mappers()
        .iter()
        .map(|(f, e)| (camel_to_snake(f), e.clone()))
        .collect();

    Arc::new(move |source| {
        let mut result = Map::with_capacity(direct.len() + custom.len());
        for (field, wire_key) in &direct {
            let value = source.get(field).cloned().unwrap_or(Value::Null);
            result.insert(wire_key.clone(), value);
        }
        for (wire_key, extractor) in &custom {
            result.insert(wire_key.clone(), extractor(source));
        }
        result
    })
}
