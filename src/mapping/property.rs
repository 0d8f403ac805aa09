//! Field mappings from resource fields to entity fields
//!
//! A [`FieldMapping`] tells the engine which stored fields back each public
//! resource field. One resource field may expand to several entity fields
//! (combined as primary, secondary, ... sort keys), and each entity field
//! may reverse the requested sort direction.

use crate::core::entity::{Entity, Resource};
use crate::core::error::MappingError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// One entity field that a resource field expands to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedProperty {
    /// Entity field name
    pub name: String,

    /// Flip ascending/descending when sorting by this entity field
    #[serde(default, alias = "revert")]
    pub revert_sort_direction: bool,
}

impl MappedProperty {
    /// Map to an entity field in the same direction
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revert_sort_direction: false,
        }
    }

    /// Map to an entity field whose stored order is inverse to the resource field's
    pub fn reverted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revert_sort_direction: true,
        }
    }
}

/// A validated mapping entry for a single resource field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    resource_field: &'static str,
    properties: Vec<MappedProperty>,
}

impl MappingEntry {
    /// Canonical resource field name
    pub fn resource_field(&self) -> &'static str {
        self.resource_field
    }

    /// Entity fields in sort-key order; never empty
    pub fn properties(&self) -> &[MappedProperty] {
        &self.properties
    }
}

/// Validated mapping between a resource type `R` and an entity type `E`
///
/// Keys are case-insensitive and kept in registration order. Every key is a
/// declared field of `R` and maps to at least one declared field of `E`;
/// construction fails otherwise.
pub struct FieldMapping<R, E> {
    entries: IndexMap<String, MappingEntry>,
    _types: PhantomData<fn() -> (R, E)>,
}

impl<R: Resource, E: Entity> FieldMapping<R, E> {
    /// Start building a mapping
    pub fn builder() -> FieldMappingBuilder<R, E> {
        FieldMappingBuilder::new()
    }

    /// Build a mapping from configured field entries
    pub fn from_entries<I, P>(entries: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (String, P)>,
        P: IntoIterator<Item = MappedProperty>,
    {
        entries
            .into_iter()
            .fold(Self::builder(), |builder, (field, properties)| {
                builder.map(field, properties)
            })
            .build()
    }

    /// Resource type name
    pub fn resource_type(&self) -> &'static str {
        R::type_name()
    }

    /// Entity type name
    pub fn entity_type(&self) -> &'static str {
        E::type_name()
    }

    /// Look up a resource field (case-insensitive)
    pub fn get(&self, resource_field: &str) -> Option<&MappingEntry> {
        self.entries.get(&mapping_key(resource_field))
    }

    /// Check if a resource field is mapped (case-insensitive)
    pub fn contains(&self, resource_field: &str) -> bool {
        self.get(resource_field).is_some()
    }

    /// Mapped resource fields, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().map(|entry| entry.resource_field)
    }

    /// All entries, in registration order
    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R, E> Clone for FieldMapping<R, E> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            _types: PhantomData,
        }
    }
}

impl<R: Resource, E: Entity> fmt::Debug for FieldMapping<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("resource", &R::type_name())
            .field("entity", &E::type_name())
            .field("entries", &self.entries)
            .finish()
    }
}

/// Builder for [`FieldMapping`]
///
/// # Example
///
/// ```rust,ignore
/// let mapping = FieldMapping::<CountryResource, Country>::builder()
///     .map_same("englishName")
///     .map("name", [MappedProperty::new("englishName"), MappedProperty::new("chineseName")])
///     .map("age", [MappedProperty::reverted("foundedAt")])
///     .build()?;
/// ```
pub struct FieldMappingBuilder<R, E> {
    entries: Vec<(String, Vec<MappedProperty>)>,
    _types: PhantomData<fn() -> (R, E)>,
}

impl<R: Resource, E: Entity> FieldMappingBuilder<R, E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            _types: PhantomData,
        }
    }

    /// Map a resource field to one or more entity fields
    pub fn map(
        mut self,
        resource_field: impl Into<String>,
        properties: impl IntoIterator<Item = MappedProperty>,
    ) -> Self {
        self.entries
            .push((resource_field.into(), properties.into_iter().collect()));
        self
    }

    /// Map a resource field to the entity field of the same name
    pub fn map_same(self, field: &str) -> Self {
        self.map(field, [MappedProperty::new(field)])
    }

    /// Validate every entry and build the mapping
    pub fn build(self) -> Result<FieldMapping<R, E>, MappingError> {
        let mut entries = IndexMap::with_capacity(self.entries.len());

        for (field, properties) in self.entries {
            let resource_field =
                R::resolve_field(&field).ok_or_else(|| MappingError::UnknownResourceField {
                    resource: R::type_name().to_string(),
                    field: field.clone(),
                })?;

            if properties.is_empty() {
                return Err(MappingError::EmptyMapping { field });
            }

            let properties = properties
                .into_iter()
                .map(|property| canonical_property::<E>(property, resource_field))
                .collect::<Result<Vec<_>, _>>()?;

            let key = mapping_key(resource_field);
            if entries.contains_key(&key) {
                return Err(MappingError::DuplicateField {
                    field: resource_field.to_string(),
                });
            }

            entries.insert(
                key,
                MappingEntry {
                    resource_field,
                    properties,
                },
            );
        }

        Ok(FieldMapping {
            entries,
            _types: PhantomData,
        })
    }
}

impl<R: Resource, E: Entity> Default for FieldMappingBuilder<R, E> {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_property<E: Entity>(
    property: MappedProperty,
    resource_field: &str,
) -> Result<MappedProperty, MappingError> {
    let name = E::resolve_field(&property.name).ok_or_else(|| MappingError::UnknownEntityField {
        entity: E::type_name().to_string(),
        field: property.name.clone(),
        resource_field: resource_field.to_string(),
    })?;

    Ok(MappedProperty {
        name: name.to_string(),
        revert_sort_direction: property.revert_sort_direction,
    })
}

fn mapping_key(field: &str) -> String {
    field.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::FieldTable;
    use crate::test_fixtures::{Country, CountryResource};

    #[test]
    fn test_build_identity_mapping() {
        let mapping = FieldMapping::<CountryResource, Country>::builder()
            .map_same("englishName")
            .map_same("chineseName")
            .build()
            .expect("valid mapping");

        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.keys().collect::<Vec<_>>(),
            vec!["englishName", "chineseName"]
        );
        assert_eq!(mapping.resource_type(), "country");
        assert_eq!(mapping.entity_type(), "country");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mapping = FieldMapping::<CountryResource, Country>::builder()
            .map_same("englishName")
            .build()
            .expect("valid mapping");

        let entry = mapping.get("ENGLISHNAME").expect("mapped");
        assert_eq!(entry.resource_field(), "englishName");
        assert!(mapping.contains(" englishname "));
        assert!(!mapping.contains("abbreviation"));
    }

    #[test]
    fn test_property_names_are_canonicalized() {
        let mapping = FieldMapping::<CountryResource, Country>::builder()
            .map("EnglishName", [MappedProperty::new("ENGLISHNAME")])
            .build()
            .expect("valid mapping");

        let entry = mapping.get("englishName").expect("mapped");
        assert_eq!(entry.properties()[0].name, "englishName");
    }

    #[test]
    fn test_multi_field_expansion_keeps_order() {
        let mapping = FieldMapping::<CountryResource, Country>::builder()
            .map(
                "englishName",
                [
                    MappedProperty::new("englishName"),
                    MappedProperty::reverted("id"),
                ],
            )
            .build()
            .expect("valid mapping");

        let properties = mapping.get("englishName").expect("mapped").properties();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0], MappedProperty::new("englishName"));
        assert_eq!(properties[1], MappedProperty::reverted("id"));
    }

    #[test]
    fn test_unknown_entity_field_rejected() {
        let result = FieldMapping::<CountryResource, Country>::builder()
            .map("englishName", [MappedProperty::new("nameInEnglish")])
            .build();

        assert_eq!(
            result.unwrap_err(),
            MappingError::UnknownEntityField {
                entity: "country".to_string(),
                field: "nameInEnglish".to_string(),
                resource_field: "englishName".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_resource_field_rejected() {
        let result = FieldMapping::<CountryResource, Country>::builder()
            .map_same("population")
            .build();

        assert!(matches!(
            result,
            Err(MappingError::UnknownResourceField { .. })
        ));
    }

    #[test]
    fn test_empty_property_list_rejected() {
        let result = FieldMapping::<CountryResource, Country>::builder()
            .map("englishName", Vec::new())
            .build();

        assert_eq!(
            result.unwrap_err(),
            MappingError::EmptyMapping {
                field: "englishName".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = FieldMapping::<CountryResource, Country>::builder()
            .map_same("englishName")
            .map_same("EnglishName")
            .build();

        assert!(matches!(result, Err(MappingError::DuplicateField { .. })));
    }

    #[test]
    fn test_every_key_resolves_to_entity_fields() {
        let mapping = crate::test_fixtures::country_mapping();

        for entry in mapping.entries() {
            assert!(!entry.properties().is_empty());
            for property in entry.properties() {
                assert!(!property.name.is_empty());
                assert!(Country::has_field(&property.name));
            }
        }
    }

    #[test]
    fn test_mapped_property_deserialize_alias() {
        let property: MappedProperty =
            serde_json::from_str(r#"{"name": "id", "revert": true}"#).expect("deserialize");
        assert_eq!(property, MappedProperty::reverted("id"));

        let property: MappedProperty =
            serde_json::from_str(r#"{"name": "id"}"#).expect("deserialize");
        assert!(!property.revert_sort_direction);
    }
}
