//! Registry of field mappings keyed by resource/entity type pair
//!
//! The registry is populated once during startup through a
//! [`MappingRegistryBuilder`] and then frozen into a [`MappingRegistry`].
//! The frozen registry has no mutating methods, so request handlers share
//! it behind an `Arc` and read it without locking.

use crate::config::ShapingConfig;
use crate::core::entity::{Entity, Resource};
use crate::core::error::{ConfigError, MappingError, ShapingError};
use crate::mapping::property::FieldMapping;
use crate::mapping::sort::SortValidator;
use std::any::{Any, TypeId};
use std::collections::HashMap;

type PairKey = (TypeId, TypeId);

struct RegisteredMapping {
    resource: &'static str,
    entity: &'static str,
    mapping: Box<dyn Any + Send + Sync>,
}

fn pair_key<R: 'static, E: 'static>() -> PairKey {
    (TypeId::of::<R>(), TypeId::of::<E>())
}

/// Collects field mappings during startup
#[derive(Default)]
pub struct MappingRegistryBuilder {
    mappings: HashMap<PairKey, RegisteredMapping>,
}

impl MappingRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mapping for a resource/entity pair
    ///
    /// Fails if a mapping for the same pair is already registered.
    pub fn register<R: Resource, E: Entity>(
        &mut self,
        mapping: FieldMapping<R, E>,
    ) -> Result<(), MappingError> {
        let key = pair_key::<R, E>();
        if self.mappings.contains_key(&key) {
            return Err(MappingError::Duplicate {
                resource: R::type_name().to_string(),
                entity: E::type_name().to_string(),
            });
        }

        tracing::info!(
            resource = R::type_name(),
            entity = E::type_name(),
            fields = mapping.len(),
            "Registered field mapping"
        );

        self.mappings.insert(
            key,
            RegisteredMapping {
                resource: R::type_name(),
                entity: E::type_name(),
                mapping: Box::new(mapping),
            },
        );

        Ok(())
    }

    /// Build the mapping for a pair from configuration and register it
    ///
    /// The configuration entry is found by the resource and entity type names.
    pub fn register_from_config<R: Resource, E: Entity>(
        &mut self,
        config: &ShapingConfig,
    ) -> Result<(), ShapingError> {
        let mapping_config = config
            .find_mapping(R::type_name(), E::type_name())
            .ok_or_else(|| ConfigError::MissingMapping {
                resource: R::type_name().to_string(),
                entity: E::type_name().to_string(),
            })?;

        let mapping = FieldMapping::<R, E>::from_entries(
            mapping_config
                .fields
                .iter()
                .map(|(field, properties)| (field.clone(), properties.clone())),
        )?;

        self.register(mapping)?;
        Ok(())
    }

    /// Check if a mapping for the pair is registered
    pub fn contains<R: Resource, E: Entity>(&self) -> bool {
        self.mappings.contains_key(&pair_key::<R, E>())
    }

    /// Freeze the registry
    pub fn build(self) -> MappingRegistry {
        tracing::info!(mappings = self.mappings.len(), "Field mapping registry frozen");
        MappingRegistry {
            mappings: self.mappings,
        }
    }
}

/// Read-only set of field mappings
///
/// Obtained from [`MappingRegistryBuilder::build`].
pub struct MappingRegistry {
    mappings: HashMap<PairKey, RegisteredMapping>,
}

impl MappingRegistry {
    /// Start building a registry
    pub fn builder() -> MappingRegistryBuilder {
        MappingRegistryBuilder::new()
    }

    /// Get the mapping registered for a resource/entity pair
    pub fn get<R: Resource, E: Entity>(&self) -> Result<&FieldMapping<R, E>, MappingError> {
        self.mappings
            .get(&pair_key::<R, E>())
            .and_then(|registered| registered.mapping.downcast_ref::<FieldMapping<R, E>>())
            .ok_or_else(|| MappingError::NotFound {
                resource: R::type_name().to_string(),
                entity: E::type_name().to_string(),
            })
    }

    /// Sort-field validator for a resource/entity pair
    pub fn sort_validator<R: Resource, E: Entity>(
        &self,
    ) -> Result<SortValidator<'_, R, E>, MappingError> {
        self.get::<R, E>().map(SortValidator::new)
    }

    /// Check an order-by expression against the mapping of a pair
    ///
    /// True for a blank expression and for any mapped field with or without
    /// a direction qualifier; false for unknown fields, malformed
    /// expressions, and pairs without a mapping.
    pub fn valid_mapping_exists_for<R: Resource, E: Entity>(&self, order_by: &str) -> bool {
        self.sort_validator::<R, E>()
            .map(|validator| validator.is_valid(order_by))
            .unwrap_or(false)
    }

    /// Registered (resource, entity) type names
    pub fn pairs(&self) -> Vec<(&'static str, &'static str)> {
        self.mappings
            .values()
            .map(|registered| (registered.resource, registered.entity))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
