//! Field mappings from resource fields to entity fields, and sort validation

pub mod property;
pub mod registry;
pub mod sort;

pub use property::{FieldMapping, FieldMappingBuilder, MappedProperty, MappingEntry};
pub use registry::{MappingRegistry, MappingRegistryBuilder};
pub use sort::{OrderBy, SortClause, SortDirection, SortKey, SortValidator};
