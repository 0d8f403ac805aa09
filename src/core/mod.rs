//! Core module containing fundamental traits and types for the engine

pub mod entity;
pub mod error;
pub mod field;
pub mod pagination;
pub mod query;
pub mod service;

pub use entity::{Entity, FieldTable, Resource};
pub use error::{
    ConfigError, LinkError, MappingError, PaginationError, QueryError, ShapingError, StorageError,
};
pub use field::FieldValue;
pub use pagination::{PAGINATION_HEADER, PageInfo, PageMetadata};
pub use query::PaginationParameters;
pub use service::{LinkBuilder, Page, PageQuery, Repository};
