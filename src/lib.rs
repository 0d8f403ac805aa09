//! # RestShape
//!
//! Resource shaping, sort-field mapping and pagination for RESTful collection
//! endpoints in Rust.
//!
//! ## Features
//!
//! - **Field Mappings**: Sort by public resource fields, backed by one or more stored entity fields
//! - **Direction Reversal**: Per-field flag flipping ascending/descending for inverse storage order
//! - **Data Shaping**: Clients pick the fields they want with `fields=id,englishName`
//! - **Pagination**: Page counts and ready-to-follow previous/next links in an `X-Pagination` header
//! - **Early Validation**: Unknown sort or output fields are rejected before storage is touched
//! - **Configuration-Based**: Paging limits, base URL and field mappings from YAML
//! - **No Reflection**: Static per-type field tables generated by macros
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restshape::prelude::*;
//!
//! // Stored shape
//! impl_entity!(Country, "country", {
//!     "id" => id,
//!     "englishName" => english_name,
//!     "chineseName" => chinese_name,
//! });
//!
//! // Public shape
//! impl_resource!(CountryResource, "country", {
//!     "id" => id,
//!     "englishName" => english_name,
//!     "chineseName" => chinese_name,
//! });
//!
//! ServerBuilder::new()
//!     .register_mapping(
//!         FieldMapping::<CountryResource, Country>::builder()
//!             .map_same("id")
//!             .map_same("englishName")
//!             .map("chineseName", [MappedProperty::new("chineseName")])
//!             .build()?,
//!     )?
//!     .register_collection::<CountryResource, Country>(
//!         "countries",
//!         "/api/countries",
//!         InMemoryRepository::with_items(countries),
//!     )
//!     .serve("127.0.0.1:3000")
//!     .await?;
//!
//! // GET /api/countries?orderBy=englishName desc&fields=id,chineseName&pageSize=5
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod links;
pub mod mapping;
pub mod server;
pub mod shaping;
pub mod storage;

#[cfg(test)]
mod test_fixtures;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Entity, FieldTable, Resource},
        error::{
            ConfigError, LinkError, MappingError, PaginationError, QueryError, ShapingError,
            StorageError,
        },
        field::FieldValue,
        pagination::{PAGINATION_HEADER, PageInfo, PageMetadata},
        query::PaginationParameters,
        service::{LinkBuilder, Page, PageQuery, Repository},
    };

    // === Macros ===
    pub use crate::{impl_entity, impl_field_table, impl_resource};

    // === Mapping ===
    pub use crate::mapping::{
        FieldMapping, MappedProperty, MappingRegistry, MappingRegistryBuilder, SortClause,
        SortDirection, SortKey, SortValidator,
    };

    // === Shaping ===
    pub use crate::shaping::{FieldSelection, ShapedResult, project, type_has_properties};

    // === Links ===
    pub use crate::links::UrlLinkBuilder;

    // === Storage ===
    pub use crate::storage::InMemoryRepository;

    // === Config ===
    pub use crate::config::{MappingConfig, ShapingConfig};

    // === Server ===
    pub use crate::server::{ServerBuilder, ShapedPage, ShapingHost, shape_page};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
