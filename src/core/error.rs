//! Typed error handling for the shaping engine
//!
//! Errors are grouped by category so callers can tell client mistakes
//! (an unknown sort or shape field) apart from configuration bugs (a
//! missing or duplicated field mapping).
//!
//! # Error Categories
//!
//! - [`QueryError`]: invalid client query parameters (HTTP 400)
//! - [`MappingError`]: field-mapping registry misconfiguration
//! - [`PaginationError`]: misuse of the pagination calculator
//! - [`LinkError`]: page link construction failures
//! - [`ConfigError`]: configuration parsing and loading
//! - [`StorageError`]: repository failures
//!
//! # Example
//!
//! ```rust,ignore
//! match validator.resolve(params.order_by.as_deref()) {
//!     Ok(sort) => repository.query_page(&query.with_sort(sort)).await?,
//!     Err(QueryError::InvalidSortField { field }) => {
//!         println!("cannot sort by {}", field);
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The main error type of the crate
#[derive(Debug)]
pub enum ShapingError {
    /// Invalid client query parameters
    Query(QueryError),

    /// Field-mapping registry errors
    Mapping(MappingError),

    /// Pagination calculator misuse
    Pagination(PaginationError),

    /// Page link construction errors
    Link(LinkError),

    /// Configuration errors
    Config(ConfigError),

    /// Repository errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ShapingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapingError::Query(e) => write!(f, "{}", e),
            ShapingError::Mapping(e) => write!(f, "{}", e),
            ShapingError::Pagination(e) => write!(f, "{}", e),
            ShapingError::Link(e) => write!(f, "{}", e),
            ShapingError::Config(e) => write!(f, "{}", e),
            ShapingError::Storage(e) => write!(f, "{}", e),
            ShapingError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShapingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShapingError::Query(e) => Some(e),
            ShapingError::Mapping(e) => Some(e),
            ShapingError::Pagination(e) => Some(e),
            ShapingError::Link(e) => Some(e),
            ShapingError::Config(e) => Some(e),
            ShapingError::Storage(e) => Some(e),
            ShapingError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShapingError {
    /// Get the HTTP status code for this error
    ///
    /// Only query errors are the client's fault; everything else points at a
    /// configuration or programming bug.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShapingError::Query(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShapingError::Query(e) => e.error_code(),
            ShapingError::Mapping(e) => e.error_code(),
            ShapingError::Pagination(_) => "PAGINATION_ERROR",
            ShapingError::Link(_) => "LINK_ERROR",
            ShapingError::Config(_) => "CONFIG_ERROR",
            ShapingError::Storage(_) => "STORAGE_ERROR",
            ShapingError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error was caused by the client's input
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShapingError::Query(QueryError::InvalidSortField { field })
            | ShapingError::Query(QueryError::InvalidShapeField { field }) => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShapingError {
    fn into_response(self) -> Response {
        if !self.is_client_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors caused by invalid client query parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The order-by field is not a mapped resource field
    #[error("Cannot sort by '{field}': no such field")]
    InvalidSortField { field: String },

    /// A requested output field is not declared by the resource
    #[error("Cannot shape by '{field}': no such field")]
    InvalidShapeField { field: String },

    /// The filter parameter is not a usable JSON object
    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },
}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::InvalidSortField { .. } => "INVALID_SORT_FIELD",
            QueryError::InvalidShapeField { .. } => "INVALID_SHAPE_FIELD",
            QueryError::InvalidFilter { .. } => "INVALID_FILTER",
        }
    }
}

impl From<QueryError> for ShapingError {
    fn from(err: QueryError) -> Self {
        ShapingError::Query(err)
    }
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors raised while building or reading the field-mapping registry
///
/// These are configuration bugs, expected at startup only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A mapping for this pair is already registered
    #[error("A field mapping from '{resource}' to '{entity}' is already registered")]
    Duplicate { resource: String, entity: String },

    /// No mapping is registered for this pair
    #[error("No field mapping registered from '{resource}' to '{entity}'")]
    NotFound { resource: String, entity: String },

    /// A mapping key is not declared by the resource
    #[error("Resource '{resource}' has no field '{field}'")]
    UnknownResourceField { resource: String, field: String },

    /// A mapped property is not declared by the entity
    #[error("Entity '{entity}' has no field '{field}' (mapped from '{resource_field}')")]
    UnknownEntityField {
        entity: String,
        field: String,
        resource_field: String,
    },

    /// A mapping key has no mapped properties
    #[error("Resource field '{field}' maps to no entity field")]
    EmptyMapping { field: String },

    /// The same resource field was mapped twice
    #[error("Resource field '{field}' is mapped more than once")]
    DuplicateField { field: String },
}

impl MappingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            MappingError::Duplicate { .. } => "DUPLICATE_MAPPING",
            MappingError::NotFound { .. } => "MAPPING_NOT_FOUND",
            MappingError::UnknownResourceField { .. } => "UNKNOWN_RESOURCE_FIELD",
            MappingError::UnknownEntityField { .. } => "UNKNOWN_ENTITY_FIELD",
            MappingError::EmptyMapping { .. } => "EMPTY_MAPPING",
            MappingError::DuplicateField { .. } => "DUPLICATE_MAPPED_FIELD",
        }
    }
}

impl From<MappingError> for ShapingError {
    fn from(err: MappingError) -> Self {
        ShapingError::Mapping(err)
    }
}

// =============================================================================
// Pagination Errors
// =============================================================================

/// Misuse of the pagination calculator
///
/// Callers must check `has_previous` / `has_next` before asking for a link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Page {page_index} has no previous page")]
    NoPreviousPage { page_index: usize },

    #[error("Page {page_index} is the last of {page_count} pages")]
    NoNextPage { page_index: usize, page_count: usize },
}

impl From<PaginationError> for ShapingError {
    fn from(err: PaginationError) -> Self {
        ShapingError::Pagination(err)
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// Errors raised while building page links
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("No route named '{route_name}'")]
    UnknownRoute { route_name: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl From<LinkError> for ShapingError {
    fn from(err: LinkError) -> Self {
        ShapingError::Link(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// No mapping declared for a resource/entity pair
    #[error("No mapping configured from '{resource}' to '{entity}'")]
    MissingMapping { resource: String, entity: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl From<ConfigError> for ShapingError {
    fn from(err: ConfigError) -> Self {
        ShapingError::Config(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by repositories
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Query on '{entity}' failed: {message}")]
    QueryError { entity: String, message: String },
}

impl From<StorageError> for ShapingError {
    fn from(err: StorageError) -> Self {
        ShapingError::Storage(err)
    }
}

impl ShapingError {
    /// Classify a repository failure
    ///
    /// A [`QueryError`] anywhere in the chain (e.g., an unusable filter key)
    /// stays a client error; anything else becomes a [`StorageError`].
    pub fn from_repository(entity: &str, err: anyhow::Error) -> Self {
        if let Some(query_error) = err.chain().find_map(|cause| cause.downcast_ref::<QueryError>()) {
            return ShapingError::Query(query_error.clone());
        }

        ShapingError::Storage(StorageError::QueryError {
            entity: entity.to_string(),
            message: format!("{:#}", err),
        })
    }
}
