//! Query parameters for collection endpoints

use crate::core::error::{PaginationError, QueryError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default upper bound for the page size
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Pagination, sorting and shaping parameters of a collection request
///
/// Extracted from the URL query string. Field names are camelCase on the
/// wire.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_countries(
///     Query(params): Query<PaginationParameters>,
/// ) -> Response {
///     // params.page_index defaults to 0
///     // params.page_size defaults to 10
/// }
///
/// // Usage:
/// GET /api/countries?pageIndex=1&pageSize=5
/// GET /api/countries?orderBy=englishName desc&fields=id,englishName
/// GET /api/countries?filter={"abbreviation": "CN"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationParameters {
    /// Zero-based page index
    pub page_index: usize,

    /// Number of items per page
    ///
    /// Clamped to `[1, max_page_size]` by [`normalized`](Self::normalized).
    pub page_size: usize,

    /// Sort expression
    ///
    /// # Format
    /// - `field` (ascending)
    /// - `field desc` (descending)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// Comma-separated resource field names to include in the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,

    /// Filters as JSON object, consumed by the repository
    ///
    /// # Format
    /// - `{"field": "value"}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for PaginationParameters {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: None,
            fields: None,
            filter: None,
        }
    }
}

impl PaginationParameters {
    /// Copy of these parameters with the page size clamped to `[1, max_page_size]`
    pub fn normalized(&self, max_page_size: usize) -> Self {
        Self {
            page_size: clamp_page_size(self.page_size, max_page_size),
            ..self.clone()
        }
    }

    /// Copy of these parameters pointing at another page
    pub fn with_page_index(&self, page_index: usize) -> Self {
        Self {
            page_index,
            ..self.clone()
        }
    }

    /// Parameters of the previous page
    ///
    /// Fails on the first page; callers check `has_previous` first.
    pub fn previous_page(&self) -> Result<Self, PaginationError> {
        let page_index = self
            .page_index
            .checked_sub(1)
            .ok_or(PaginationError::NoPreviousPage {
                page_index: self.page_index,
            })?;
        Ok(self.with_page_index(page_index))
    }

    /// Parameters of the next page, given the total number of pages
    ///
    /// Fails on the last page; callers check `has_next` first.
    pub fn next_page(&self, page_count: usize) -> Result<Self, PaginationError> {
        match self.page_index.checked_add(1) {
            Some(page_index) if page_index < page_count => Ok(self.with_page_index(page_index)),
            _ => Err(PaginationError::NoNextPage {
                page_index: self.page_index,
                page_count,
            }),
        }
    }

    /// The order-by expression, if non-blank
    pub fn order_by(&self) -> Option<&str> {
        non_blank(self.order_by.as_deref())
    }

    /// The requested fields list, if non-blank
    pub fn fields(&self) -> Option<&str> {
        non_blank(self.fields.as_deref())
    }

    /// Parse the filter JSON string into an object
    pub fn filter_value(&self) -> Result<Option<Value>, QueryError> {
        let Some(raw) = non_blank(self.filter.as_deref()) else {
            return Ok(None);
        };

        let value: Value =
            serde_json::from_str(raw).map_err(|e| QueryError::InvalidFilter {
                message: e.to_string(),
            })?;

        if !value.is_object() {
            return Err(QueryError::InvalidFilter {
                message: "expected a JSON object".to_string(),
            });
        }

        Ok(Some(value))
    }
}

/// Clamp a requested page size to `[1, max_page_size]`
pub fn clamp_page_size(page_size: usize, max_page_size: usize) -> usize {
    page_size.clamp(1, max_page_size.max(1))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
