//! Service traits at the storage and link-generation seams

use crate::core::entity::Entity;
use crate::core::error::LinkError;
use crate::core::query::PaginationParameters;
use crate::mapping::sort::SortClause;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A validated page request handed to a repository
///
/// The sort clause is already translated to entity fields, so repositories
/// never see resource field names.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// Filter object from the request, keys are entity field names
    pub filter: Option<Value>,

    /// Entity sort keys; `None` means the entity's default order
    pub sort: Option<SortClause>,

    /// Zero-based page index
    pub page_index: usize,

    /// Page size, already clamped
    pub page_size: usize,
}

impl PageQuery {
    /// Number of items to skip before the page starts
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

/// One page of entities plus the total number of matching entities
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,

    /// Count of every entity matching the filter, not just this page
    pub total_count: usize,
}

impl<E> Page<E> {
    pub fn new(items: Vec<E>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// Paged read access to stored entities
///
/// The engine is agnostic to the underlying storage mechanism. A repository
/// that cannot interpret a filter key fails with an error wrapping
/// [`QueryError::InvalidFilter`](crate::core::error::QueryError::InvalidFilter),
/// which the collection handler turns into a client error.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Fetch one page of entities
    async fn query_page(&self, query: &PageQuery) -> Result<Page<E>>;
}

/// Produces absolute URLs for named routes
///
/// Used for the previous/next page links of the pagination metadata.
pub trait LinkBuilder: Send + Sync {
    /// Build the URL of `route_name` carrying `params` as its query string
    fn build_link(
        &self,
        route_name: &str,
        params: &PaginationParameters,
    ) -> std::result::Result<String, LinkError>;
}
