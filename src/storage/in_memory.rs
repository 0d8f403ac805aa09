//! In-memory implementation of Repository for testing and development

use crate::core::entity::Entity;
use crate::core::error::QueryError;
use crate::core::service::{Page, PageQuery, Repository};
use crate::mapping::sort::{SortDirection, SortKey};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

/// In-memory repository
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Filters are equality terms on entity fields; string terms match
/// case-insensitively by substring.
#[derive(Clone)]
pub struct InMemoryRepository<E: Entity> {
    items: Arc<RwLock<Vec<E>>>,
}

impl<E: Entity> InMemoryRepository<E> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a repository seeded with entities
    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Append an entity
    pub fn insert(&self, item: E) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        items.push(item);
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(items.len())
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn query_page(&self, query: &PageQuery) -> Result<Page<E>> {
        let terms = filter_terms::<E>(query.filter.as_ref())?;
        let sort_keys = sort_keys::<E>(query);

        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matching: Vec<&E> = items
            .iter()
            .filter(|item| {
                terms.iter().all(|(field, term)| {
                    item.field_value(field)
                        .is_some_and(|value| value.matches(term))
                })
            })
            .collect();

        matching.sort_by(|a, b| compare_by_keys(*a, *b, &sort_keys));

        let total_count = matching.len();
        let page = matching
            .into_iter()
            .skip(query.offset())
            .take(query.page_size)
            .cloned()
            .collect();

        tracing::debug!(
            entity = E::type_name(),
            total = total_count,
            page_index = query.page_index,
            page_size = query.page_size,
            "In-memory page query"
        );

        Ok(Page::new(page, total_count))
    }
}

/// Resolve filter keys to canonical entity fields
fn filter_terms<E: Entity>(filter: Option<&Value>) -> Result<Vec<(&'static str, Value)>> {
    let Some(filter) = filter else {
        return Ok(Vec::new());
    };

    let object: &Map<String, Value> = filter.as_object().ok_or_else(|| QueryError::InvalidFilter {
        message: "expected a JSON object".to_string(),
    })?;

    object
        .iter()
        .map(|(key, term)| -> Result<(&'static str, Value)> {
            let field = E::resolve_field(key).ok_or_else(|| QueryError::InvalidFilter {
                message: format!("unknown field '{}' on {}", key, E::type_name()),
            })?;
            Ok((field, term.clone()))
        })
        .collect()
}

/// Sort keys of the query, falling back to the entity's default order
///
/// Sort key names were validated against the mapping, so an unknown name
/// only occurs with a hand-built query and is skipped.
fn sort_keys<E: Entity>(query: &PageQuery) -> Vec<(&'static str, SortDirection)> {
    match &query.sort {
        Some(clause) if !clause.keys.is_empty() => clause
            .keys
            .iter()
            .filter_map(|SortKey { field, direction }| {
                E::resolve_field(field).map(|field| (field, *direction))
            })
            .collect(),
        _ => vec![(E::default_sort_field(), SortDirection::Ascending)],
    }
}

fn compare_by_keys<E: Entity>(a: &E, b: &E, keys: &[(&'static str, SortDirection)]) -> Ordering {
    for (field, direction) in keys {
        let ordering = match (a.field_value(field), b.field_value(field)) {
            (Some(left), Some(right)) => left.compare(&right),
            _ => Ordering::Equal,
        };
        let ordering = direction.apply(ordering);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
