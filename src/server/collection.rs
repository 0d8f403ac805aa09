//! Paged, sortable and shapeable collection endpoints
//!
//! A request runs through a fixed pipeline:
//!
//! 1. clamp the page size
//! 2. validate `orderBy` against the field mapping and translate it to entity sort keys
//! 3. validate `fields` against the resource's declared fields
//! 4. parse `filter`
//! 5. fetch one page from the repository
//! 6. build the pagination metadata and links
//! 7. convert entities to resources and narrow each one to the requested fields
//!
//! Steps 2 to 4 complete before the repository is called, so an invalid
//! request never reaches storage.

use crate::config::ShapingConfig;
use crate::core::entity::{Entity, Resource};
use crate::core::error::ShapingError;
use crate::core::pagination::{PAGINATION_HEADER, PageMetadata};
use crate::core::query::PaginationParameters;
use crate::core::service::{PageQuery, Repository};
use crate::mapping::registry::MappingRegistryBuilder;
use crate::server::host::ShapingHost;
use crate::shaping::{FieldSelection, ShapedResult};
use axum::extract::{Query, State};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::marker::PhantomData;
use std::sync::Arc;

/// One page of shaped resources with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedPage {
    pub items: Vec<ShapedResult>,
    pub metadata: PageMetadata,
}

impl IntoResponse for ShapedPage {
    fn into_response(self) -> Response {
        let header = match self
            .metadata
            .to_header_value()
            .and_then(|value| {
                HeaderValue::from_str(&value).map_err(|e| ShapingError::Internal(e.to_string()))
            }) {
            Ok(header) => header,
            Err(e) => return e.into_response(),
        };

        let mut response = Json(self.items).into_response();
        response
            .headers_mut()
            .insert(HeaderName::from_static(PAGINATION_HEADER), header);
        response
    }
}

/// Run the collection pipeline for one request
///
/// Fails with a client error for an unknown sort field, shape field or
/// filter; the repository is not called in those cases.
pub async fn shape_page<R, E>(
    host: &ShapingHost,
    repository: &dyn Repository<E>,
    route_name: &str,
    params: &PaginationParameters,
) -> Result<ShapedPage, ShapingError>
where
    R: Resource + for<'a> From<&'a E>,
    E: Entity,
{
    let max_page_size = host.max_page_size();
    let params = params.normalized(max_page_size);

    let sort = host
        .mappings
        .sort_validator::<R, E>()?
        .resolve(params.order_by())?;
    let selection = FieldSelection::parse::<R>(params.fields())?;
    let filter = params.filter_value()?;

    let query = PageQuery {
        filter,
        sort,
        page_index: params.page_index,
        page_size: params.page_size,
    };

    tracing::debug!(
        resource = R::type_name(),
        entity = E::type_name(),
        page_index = query.page_index,
        page_size = query.page_size,
        sort = %query.sort.as_ref().map(ToString::to_string).unwrap_or_default(),
        "Querying repository"
    );

    let page = repository
        .query_page(&query)
        .await
        .map_err(|e| ShapingError::from_repository(E::type_name(), e))?;

    let metadata = PageMetadata::build(
        &params,
        page.total_count,
        max_page_size,
        host.links.as_ref(),
        route_name,
    )?;

    let items = page
        .items
        .iter()
        .map(|entity| selection.project(&R::from(entity)))
        .collect();

    Ok(ShapedPage { items, metadata })
}

/// Describes a collection endpoint to the server builder
///
/// Implemented by [`CollectionEndpoint`]; the trait erases the resource and
/// entity types so endpoints of different types can be stored together.
pub trait CollectionDescriptor: Send + Sync {
    /// Route name used for page links (e.g., "countries")
    fn route_name(&self) -> &str;

    /// URL path of the endpoint (e.g., "/api/countries")
    fn path(&self) -> &str;

    /// Register the endpoint's field mapping from configuration unless one
    /// was registered explicitly
    fn ensure_mapping(
        &self,
        mappings: &mut MappingRegistryBuilder,
        config: &ShapingConfig,
    ) -> Result<(), ShapingError>;

    /// Build the endpoint's routes
    fn build_routes(&self, host: Arc<ShapingHost>) -> Router;
}

/// A `GET` collection endpoint exposing entities `E` as resources `R`
pub struct CollectionEndpoint<R, E: Entity> {
    route_name: String,
    path: String,
    repository: Arc<dyn Repository<E>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, E> CollectionEndpoint<R, E>
where
    R: Resource + for<'a> From<&'a E>,
    E: Entity,
{
    pub fn new(
        route_name: impl Into<String>,
        path: impl Into<String>,
        repository: Arc<dyn Repository<E>>,
    ) -> Self {
        Self {
            route_name: route_name.into(),
            path: path.into(),
            repository,
            _resource: PhantomData,
        }
    }
}

impl<R, E> CollectionDescriptor for CollectionEndpoint<R, E>
where
    R: Resource + for<'a> From<&'a E>,
    E: Entity,
{
    fn route_name(&self) -> &str {
        &self.route_name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn ensure_mapping(
        &self,
        mappings: &mut MappingRegistryBuilder,
        config: &ShapingConfig,
    ) -> Result<(), ShapingError> {
        if mappings.contains::<R, E>() {
            return Ok(());
        }
        mappings.register_from_config::<R, E>(config)
    }

    fn build_routes(&self, host: Arc<ShapingHost>) -> Router {
        let state = CollectionState::<R, E> {
            host,
            route_name: Arc::from(self.route_name.as_str()),
            repository: self.repository.clone(),
            _resource: PhantomData,
        };

        Router::new()
            .route(&self.path, get(list_collection::<R, E>))
            .with_state(state)
    }
}

struct CollectionState<R, E: Entity> {
    host: Arc<ShapingHost>,
    route_name: Arc<str>,
    repository: Arc<dyn Repository<E>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, E: Entity> Clone for CollectionState<R, E> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            route_name: self.route_name.clone(),
            repository: self.repository.clone(),
            _resource: PhantomData,
        }
    }
}

async fn list_collection<R, E>(
    State(state): State<CollectionState<R, E>>,
    Query(params): Query<PaginationParameters>,
) -> Result<ShapedPage, ShapingError>
where
    R: Resource + for<'a> From<&'a E>,
    E: Entity,
{
    shape_page::<R, E>(
        &state.host,
        state.repository.as_ref(),
        &state.route_name,
        &params,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::QueryError;
    use crate::core::service::Page;
    use crate::links::UrlLinkBuilder;
    use crate::mapping::registry::MappingRegistry;
    use crate::storage::InMemoryRepository;
    use crate::test_fixtures::{Country, CountryResource, countries, country_mapping};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRepository {
        inner: InMemoryRepository<Country>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Repository<Country> for CountingRepository {
        async fn query_page(&self, query: &PageQuery) -> anyhow::Result<Page<Country>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.query_page(query).await
        }
    }

    fn host() -> ShapingHost {
        let mut mappings = MappingRegistry::builder();
        mappings.register(country_mapping()).expect("mapping");

        let mut config = ShapingConfig::default_config();
        config.paging.max_page_size = 3;

        ShapingHost::new(
            Arc::new(config),
            Arc::new(mappings.build()),
            Arc::new(
                UrlLinkBuilder::new("http://localhost:3000/")
                    .expect("valid base")
                    .with_route("countries", "/countries"),
            ),
        )
    }

    fn repository() -> CountingRepository {
        CountingRepository {
            inner: InMemoryRepository::with_items(countries()),
            calls: AtomicUsize::new(0),
        }
    }

    fn params(order_by: Option<&str>, fields: Option<&str>) -> PaginationParameters {
        PaginationParameters {
            order_by: order_by.map(str::to_string),
            fields: fields.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_shape_page_sorts_shapes_and_pages() {
        let repository = repository();

        let page = shape_page::<CountryResource, Country>(
            &host(),
            &repository,
            "countries",
            &params(Some("englishName desc"), Some("englishName")),
        )
        .await
        .expect("page");

        let names: Vec<_> = page
            .items
            .iter()
            .map(|item| item.get("englishName").and_then(|v| v.as_string()))
            .collect();
        assert_eq!(names, vec![Some("Japan"), Some("France"), Some("Egypt")]);
        assert!(page.items.iter().all(|item| item.len() == 1));

        assert_eq!(page.metadata.page_size, 3, "clamped to configured maximum");
        assert_eq!(page.metadata.page_count, 2);
        assert_eq!(page.metadata.total_items_count, 5);
        assert_eq!(page.metadata.previous_page_link, None);
        assert!(page.metadata.next_page_link.is_some());
    }

    #[tokio::test]
    async fn test_invalid_sort_field_never_reaches_repository() {
        let repository = repository();

        let err = shape_page::<CountryResource, Country>(
            &host(),
            &repository,
            "countries",
            &params(Some("nonexistentField"), None),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ShapingError::Query(QueryError::InvalidSortField { .. })
        ));
        assert_eq!(repository.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_shape_field_never_reaches_repository() {
        let repository = repository();

        let err = shape_page::<CountryResource, Country>(
            &host(),
            &repository,
            "countries",
            &params(None, Some("englishName,Bogus")),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ShapingError::Query(QueryError::InvalidShapeField { ref field }) if field == "Bogus"
        ));
        assert_eq!(repository.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_mapping_is_server_error() {
        let repository = repository();
        let host = ShapingHost::new(
            Arc::new(ShapingConfig::default_config()),
            Arc::new(MappingRegistry::builder().build()),
            Arc::new(UrlLinkBuilder::new("http://localhost:3000/").expect("valid base")),
        );

        let err = shape_page::<CountryResource, Country>(
            &host,
            &repository,
            "countries",
            &params(None, None),
        )
        .await
        .unwrap_err();

        assert!(!err.is_client_error());
        assert_eq!(repository.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ensure_mapping_prefers_explicit_registration() {
        let endpoint = CollectionEndpoint::<CountryResource, Country>::new(
            "countries",
            "/countries",
            Arc::new(InMemoryRepository::with_items(countries())),
        );

        let mut mappings = MappingRegistry::builder();
        mappings.register(country_mapping()).expect("mapping");
        endpoint
            .ensure_mapping(&mut mappings, &ShapingConfig::default_config())
            .expect("already registered");

        let mut mappings = MappingRegistry::builder();
        endpoint
            .ensure_mapping(&mut mappings, &ShapingConfig::default_config())
            .expect("from config");
        assert!(mappings.contains::<CountryResource, Country>());
    }
}
