//! Absolute page links built with the `url` crate

use crate::core::error::LinkError;
use crate::core::query::PaginationParameters;
use crate::core::service::LinkBuilder;
use crate::links::registry::RouteRegistry;
use url::Url;

/// [`LinkBuilder`] producing absolute URLs beneath a base URL
///
/// Every request parameter is carried over to the link's query string, so
/// following a link repeats the request with only the page index changed.
///
/// # Example
///
/// ```rust,ignore
/// let links = UrlLinkBuilder::new("http://localhost:3000/")?
///     .with_route("countries", "/api/countries");
/// // http://localhost:3000/api/countries?pageIndex=1&pageSize=10&orderBy=englishName+desc
/// ```
#[derive(Debug, Clone)]
pub struct UrlLinkBuilder {
    base_url: Url,
    routes: RouteRegistry,
}

impl UrlLinkBuilder {
    /// Create a builder for a base URL
    pub fn new(base_url: &str) -> Result<Self, LinkError> {
        let mut base_url = Url::parse(base_url).map_err(|e| LinkError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        // A base without trailing slash would lose its last segment on join
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            routes: RouteRegistry::new(),
        })
    }

    /// Register a named route
    pub fn with_route(mut self, route_name: impl Into<String>, path: &str) -> Self {
        self.routes.register(route_name, path);
        self
    }

    pub fn register_route(&mut self, route_name: impl Into<String>, path: &str) {
        self.routes.register(route_name, path);
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn routes(&self) -> &RouteRegistry {
        &self.routes
    }
}

impl LinkBuilder for UrlLinkBuilder {
    fn build_link(
        &self,
        route_name: &str,
        params: &PaginationParameters,
    ) -> Result<String, LinkError> {
        let path = self.routes.resolve(route_name)?;
        let mut url = self.base_url.join(path).map_err(|e| LinkError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            message: e.to_string(),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.append_pair("pageIndex", &params.page_index.to_string());
            query.append_pair("pageSize", &params.page_size.to_string());
            if let Some(order_by) = &params.order_by {
                query.append_pair("orderBy", order_by);
            }
            if let Some(fields) = &params.fields {
                query.append_pair("fields", fields);
            }
            if let Some(filter) = &params.filter {
                query.append_pair("filter", filter);
            }
        }

        Ok(url.to_string())
    }
}
