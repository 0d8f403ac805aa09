//! Route registry for page links
//!
//! Maps route names (e.g., "countries") to the relative path of the
//! collection endpoint they designate.

use crate::core::error::LinkError;
use std::collections::HashMap;

/// Registry for resolving route names to collection paths
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, String>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route
    ///
    /// The path is stored relative (without leading slash) so it resolves
    /// beneath the base URL's own path. Registering a name twice replaces
    /// the earlier path.
    pub fn register(&mut self, route_name: impl Into<String>, path: &str) {
        let route_name = route_name.into();
        let path = path.trim_start_matches('/').to_string();
        tracing::debug!(route = %route_name, path = %path, "Registered page link route");
        self.routes.insert(route_name, path);
    }

    /// Resolve a route name to its relative path
    pub fn resolve(&self, route_name: &str) -> Result<&str, LinkError> {
        self.routes
            .get(route_name)
            .map(String::as_str)
            .ok_or_else(|| LinkError::UnknownRoute {
                route_name: route_name.to_string(),
            })
    }

    /// Registered route names
    pub fn route_names(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }
}
