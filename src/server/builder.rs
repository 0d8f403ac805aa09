//! ServerBuilder for fluent API to build HTTP servers

use super::collection::{CollectionDescriptor, CollectionEndpoint};
use super::host::ShapingHost;
use crate::config::ShapingConfig;
use crate::core::entity::{Entity, Resource};
use crate::core::pagination::PAGINATION_HEADER;
use crate::core::service::{LinkBuilder, Repository};
use crate::links::UrlLinkBuilder;
use crate::mapping::property::FieldMapping;
use crate::mapping::registry::MappingRegistryBuilder;
use anyhow::Result;
use axum::Router;
use axum::http::HeaderName;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for creating HTTP servers exposing shaped collection endpoints
///
/// Field mappings come either from explicit registration or, for collections
/// without one, from the `mappings` section of the configuration.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config_file("shaping.yaml")?
///     .register_collection::<CountryResource, Country>(
///         "countries",
///         "/api/countries",
///         InMemoryRepository::with_items(countries),
///     )
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: Option<ShapingConfig>,
    mappings: MappingRegistryBuilder,
    collections: Vec<Box<dyn CollectionDescriptor>>,
    link_builder: Option<Arc<dyn LinkBuilder>>,
    custom_routes: Vec<Router>,
    cors: bool,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            config: None,
            mappings: MappingRegistryBuilder::new(),
            collections: Vec::new(),
            link_builder: None,
            custom_routes: Vec::new(),
            cors: false,
        }
    }

    /// Use this configuration instead of [`ShapingConfig::default_config`]
    pub fn with_config(mut self, config: ShapingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the configuration from a YAML file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = ShapingConfig::from_yaml_file(path)?;
        Ok(self.with_config(config))
    }

    /// Replace the default URL-based page link builder
    pub fn with_link_builder(mut self, links: impl LinkBuilder + 'static) -> Self {
        self.link_builder = Some(Arc::new(links));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Allow cross-origin requests and expose the pagination header to browsers
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Register a field mapping explicitly
    ///
    /// Takes precedence over a configured mapping for the same pair.
    pub fn register_mapping<R: Resource, E: Entity>(
        mut self,
        mapping: FieldMapping<R, E>,
    ) -> Result<Self> {
        self.mappings.register(mapping)?;
        Ok(self)
    }

    /// Register a collection endpoint serving entities `E` as resources `R`
    ///
    /// `route_name` identifies the endpoint when building page links.
    pub fn register_collection<R, E>(
        mut self,
        route_name: impl Into<String>,
        path: impl Into<String>,
        repository: impl Repository<E> + 'static,
    ) -> Self
    where
        R: Resource + for<'a> From<&'a E>,
        E: Entity,
    {
        self.collections
            .push(Box::new(CollectionEndpoint::<R, E>::new(
                route_name,
                path,
                Arc::new(repository),
            )));
        self
    }

    /// Build the shared host and the collection descriptors
    ///
    /// Validates the configuration, registers configured mappings for every
    /// collection still missing one and freezes the mapping registry.
    pub fn build_host(mut self) -> Result<(Arc<ShapingHost>, Vec<Box<dyn CollectionDescriptor>>)> {
        let config = self.config.take().unwrap_or_else(ShapingConfig::default_config);
        config.validate()?;

        for collection in &self.collections {
            collection.ensure_mapping(&mut self.mappings, &config)?;
        }

        let links = match self.link_builder.take() {
            Some(links) => links,
            None => {
                let mut links = UrlLinkBuilder::new(&config.links.base_url)?;
                for collection in &self.collections {
                    links.register_route(collection.route_name(), collection.path());
                }
                Arc::new(links) as Arc<dyn LinkBuilder>
            }
        };

        let host = ShapingHost::new(
            Arc::new(config),
            Arc::new(std::mem::take(&mut self.mappings).build()),
            links,
        );

        Ok((Arc::new(host), self.collections))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let cors = self.cors;
        let (host, collections) = self.build_host()?;

        let mut router = Router::new();
        for collection in &collections {
            tracing::info!(
                route = collection.route_name(),
                path = collection.path(),
                "Registered collection endpoint"
            );
            router = router.merge(collection.build_routes(host.clone()));
        }
        for routes in custom_routes {
            router = router.merge(routes);
        }

        if cors {
            router = router.layer(
                CorsLayer::permissive()
                    .expose_headers([HeaderName::from_static(PAGINATION_HEADER)]),
            );
        }

        Ok(router.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
