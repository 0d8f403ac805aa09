//! Server host holding the shared, read-only engine state
//!
//! Every collection endpoint receives the same `Arc<ShapingHost>`. Nothing in
//! it is mutated after startup, so handlers read it without locking.

use crate::config::ShapingConfig;
use crate::core::service::LinkBuilder;
use crate::mapping::registry::MappingRegistry;
use std::sync::Arc;

/// Host context containing all engine state
pub struct ShapingHost {
    /// Validated configuration
    pub config: Arc<ShapingConfig>,

    /// Frozen field-mapping registry
    pub mappings: Arc<MappingRegistry>,

    /// Builder for previous/next page links
    pub links: Arc<dyn LinkBuilder>,
}

impl ShapingHost {
    pub fn new(
        config: Arc<ShapingConfig>,
        mappings: Arc<MappingRegistry>,
        links: Arc<dyn LinkBuilder>,
    ) -> Self {
        Self {
            config,
            mappings,
            links,
        }
    }

    /// Upper bound for client-requested page sizes
    pub fn max_page_size(&self) -> usize {
        self.config.paging.max_page_size
    }
}
