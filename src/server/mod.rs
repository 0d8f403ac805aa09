//! Server module for building HTTP servers with shaped collection endpoints
//!
//! This module provides a `ServerBuilder` that registers:
//! - one paged, sortable and shapeable `GET` route per collection
//! - the field mappings each collection needs, from code or configuration
//! - the page link builder shared by every collection

pub mod builder;
pub mod collection;
pub mod host;

pub use builder::ServerBuilder;
pub use collection::{CollectionDescriptor, CollectionEndpoint, ShapedPage, shape_page};
pub use host::ShapingHost;
