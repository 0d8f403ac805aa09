//! Page link generation
//!
//! This module resolves route names to collection paths and builds the
//! absolute previous/next page links of the pagination metadata.

pub mod registry;
pub mod url_builder;

pub use registry::RouteRegistry;
pub use url_builder::UrlLinkBuilder;
