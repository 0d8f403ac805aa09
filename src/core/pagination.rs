//! Pagination arithmetic and the metadata envelope
//!
//! Metadata travels in the `X-Pagination` response header so the body
//! stays a plain array of shaped objects.

use crate::core::error::ShapingError;
use crate::core::query::{PaginationParameters, clamp_page_size};
use crate::core::service::LinkBuilder;
use serde::{Deserialize, Serialize};

/// Name of the response header carrying [`PageMetadata`]
pub const PAGINATION_HEADER: &str = "x-pagination";

/// Page arithmetic for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page_index: usize,
    /// Clamped page size
    pub page_size: usize,
    pub total_items: usize,
    pub page_count: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    /// Compute page counts after clamping `page_size` to `[1, max_page_size]`
    pub fn new(page_index: usize, page_size: usize, total_items: usize, max_page_size: usize) -> Self {
        let page_size = clamp_page_size(page_size, max_page_size);
        let page_count = total_items.div_ceil(page_size);

        Self {
            page_index,
            page_size,
            total_items,
            page_count,
            has_previous: page_index > 0,
            has_next: page_index < page_count.saturating_sub(1),
        }
    }
}

/// Pagination envelope returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_items_count: usize,
    pub page_size: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

impl PageMetadata {
    /// Build the envelope for a request
    ///
    /// Links are generated only when the corresponding page exists and keep
    /// every other parameter of the request. `params` is left untouched.
    pub fn build(
        params: &PaginationParameters,
        total_items: usize,
        max_page_size: usize,
        links: &dyn LinkBuilder,
        route_name: &str,
    ) -> Result<Self, ShapingError> {
        let info = PageInfo::new(params.page_index, params.page_size, total_items, max_page_size);
        let params = params.normalized(max_page_size);

        let previous_page_link = if info.has_previous {
            Some(links.build_link(route_name, &params.previous_page()?)?)
        } else {
            None
        };

        let next_page_link = if info.has_next {
            Some(links.build_link(route_name, &params.next_page(info.page_count)?)?)
        } else {
            None
        };

        Ok(Self {
            total_items_count: info.total_items,
            page_size: info.page_size,
            page_index: info.page_index,
            page_count: info.page_count,
            previous_page_link,
            next_page_link,
        })
    }

    /// JSON encoding for the `X-Pagination` header
    pub fn to_header_value(&self) -> Result<String, ShapingError> {
        serde_json::to_string(self).map_err(|e| ShapingError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LinkError;

    struct QueryStringLinks;

    impl LinkBuilder for QueryStringLinks {
        fn build_link(
            &self,
            route_name: &str,
            params: &PaginationParameters,
        ) -> Result<String, LinkError> {
            Ok(format!(
                "/{}?pageIndex={}&pageSize={}",
                route_name, params.page_index, params.page_size
            ))
        }
    }

    fn params(page_index: usize, page_size: usize) -> PaginationParameters {
        PaginationParameters {
            page_index,
            page_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_page_info_first_page() {
        let info = PageInfo::new(0, 10, 25, 100);
        assert_eq!(info.page_count, 3);
        assert!(!info.has_previous);
        assert!(info.has_next);
    }

    #[test]
    fn test_page_info_last_page() {
        let info = PageInfo::new(2, 10, 25, 100);
        assert!(info.has_previous);
        assert!(!info.has_next);
    }

    #[test]
    fn test_page_info_past_the_end() {
        let info = PageInfo::new(5, 10, 25, 100);
        assert_eq!(info.page_count, 3);
        assert!(info.has_previous);
        assert!(!info.has_next);

        let info = PageInfo::new(usize::MAX, 10, 25, 100);
        assert!(info.has_previous);
        assert!(!info.has_next);
    }

    #[test]
    fn test_metadata_past_the_end_links_back_only() {
        let metadata =
            PageMetadata::build(&params(5, 10), 25, 100, &QueryStringLinks, "countries")
                .expect("metadata");
        assert_eq!(
            metadata.previous_page_link.as_deref(),
            Some("/countries?pageIndex=4&pageSize=10")
        );
        assert_eq!(metadata.next_page_link, None);

        let metadata =
            PageMetadata::build(&params(usize::MAX, 10), 25, 100, &QueryStringLinks, "countries")
                .expect("metadata");
        assert_eq!(metadata.page_index, usize::MAX);
        assert_eq!(metadata.next_page_link, None);
    }

    #[test]
    fn test_page_info_empty_collection() {
        let info = PageInfo::new(0, 10, 0, 100);
        assert_eq!(info.page_count, 0);
        assert!(!info.has_previous);
        assert!(!info.has_next);
    }

    #[test]
    fn test_page_info_exact_multiple() {
        assert_eq!(PageInfo::new(0, 10, 30, 100).page_count, 3);
        assert_eq!(PageInfo::new(0, 10, 31, 100).page_count, 4);
    }

    #[test]
    fn test_page_size_clamped_before_counting() {
        let info = PageInfo::new(0, 500, 250, 100);
        assert_eq!(info.page_size, 100);
        assert_eq!(info.page_count, 3);

        let info = PageInfo::new(0, 0, 5, 100);
        assert_eq!(info.page_size, 1);
        assert_eq!(info.page_count, 5);
    }

    #[test]
    fn test_metadata_links_follow_flags() {
        let metadata =
            PageMetadata::build(&params(0, 10), 25, 100, &QueryStringLinks, "countries")
                .expect("metadata");
        assert_eq!(metadata.previous_page_link, None);
        assert_eq!(
            metadata.next_page_link.as_deref(),
            Some("/countries?pageIndex=1&pageSize=10")
        );

        let metadata =
            PageMetadata::build(&params(1, 10), 25, 100, &QueryStringLinks, "countries")
                .expect("metadata");
        assert_eq!(
            metadata.previous_page_link.as_deref(),
            Some("/countries?pageIndex=0&pageSize=10")
        );
        assert_eq!(
            metadata.next_page_link.as_deref(),
            Some("/countries?pageIndex=2&pageSize=10")
        );

        let metadata =
            PageMetadata::build(&params(2, 10), 25, 100, &QueryStringLinks, "countries")
                .expect("metadata");
        assert!(metadata.previous_page_link.is_some());
        assert_eq!(metadata.next_page_link, None);
    }

    #[test]
    fn test_metadata_links_use_clamped_size() {
        let metadata =
            PageMetadata::build(&params(0, 500), 250, 100, &QueryStringLinks, "countries")
                .expect("metadata");
        assert_eq!(metadata.page_size, 100);
        assert_eq!(
            metadata.next_page_link.as_deref(),
            Some("/countries?pageIndex=1&pageSize=100")
        );
    }

    #[test]
    fn test_metadata_does_not_mutate_params() {
        let request = params(1, 10);
        let before = request.clone();
        PageMetadata::build(&request, 25, 100, &QueryStringLinks, "countries").expect("metadata");
        assert_eq!(request, before);
    }

    #[test]
    fn test_header_value_is_camel_case() {
        let metadata = PageMetadata::build(&params(0, 10), 0, 100, &QueryStringLinks, "countries")
            .expect("metadata");
        let value: serde_json::Value =
            serde_json::from_str(&metadata.to_header_value().expect("encode")).expect("json");

        assert_eq!(
            value,
            serde_json::json!({
                "totalItemsCount": 0,
                "pageSize": 10,
                "pageIndex": 0,
                "pageCount": 0,
                "previousPageLink": null,
                "nextPageLink": null
            })
        );
    }
}
