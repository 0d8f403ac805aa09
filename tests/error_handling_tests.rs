//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly
//! - Error matching allows clients to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use restshape::prelude::*;
use serde_json::{Value, json};

async fn response_body(err: ShapingError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_query_errors_return_400() {
        for err in [
            QueryError::InvalidSortField {
                field: "bogus".to_string(),
            },
            QueryError::InvalidShapeField {
                field: "bogus".to_string(),
            },
            QueryError::InvalidFilter {
                message: "expected a JSON object".to_string(),
            },
        ] {
            assert_eq!(ShapingError::from(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_mapping_errors_return_500() {
        let err = ShapingError::from(MappingError::Duplicate {
            resource: "country".to_string(),
            entity: "country".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_pagination_errors_return_500() {
        let err = ShapingError::from(PaginationError::NoNextPage {
            page_index: 2,
            page_count: 3,
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "PAGINATION_ERROR");
    }

    #[test]
    fn test_storage_errors_return_500() {
        let err = ShapingError::from(StorageError::QueryError {
            entity: "country".to_string(),
            message: "connection reset".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_client_error());
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod response_format_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_sort_field_response() {
        let (status, body) = response_body(ShapingError::from(QueryError::InvalidSortField {
            field: "nonexistentField".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "code": "INVALID_SORT_FIELD",
                "message": "Cannot sort by 'nonexistentField': no such field",
                "details": { "field": "nonexistentField" }
            })
        );
    }

    #[tokio::test]
    async fn test_internal_error_response_has_no_details() {
        let (status, body) =
            response_body(ShapingError::Internal("header encoding failed".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_missing_mapping_response() {
        let (status, body) = response_body(ShapingError::from(MappingError::NotFound {
            resource: "city".to_string(),
            entity: "city".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "MAPPING_NOT_FOUND");
        assert!(body["message"].as_str().expect("message").contains("city"));
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[test]
    fn test_conversions_pick_the_category() {
        assert!(matches!(
            ShapingError::from(LinkError::UnknownRoute {
                route_name: "cities".to_string()
            }),
            ShapingError::Link(_)
        ));
        assert!(matches!(
            ShapingError::from(ConfigError::FileNotFound {
                path: "missing.yaml".to_string()
            }),
            ShapingError::Config(_)
        ));
    }

    #[test]
    fn test_repository_errors_are_classified() {
        let client = ShapingError::from_repository(
            "country",
            anyhow::Error::new(QueryError::InvalidFilter {
                message: "unknown field 'population' on country".to_string(),
            }),
        );
        assert!(client.is_client_error());

        let server = ShapingError::from_repository("country", anyhow::anyhow!("timeout"));
        assert!(matches!(
            server,
            ShapingError::Storage(StorageError::QueryError { ref entity, .. }) if entity == "country"
        ));
    }

    #[test]
    fn test_anyhow_round_trip() {
        let err: anyhow::Error = ShapingError::from(QueryError::InvalidShapeField {
            field: "Bogus".to_string(),
        })
        .into();

        match err.downcast_ref::<ShapingError>() {
            Some(ShapingError::Query(QueryError::InvalidShapeField { field })) => {
                assert_eq!(field, "Bogus");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
