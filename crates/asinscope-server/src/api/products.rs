use asinscope_catalog::DiscoverError;
use asinscope_core::{EnrichedProduct, Keyword};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(alias = "q")]
    pub keyword: Option<String>,
}

pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<EnrichedProduct>>>, ApiError> {
    let keyword = Keyword::parse(query.keyword.unwrap_or_default())
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let data = state
        .discoverer
        .discover(&keyword)
        .await
        .map_err(|e| map_discover_error(req_id.0.clone(), &keyword, &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_discover_error(request_id: String, keyword: &Keyword, error: &DiscoverError) -> ApiError {
    if error.is_retryable() {
        tracing::warn!(keyword = %keyword, code = error.code(), error = %error, "catalog discovery failed");
    } else {
        tracing::error!(keyword = %keyword, code = error.code(), error = %error, "catalog discovery failed");
    }

    let retry_after = match error {
        DiscoverError::RateLimited {
            retry_after_secs, ..
        } => *retry_after_secs,
        _ => None,
    };

    ApiError::new(request_id, error.code(), error.to_string()).with_retry_after(retry_after)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{app_for, get_json};
    use axum::http::{header, StatusCode};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn search_returns_enriched_products_in_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "asinList": ["B000123456", "B000654321"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/product"))
            .and(query_param("asin", "B000123456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": {
                    "B000123456": {
                        "asin": "B000123456",
                        "title": "TableCraft Sauce Cup",
                        "brand": "TableCraft"
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server.uri(), Some("real-key"), 1);
        let (status, _, json) = get_json(app, "/api/v1/products/search?keyword=tablecraft").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["data"],
            json!([{
                "identifier": "B000123456",
                "title": "TableCraft Sauce Cup",
                "brand": "TableCraft",
                "manufacturer": "TableCraft"
            }])
        );
        assert!(json["meta"]["request_id"].is_string());
        assert!(json["meta"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn blank_or_missing_keyword_is_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for uri in [
            "/api/v1/products/search",
            "/api/v1/products/search?keyword=",
            "/api/v1/products/search?keyword=%20%20",
        ] {
            let app = app_for(&server.uri(), Some("real-key"), 5);
            let (status, _, json) = get_json(app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
            assert_eq!(json["error"]["code"], "validation_error");
        }
    }

    #[tokio::test]
    async fn missing_credential_is_configuration_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = app_for(&server.uri(), None, 5);
        let (status, _, json) = get_json(app, "/api/v1/products/search?keyword=cups").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "configuration_error");
    }

    #[tokio::test]
    async fn rejected_credential_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server.uri(), Some("revoked-key"), 5);
        let (status, _, json) = get_json(app, "/api/v1/products/search?keyword=cups").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");
        let message = json["error"]["message"].as_str().unwrap_or_default();
        assert!(!message.contains("revoked-key"), "credential leaked: {message}");
    }

    #[tokio::test]
    async fn rate_limit_forwards_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server.uri(), Some("real-key"), 5);
        let (status, headers, json) =
            get_json(app, "/api/v1/products/search?keyword=cups").await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(
            headers
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
            Some("12")
        );
    }

    #[tokio::test]
    async fn upstream_failure_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server.uri(), Some("real-key"), 5);
        let (status, headers, json) =
            get_json(app, "/api/v1/products/search?keyword=cups").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "upstream_error");
        assert!(headers.get(header::RETRY_AFTER).is_none());
    }

    #[tokio::test]
    async fn no_matches_is_empty_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"asinList": []})))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server.uri(), Some("real-key"), 5);
        let (status, _, json) = get_json(app, "/api/v1/products/search?q=zzz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
    }
}
