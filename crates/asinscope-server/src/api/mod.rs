mod products;

use std::sync::Arc;

use asinscope_catalog::Discoverer;
use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub discoverer: Arc<Discoverer>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
    /// Sent as a `Retry-After` header, never in the body.
    #[serde(skip)]
    pub retry_after_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
            retry_after_secs: None,
        }
    }

    #[must_use]
    pub fn with_retry_after(mut self, secs: Option<u64>) -> Self {
        self.retry_after_secs = secs;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let retry_after = self.retry_after_secs;
        let mut response = (status, Json(self)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::RETRY_AFTER,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/products/search", get(products::search_products))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &axum::http::Request<axum::body::Body>| {
                        tracing::info_span!(
                            "http.request",
                            method = %request.method(),
                            uri = %request.uri(),
                        )
                    },
                ))
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Liveness only; never calls the catalog.
async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let catalog = if state.discoverer.has_credential() {
        "configured"
    } else {
        "unconfigured"
    };

    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            catalog,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use asinscope_catalog::CatalogClient;
    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderMap, Request};
    use tower::ServiceExt;

    pub(crate) fn app_for(base_url: &str, api_key: Option<&str>, batch_size: usize) -> Router {
        let client = CatalogClient::with_base_url(base_url, 5, "asinscope-test/0.1", 1)
            .expect("client construction should not fail");
        let discoverer = Discoverer::new(client, api_key.map(str::to_owned), batch_size);
        build_app(AppState {
            discoverer: Arc::new(discoverer),
        })
    }

    pub(crate) async fn get_json(
        app: Router,
        uri: &str,
    ) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&bytes).expect("json parse");
        (status, headers, json)
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "upstream_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn api_error_rate_limited_sets_retry_after_header() {
        let response = ApiError::new("req-1", "rate_limited", "slow down")
            .with_retry_after(Some(30))
            .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
            Some("30")
        );
    }

    #[test]
    fn api_error_body_omits_retry_after() {
        let err = ApiError::new("req-1", "rate_limited", "slow down").with_retry_after(Some(5));
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(json["meta"]["request_id"], "req-1");
        assert!(json.get("retry_after_secs").is_none());
    }

    #[tokio::test]
    async fn health_reports_configured_catalog() {
        let app = app_for("http://127.0.0.1:9", Some("real-key"), 5);
        let (status, _, json) = get_json(app, "/api/v1/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["catalog"], "configured");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn health_reports_unconfigured_catalog_for_placeholder_key() {
        let app = app_for("http://127.0.0.1:9", Some("demo-key"), 5);
        let (status, _, json) = get_json(app, "/api/v1/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["catalog"], "unconfigured");
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let app = app_for("http://127.0.0.1:9", None, 5);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header(REQUEST_ID_HEADER, "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json parse");
        assert_eq!(json["meta"]["request_id"], "req-abc");
    }
}
