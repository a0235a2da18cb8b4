//! HTTP client for the catalog's search and detail endpoints.
//!
//! Wraps `reqwest` with credential handling, per-call timeouts, and status
//! classification. Every non-2xx status is turned into a [`DiscoverError`]
//! variant at this boundary, so callers never see raw HTTP errors.

use std::time::Duration;

use asinscope_core::Keyword;
use reqwest::{header::RETRY_AFTER, Client, StatusCode, Url};

use crate::credential::Credential;
use crate::error::DiscoverError;
use crate::types::{
    detail_records, provider_message, RawDetailRecord, SearchResponse, SearchSelection,
};

const SEARCH_PATH: &str = "query";
const DETAIL_PATH: &str = "product";

/// Client for the catalog REST API.
///
/// Built from the configured base URL, which tests point at a mock server.
/// Cloning is cheap; the connection pool is shared.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    domain: u8,
}

impl CatalogClient {
    /// Creates a client with a custom base URL.
    ///
    /// `timeout_secs` bounds each call end to end; exceeding it surfaces as
    /// [`DiscoverError::Upstream`].
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Configuration`] if the `reqwest::Client`
    /// cannot be constructed or `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        domain: u8,
    ) -> Result<Self, DiscoverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                DiscoverError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        // Exactly one trailing slash, so joining "query"/"product" appends a
        // segment instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            DiscoverError::Configuration(format!("invalid catalog base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            base_url,
            domain,
        })
    }

    /// Runs the keyword search and returns the matching identifiers in
    /// catalog order. A response without `asinList` yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`DiscoverError::Auth`] on HTTP 401/403.
    /// - [`DiscoverError::RateLimited`] on HTTP 429.
    /// - [`DiscoverError::Upstream`] on any other status, a transport failure,
    ///   a timeout, or a body that does not match the search response shape.
    pub async fn search_identifiers(
        &self,
        credential: &Credential,
        keyword: &Keyword,
    ) -> Result<Vec<String>, DiscoverError> {
        let selection = serde_json::to_string(&SearchSelection::for_keyword(keyword)).map_err(
            |e| DiscoverError::Upstream {
                message: format!("could not encode search selection: {e}"),
                status: None,
            },
        )?;

        let url = self.build_url(SEARCH_PATH, credential, &[("selection", &selection)]);
        let body = self.request_json(&url, SEARCH_PATH).await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| DiscoverError::Upstream {
                message: format!("malformed search response: {e}"),
                status: None,
            })?;

        tracing::debug!(
            total_results = response.total_results,
            "catalog search completed"
        );
        Ok(response.into_identifiers())
    }

    /// Fetches detail records for `identifiers` in one batched call.
    ///
    /// A response whose `products` field is absent or not a mapping yields no
    /// records.
    ///
    /// # Errors
    ///
    /// Classified exactly as [`Self::search_identifiers`].
    pub async fn fetch_details(
        &self,
        credential: &Credential,
        identifiers: &[String],
    ) -> Result<Vec<RawDetailRecord>, DiscoverError> {
        let joined = identifiers.join(",");
        let url = self.build_url(DETAIL_PATH, credential, &[("asin", &joined)]);
        let body = self.request_json(&url, DETAIL_PATH).await?;
        Ok(detail_records(body))
    }

    /// Builds an endpoint URL with `key`, `domain`, and any extra parameters,
    /// all percent-encoded through [`Url::query_pairs_mut`].
    fn build_url(&self, path: &str, credential: &Credential, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", credential.expose());
            pairs.append_pair("domain", &self.domain.to_string());
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request and parses a 2xx body as JSON, classifying every
    /// other outcome.
    ///
    /// The URL carries the credential, so it is stripped from transport
    /// errors before they are surfaced.
    async fn request_json(
        &self,
        url: &Url,
        endpoint: &'static str,
    ) -> Result<serde_json::Value, DiscoverError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());

        if !status.is_success() {
            // The status alone classifies the failure; a broken body only
            // costs the provider message.
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, retry_after_secs, &body);
            tracing::warn!(endpoint, status = status.as_u16(), error = %err, "catalog call failed");
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(endpoint, e))?;
        serde_json::from_str(&body).map_err(|e| DiscoverError::Upstream {
            message: format!("{endpoint} response is not valid JSON: {e}"),
            status: Some(status.as_u16()),
        })
    }
}

/// Maps a non-2xx catalog response onto the error taxonomy, keeping the
/// catalog's own message when the body carries one.
pub(crate) fn classify_failure(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> DiscoverError {
    let message = provider_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DiscoverError::Auth {
            message: message.unwrap_or_else(|| "invalid credential".to_string()),
        },
        StatusCode::TOO_MANY_REQUESTS => DiscoverError::RateLimited {
            message: message.unwrap_or_else(|| "rate limit exceeded".to_string()),
            retry_after_secs,
        },
        _ => DiscoverError::Upstream {
            message: message.unwrap_or_else(|| format!("unexpected HTTP status {status}")),
            status: Some(status.as_u16()),
        },
    }
}

fn transport_error(endpoint: &str, err: reqwest::Error) -> DiscoverError {
    let err = err.without_url();
    let message = if err.is_timeout() {
        format!("{endpoint} request timed out: {err}")
    } else {
        format!("{endpoint} request failed: {err}")
    };
    tracing::warn!(endpoint, error = %err, "catalog transport failure");
    DiscoverError::Upstream {
        message,
        status: err.status().map(|s| s.as_u16()),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
