//! Catalog API request and response shapes.
//!
//! ## Search (`GET /query`)
//! The keyword travels inside a JSON `selection` query parameter. The catalog
//! rejects pages smaller than [`SEARCH_PAGE_SIZE`], so that size is always sent
//! even though only the first few identifiers are hydrated. The response
//! carries the matching ASINs in `asinList`, which is omitted entirely when
//! nothing matched.
//!
//! ## Detail (`GET /product`)
//! `products` maps each ASIN to its record. Every descriptive field on a record
//! is optional, including the record's own `asin`. A missing or non-object
//! `products` field means "no details", not a failure.
//!
//! ## Errors
//! Failure bodies come as `{"error": {"type": .., "message": ..}}`, as
//! `{"error": ".."}`, or as a bare `{"message": ".."}`.

use std::collections::HashMap;

use asinscope_core::Keyword;
use serde::{Deserialize, Serialize};

/// Minimum page size accepted by the search endpoint.
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// JSON payload of the search call's `selection` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSelection {
    pub title: String,
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
}

impl SearchSelection {
    /// First page of title matches for `keyword`.
    #[must_use]
    pub fn for_keyword(keyword: &Keyword) -> Self {
        Self {
            title: keyword.as_str().to_owned(),
            page: 0,
            per_page: SEARCH_PAGE_SIZE,
        }
    }
}

/// Body of a successful search call.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "asinList", default)]
    pub asin_list: Option<Vec<String>>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<u64>,
}

impl SearchResponse {
    #[must_use]
    pub fn into_identifiers(self) -> Vec<String> {
        self.asin_list.unwrap_or_default()
    }
}

/// One product record from the detail call, exactly as the catalog sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawDetailRecord {
    #[serde(default)]
    pub asin: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

/// Pulls detail records out of a detail-call body.
///
/// Entries that do not decode as a [`RawDetailRecord`] are skipped, as are
/// entries whose own `asin` disagrees with the map key they were filed under.
#[must_use]
pub fn detail_records(body: serde_json::Value) -> Vec<RawDetailRecord> {
    let Some(products) = body.get("products").cloned() else {
        tracing::debug!("detail response has no products field");
        return Vec::new();
    };

    let entries: HashMap<String, serde_json::Value> = match serde_json::from_value(products) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "detail response products field is not a mapping");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let record = match serde_json::from_value::<RawDetailRecord>(value) {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "skipping undecodable detail record");
                    return None;
                }
            };
            if let Some(asin) = record.asin.as_deref().filter(|asin| *asin != key) {
                tracing::warn!(
                    key = %key,
                    asin,
                    "detail record filed under a different asin"
                );
                return None;
            }
            Some(record)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error: Option<ProviderErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderErrorDetail {
    Text(String),
    Object {
        #[serde(default)]
        message: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
}

/// Extracts the catalog's own error message from a failure body, if any.
#[must_use]
pub fn provider_message(body: &str) -> Option<String> {
    let parsed: ProviderErrorBody = serde_json::from_str(body).ok()?;
    let from_error = match parsed.error {
        Some(ProviderErrorDetail::Text(text)) => Some(text),
        Some(ProviderErrorDetail::Object { message, kind }) => message.or(kind),
        None => None,
    };
    from_error
        .or(parsed.message)
        .filter(|m| !m.trim().is_empty())
}
