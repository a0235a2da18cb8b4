//! Two-step discovery: keyword search, then a bounded detail batch.

use asinscope_core::{AppConfig, EnrichedProduct, Keyword};

use crate::client::CatalogClient;
use crate::credential::Credential;
use crate::error::DiscoverError;
use crate::normalize::join_details;

/// Number of identifiers hydrated per discovery when not configured.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Discovers catalog products for a keyword and hydrates them with details.
///
/// Holds only immutable state, so one instance can be shared behind an `Arc`
/// by every request handler.
#[derive(Clone)]
pub struct Discoverer {
    client: CatalogClient,
    api_key: Option<String>,
    batch_size: usize,
}

impl Discoverer {
    /// `batch_size` is clamped to at least 1.
    ///
    /// The key is not validated here; a missing or placeholder key fails each
    /// [`Self::discover`] call instead.
    #[must_use]
    pub fn new(client: CatalogClient, api_key: Option<String>, batch_size: usize) -> Self {
        Self {
            client,
            api_key,
            batch_size: batch_size.max(1),
        }
    }

    /// Builds a discoverer against the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Configuration`] if the HTTP client cannot be
    /// built or the base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, DiscoverError> {
        let client = CatalogClient::with_base_url(
            &config.catalog_base_url,
            config.catalog_timeout_secs,
            &config.catalog_user_agent,
            config.catalog_domain,
        )?;
        Ok(Self::new(
            client,
            config.catalog_api_key.clone(),
            config.catalog_batch_size,
        ))
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether a usable (present, non-placeholder) credential is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        Credential::from_config(self.api_key.as_deref()).is_ok()
    }

    /// Searches the catalog for `keyword` and hydrates the first
    /// [`Self::batch_size`] matches.
    ///
    /// No matches is a successful empty result, and no detail call is made.
    ///
    /// # Errors
    ///
    /// - [`DiscoverError::Configuration`] if the credential is missing or the
    ///   placeholder; raised before any network call.
    /// - [`DiscoverError::Auth`], [`DiscoverError::RateLimited`], or
    ///   [`DiscoverError::Upstream`] from either catalog call. A search failure
    ///   aborts before the detail call.
    pub async fn discover(&self, keyword: &Keyword) -> Result<Vec<EnrichedProduct>, DiscoverError> {
        let credential = Credential::from_config(self.api_key.as_deref())?;

        let identifiers = self.client.search_identifiers(&credential, keyword).await?;
        if identifiers.is_empty() {
            tracing::info!(keyword = %keyword, "catalog search returned no identifiers");
            return Ok(Vec::new());
        }

        let batch = &identifiers[..identifiers.len().min(self.batch_size)];
        tracing::debug!(
            keyword = %keyword,
            found = identifiers.len(),
            requested = batch.len(),
            "hydrating catalog identifiers"
        );

        let records = self.client.fetch_details(&credential, batch).await?;
        let products = join_details(batch, records);

        tracing::info!(
            keyword = %keyword,
            requested = batch.len(),
            returned = products.len(),
            "catalog discovery complete"
        );
        Ok(products)
    }
}
