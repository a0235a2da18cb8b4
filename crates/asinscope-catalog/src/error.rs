use thiserror::Error;

/// Classified failure of a discovery call.
///
/// Each variant maps to a distinct caller-facing status; none of them is ever
/// downgraded to an empty successful result.
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// The catalog credential is missing or still the placeholder value.
    /// Raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The catalog rejected the credential (HTTP 401/403).
    #[error("catalog rejected credential: {message}")]
    Auth { message: String },

    /// The catalog asked us to back off (HTTP 429).
    #[error("catalog rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        /// Seconds from the `Retry-After` header, when the catalog sent one.
        retry_after_secs: Option<u64>,
    },

    /// Any other catalog or transport failure, including timeouts.
    #[error("catalog request failed: {message}")]
    Upstream {
        message: String,
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
    },
}

impl DiscoverError {
    /// Returns `true` for failures a caller may retry after a delay.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Upstream { .. })
    }

    /// Stable machine-readable code for API error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Auth { .. } => "unauthorized",
            Self::RateLimited { .. } => "rate_limited",
            Self::Upstream { .. } => "upstream_error",
        }
    }
}
