use std::fmt;

use crate::error::DiscoverError;

/// Key shipped in sample configs. Treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "demo-key";

/// A validated catalog API key.
///
/// `Debug` never prints the key itself.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Validates the configured key.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Configuration`] if `raw` is `None`, blank,
    /// or equal to [`PLACEHOLDER_API_KEY`].
    pub fn from_config(raw: Option<&str>) -> Result<Self, DiscoverError> {
        match raw.map(str::trim) {
            None | Some("") => Err(DiscoverError::Configuration(
                "missing catalog credential (set CATALOG_API_KEY)".to_string(),
            )),
            Some(PLACEHOLDER_API_KEY) => Err(DiscoverError::Configuration(
                "invalid catalog credential: placeholder key is configured".to_string(),
            )),
            Some(key) => Ok(Self(key.to_owned())),
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}
