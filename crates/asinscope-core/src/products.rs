use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Sentinel written into [`EnrichedProduct`] fields the catalog left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// A caller-supplied search term.
///
/// Only emptiness is checked. The text is otherwise kept exactly as given,
/// so `" TableCraft "` is searched upstream with its spaces and casing intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword(String);

impl Keyword {
    /// Wraps `raw` as a keyword.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyKeyword`] if `raw` is empty or whitespace only.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::EmptyKeyword);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Keyword {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// A catalog product hydrated with its descriptive metadata.
///
/// Every field is always populated; gaps in the catalog record are filled
/// with [`NOT_AVAILABLE`] or with the sibling brand/manufacturer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedProduct {
    /// Catalog identifier (ASIN), e.g. `"B000123456"`.
    pub identifier: String,
    pub title: String,
    pub brand: String,
    pub manufacturer: String,
}

impl EnrichedProduct {
    /// Builds a product from optional catalog fields, applying the fallbacks:
    /// a missing brand borrows the manufacturer and vice versa, and anything
    /// still missing becomes [`NOT_AVAILABLE`]. Blank strings count as missing.
    #[must_use]
    pub fn from_parts(
        identifier: impl Into<String>,
        title: Option<String>,
        brand: Option<String>,
        manufacturer: Option<String>,
    ) -> Self {
        let title = non_blank(title);
        let brand = non_blank(brand);
        let manufacturer = non_blank(manufacturer);

        Self {
            identifier: identifier.into(),
            title: title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            brand: brand
                .clone()
                .or_else(|| manufacturer.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            manufacturer: manufacturer
                .or(brand)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
