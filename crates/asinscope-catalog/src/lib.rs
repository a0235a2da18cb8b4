//! Keyword discovery and detail hydration against a Keepa-style catalog API.
//!
//! [`Discoverer`] runs the two sequential calls (keyword search, then a
//! bounded detail batch) through [`CatalogClient`] and joins the results into
//! [`asinscope_core::EnrichedProduct`] values.

pub mod client;
pub mod credential;
pub mod discover;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::CatalogClient;
pub use credential::{Credential, PLACEHOLDER_API_KEY};
pub use discover::{Discoverer, DEFAULT_BATCH_SIZE};
pub use error::DiscoverError;
pub use normalize::join_details;
pub use types::{RawDetailRecord, SearchSelection, SEARCH_PAGE_SIZE};
