//! Joins detail records back onto the requested identifier batch.

use std::collections::HashMap;

use asinscope_core::EnrichedProduct;

use crate::types::RawDetailRecord;

/// Normalizes a single record. Returns `None` when the record carries no
/// identifier of its own.
#[must_use]
pub fn normalize_record(record: RawDetailRecord) -> Option<EnrichedProduct> {
    let identifier = record.asin.filter(|asin| !asin.trim().is_empty())?;
    Some(EnrichedProduct::from_parts(
        identifier,
        record.title,
        record.brand,
        record.manufacturer,
    ))
}

/// Builds the result set for `batch` from an unordered set of detail records.
///
/// Output order follows `batch`. Records without an identifier, or for an
/// identifier that was not requested, are dropped; each requested identifier
/// yields at most one product.
#[must_use]
pub fn join_details(batch: &[String], records: Vec<RawDetailRecord>) -> Vec<EnrichedProduct> {
    let mut by_identifier: HashMap<String, EnrichedProduct> = records
        .into_iter()
        .filter_map(normalize_record)
        .map(|product| (product.identifier.clone(), product))
        .collect();

    batch
        .iter()
        .filter_map(|identifier| by_identifier.remove(identifier))
        .collect()
}
