use std::collections::BTreeSet;
use std::path::Path;

use super::loader::load_file;
use super::model::{AvocadoType, PriceRecord};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Filter predicate: one region and one type
// ---------------------------------------------------------------------------

/// The region/type pair a view is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub region: String,
    pub kind: AvocadoType,
}

impl RecordQuery {
    pub fn new(region: impl Into<String>, kind: AvocadoType) -> Self {
        RecordQuery {
            region: region.into(),
            kind,
        }
    }

    pub fn matches(&self, record: &PriceRecord) -> bool {
        record.kind == self.kind && record.region == self.region
    }
}

/// Rows matching `query`, sorted ascending by date.
///
/// The sort is stable, so rows sharing a date keep their input order.
/// No match yields an empty vector; see [`require_rows`].
pub fn filter_records(records: &[PriceRecord], query: &RecordQuery) -> Vec<PriceRecord> {
    let mut selected: Vec<PriceRecord> = records
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect();
    selected.sort_by_key(|r| r.date);
    selected
}

/// Load `path` and keep only the rows for `region` and `kind`, sorted by date.
pub fn prepare(
    path: &Path,
    region: &str,
    kind: AvocadoType,
) -> Result<Vec<PriceRecord>, DataError> {
    let dataset = load_file(path)?;
    Ok(filter_records(&dataset.records, &RecordQuery::new(region, kind)))
}

/// Turn an empty filter result into [`DataError::EmptyResult`].
pub fn require_rows<'a>(
    records: &'a [PriceRecord],
    query: &RecordQuery,
) -> Result<&'a [PriceRecord], DataError> {
    if records.is_empty() {
        Err(DataError::EmptyResult {
            region: query.region.clone(),
            kind: query.kind,
        })
    } else {
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Distinct values offered by the region and type selectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Sorted lexicographically.
    pub regions: Vec<String>,
    /// In order of first appearance in the source.
    pub kinds: Vec<AvocadoType>,
}

impl FilterOptions {
    /// Derive the option lists from the full, unfiltered records.
    pub fn derive(records: &[PriceRecord]) -> Self {
        let regions: BTreeSet<&str> = records.iter().map(|r| r.region.as_str()).collect();

        let mut kinds = Vec::new();
        for r in records {
            if !kinds.contains(&r.kind) {
                kinds.push(r.kind);
            }
        }

        FilterOptions {
            regions: regions.into_iter().map(str::to_string).collect(),
            kinds,
        }
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    pub fn has_kind(&self, kind: AvocadoType) -> bool {
        self.kinds.contains(&kind)
    }
}
