use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AvocadoType – the `type` column
// ---------------------------------------------------------------------------

/// Avocado category as it appears in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvocadoType {
    Conventional,
    Organic,
}

impl AvocadoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvocadoType::Conventional => "conventional",
            AvocadoType::Organic => "organic",
        }
    }
}

impl fmt::Display for AvocadoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a `type` cell is neither `conventional` nor `organic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown avocado type '{}'", self.0)
    }
}

impl std::error::Error for UnknownType {}

impl FromStr for AvocadoType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("conventional") {
            Ok(AvocadoType::Conventional)
        } else if trimmed.eq_ignore_ascii_case("organic") {
            Ok(AvocadoType::Organic)
        } else {
            Err(UnknownType(trimmed.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// PriceRecord – one row of the table
// ---------------------------------------------------------------------------

/// One weekly observation for a region and avocado type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub region: String,
    #[serde(rename = "type")]
    pub kind: AvocadoType,
    /// Average price of a single avocado, in dollars.
    pub average_price: f64,
    /// Number of avocados sold; never negative.
    pub total_volume: f64,
}

// ---------------------------------------------------------------------------
// PriceDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records of a source file, in file order.
#[derive(Debug, Clone)]
pub struct PriceDataset {
    pub source: PathBuf,
    pub records: Vec<PriceRecord>,
}

impl PriceDataset {
    pub fn new(source: impl Into<PathBuf>, records: Vec<PriceRecord>) -> Self {
        PriceDataset {
            source: source.into(),
            records,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
