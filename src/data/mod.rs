/// Data layer: core types, loading, filtering and series projection.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PriceDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ PriceDataset  │  Vec<PriceRecord> in file order
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  region + type → date-sorted records, selector options
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  date range → price / volume series
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
pub mod series;
