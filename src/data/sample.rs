use std::f64::consts::{FRAC_PI_2, PI};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use super::loader::{DATE_COLUMN, PRICE_COLUMN, REGION_COLUMN, TYPE_COLUMN, VOLUME_COLUMN};
use super::model::{AvocadoType, PriceRecord};

/// Seed used by the `generate_sample` binary.
pub const DEFAULT_SEED: u64 = 42;

/// (region, base conventional price, weekly conventional volume)
pub const REGIONS: [(&str, f64, f64); 6] = [
    ("Albany", 1.15, 45_000.0),
    ("Atlanta", 1.05, 350_000.0),
    ("Boston", 1.20, 550_000.0),
    ("California", 1.00, 5_500_000.0),
    ("Denver", 1.10, 700_000.0),
    ("Seattle", 1.25, 400_000.0),
];

/// Organic avocados cost more and sell far less.
const ORGANIC_PRICE_FACTOR: f64 = 1.45;
const ORGANIC_VOLUME_FACTOR: f64 = 0.03;

/// Weekly Sundays from 2015-01-04 through 2018-03-25.
pub fn weeks() -> Vec<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(2015, 1, 4).unwrap_or_default();
    let last = NaiveDate::from_ymd_opt(2018, 3, 25).unwrap_or_default();
    std::iter::successors(Some(first), |d| d.checked_add_days(Days::new(7)))
        .take_while(|d| *d <= last)
        .collect()
}

/// Synthetic weekly rows for every region and both types, grouped by
/// region then type, each group in date order.  The same seed always
/// yields the same rows.
pub fn generate(seed: u64) -> Result<Vec<PriceRecord>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let price_step = Normal::new(0.0, 0.02).map_err(|e| anyhow!("price noise: {e}"))?;
    let volume_noise = Normal::new(0.0, 0.08).map_err(|e| anyhow!("volume noise: {e}"))?;

    let dates = weeks();
    let mut rows = Vec::with_capacity(REGIONS.len() * 2 * dates.len());

    for &(region, base_price, base_volume) in &REGIONS {
        for (kind, price_factor, volume_factor) in [
            (AvocadoType::Conventional, 1.0, 1.0),
            (AvocadoType::Organic, ORGANIC_PRICE_FACTOR, ORGANIC_VOLUME_FACTOR),
        ] {
            // Random walk around a seasonal curve peaking in autumn.
            let mut drift: f64 = 0.0;
            for &date in &dates {
                drift = (drift + price_step.sample(&mut rng)).clamp(-0.3, 0.3);
                let season = (date.ordinal() as f64 / 365.0 * 2.0 * PI - FRAC_PI_2).sin();
                let price = (base_price * price_factor * (1.0 + 0.12 * season) + drift).max(0.4);
                let volume = (base_volume * volume_factor * (1.0 - 0.2 * season)
                    * (1.0 + volume_noise.sample(&mut rng)))
                .max(0.0);

                rows.push(PriceRecord {
                    date,
                    region: region.to_string(),
                    kind,
                    average_price: round_cents(price),
                    total_volume: round_cents(volume),
                });
            }
        }
    }

    Ok(rows)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// pandas-style CSV: unnamed index column plus a `year` column.
pub fn write_csv(path: &Path, rows: &[PriceRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "",
        DATE_COLUMN,
        PRICE_COLUMN,
        VOLUME_COLUMN,
        TYPE_COLUMN,
        "year",
        REGION_COLUMN,
    ])?;
    for (i, row) in rows.iter().enumerate() {
        writer.write_record([
            i.to_string(),
            row.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", row.average_price),
            format!("{:.2}", row.total_volume),
            row.kind.to_string(),
            row.date.year().to_string(),
            row.region.clone(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Parquet with `Date` stored as Arrow `Date32`.  Returns the written batch.
pub fn write_parquet(path: &Path, rows: &[PriceRecord]) -> Result<RecordBatch> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();

    let schema = Arc::new(Schema::new(vec![
        Field::new(DATE_COLUMN, DataType::Date32, false),
        Field::new(PRICE_COLUMN, DataType::Float64, false),
        Field::new(VOLUME_COLUMN, DataType::Float64, false),
        Field::new(TYPE_COLUMN, DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new(REGION_COLUMN, DataType::Utf8, false),
    ]));

    let days: Vec<i32> = rows.iter().map(|r| (r.date - epoch).num_days() as i32).collect();
    let prices: Vec<f64> = rows.iter().map(|r| r.average_price).collect();
    let volumes: Vec<f64> = rows.iter().map(|r| r.total_volume).collect();
    let kinds: Vec<&str> = rows.iter().map(|r| r.kind.as_str()).collect();
    let years: Vec<i64> = rows.iter().map(|r| i64::from(r.date.year())).collect();
    let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(days)),
            Arc::new(Float64Array::from(prices)),
            Arc::new(Float64Array::from(volumes)),
            Arc::new(StringArray::from(kinds)),
            Arc::new(Int64Array::from(years)),
            Arc::new(StringArray::from(regions)),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(batch)
}
