use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{AvocadoType, PriceDataset, PriceRecord};
use crate::error::DataError;

pub const DATE_COLUMN: &str = "Date";
pub const REGION_COLUMN: &str = "region";
pub const TYPE_COLUMN: &str = "type";
pub const PRICE_COLUMN: &str = "AveragePrice";
pub const VOLUME_COLUMN: &str = "Total Volume";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a price dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`            – comma separated, header row
/// * `.tsv` / `.tab`   – tab separated, header row
/// * `.parquet` / `.pq` – Arrow columns with the same names
///
/// Required columns are `Date`, `region`, `type`, `AveragePrice` and
/// `Total Volume`; everything else is ignored.
pub fn load_file(path: &Path) -> Result<PriceDataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "tab" => load_delimited(path, b'\t')?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(DataError::format(
                path,
                format!("unsupported file extension '.{other}'"),
            ))
        }
    };

    log::info!("Loaded {} price records from {}", records.len(), path.display());
    Ok(PriceDataset::new(path, records))
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Positions of the required columns in the source header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    region: usize,
    kind: usize,
    price: usize,
    volume: usize,
}

impl Columns {
    fn locate<'a>(
        path: &Path,
        headers: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DataError> {
        let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| *h == name)
                .ok_or_else(|| DataError::format(path, format!("missing column '{name}'")))
        };

        let columns = Columns {
            date: find(DATE_COLUMN)?,
            region: find(REGION_COLUMN)?,
            kind: find(TYPE_COLUMN)?,
            price: find(PRICE_COLUMN)?,
            volume: find(VOLUME_COLUMN)?,
        };

        let ignored: Vec<&str> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !columns.contains(*i))
            .map(|(_, h)| *h)
            .collect();
        if !ignored.is_empty() {
            log::debug!("Ignoring columns {ignored:?} in {}", path.display());
        }

        Ok(columns)
    }

    fn contains(&self, idx: usize) -> bool {
        [self.date, self.region, self.kind, self.price, self.volume].contains(&idx)
    }
}

// ---------------------------------------------------------------------------
// Cell parsing (shared by all containers)
// ---------------------------------------------------------------------------

/// Raw cell text of one row, before validation.
struct RawRow<'a> {
    date: &'a str,
    region: &'a str,
    kind: &'a str,
    price: &'a str,
    volume: &'a str,
}

impl RawRow<'_> {
    /// `row` is the 1-based data row number used in error messages.
    fn parse(&self, path: &Path, row: usize) -> Result<PriceRecord, DataError> {
        let cell_error = |column: &str, detail: String| {
            DataError::format(path, format!("row {row}, column '{column}': {detail}"))
        };

        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|e| {
            cell_error(DATE_COLUMN, format!("'{}' is not a YYYY-MM-DD date ({e})", self.date))
        })?;

        let region = self.region.trim();
        if region.is_empty() {
            return Err(cell_error(REGION_COLUMN, "empty region".to_string()));
        }

        let kind: AvocadoType = self
            .kind
            .parse()
            .map_err(|e| cell_error(TYPE_COLUMN, format!("{e}")))?;

        let average_price = parse_number(self.price).map_err(|d| cell_error(PRICE_COLUMN, d))?;
        let total_volume = parse_number(self.volume).map_err(|d| cell_error(VOLUME_COLUMN, d))?;
        if total_volume < 0.0 {
            return Err(cell_error(
                VOLUME_COLUMN,
                format!("volume {total_volume} is negative"),
            ));
        }

        Ok(PriceRecord {
            date,
            region: region.to_string(),
            kind,
            average_price,
            total_volume,
        })
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    let tok = s.trim();
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("'{tok}' is not a finite number")),
        Err(_) => Err(format!("'{tok}' is not a number")),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<PriceRecord>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| DataError::from_csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::from_csv(path, e))?
        .clone();
    let cols = Columns::locate(path, headers.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| DataError::from_csv(path, e))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let raw = RawRow {
            date: cell(cols.date),
            region: cell(cols.region),
            kind: cell(cols.kind),
            price: cell(cols.price),
            volume: cell(cols.volume),
        };
        records.push(raw.parse(path, row)?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same column names as the CSV layout.
///
/// `Date` may be stored as text or as an Arrow `Date32`; numeric columns may
/// use any numeric Arrow type.  Every column is cast to text or `Float64` and
/// then goes through the same cell validation as the CSV path.
fn load_parquet(path: &Path) -> Result<Vec<PriceRecord>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::format(path, format!("reading parquet metadata: {e}")))?;

    // Checked against the file schema so a file without row groups still
    // reports missing columns.
    let cols = Columns::locate(
        path,
        builder.schema().fields().iter().map(|f| f.name().as_str()),
    )?;

    let reader = builder
        .build()
        .map_err(|e| DataError::format(path, format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DataError::format(path, format!("reading parquet record batch: {e}")))?;
        append_batch(path, cols, &batch, &mut records)?;
    }

    Ok(records)
}

fn append_batch(
    path: &Path,
    cols: Columns,
    batch: &RecordBatch,
    out: &mut Vec<PriceRecord>,
) -> Result<(), DataError> {
    let date = text_column(path, batch.column(cols.date), DATE_COLUMN)?;
    let region = text_column(path, batch.column(cols.region), REGION_COLUMN)?;
    let kind = text_column(path, batch.column(cols.kind), TYPE_COLUMN)?;
    let price = number_column(path, batch.column(cols.price), PRICE_COLUMN)?;
    let volume = number_column(path, batch.column(cols.volume), VOLUME_COLUMN)?;

    let required: [(&dyn Array, &str); 5] = [
        (&date, DATE_COLUMN),
        (&region, REGION_COLUMN),
        (&kind, TYPE_COLUMN),
        (&price, PRICE_COLUMN),
        (&volume, VOLUME_COLUMN),
    ];

    let first_row = out.len() + 1;
    for i in 0..batch.num_rows() {
        let row = first_row + i;
        for (array, name) in required {
            if array.is_null(i) {
                return Err(DataError::format(
                    path,
                    format!("row {row}, column '{name}': missing value"),
                ));
            }
        }

        // Numbers are already typed; render them so the shared validation applies.
        let price_text = price.value(i).to_string();
        let volume_text = volume.value(i).to_string();
        let raw = RawRow {
            date: date.value(i),
            region: region.value(i),
            kind: kind.value(i),
            price: &price_text,
            volume: &volume_text,
        };
        out.push(raw.parse(path, row)?);
    }

    Ok(())
}

fn text_column(path: &Path, col: &ArrayRef, name: &str) -> Result<StringArray, DataError> {
    let casted = cast(col, &DataType::Utf8).map_err(|e| {
        DataError::format(
            path,
            format!("column '{name}' of type {:?} cannot be read as text: {e}", col.data_type()),
        )
    })?;
    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| DataError::format(path, format!("column '{name}' is not text")))
}

fn number_column(path: &Path, col: &ArrayRef, name: &str) -> Result<Float64Array, DataError> {
    if !col.data_type().is_numeric() {
        return Err(DataError::format(
            path,
            format!("column '{name}' has non-numeric type {:?}", col.data_type()),
        ));
    }
    let casted = cast(col, &DataType::Float64)
        .map_err(|e| DataError::format(path, format!("column '{name}': {e}")))?;
    casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| DataError::format(path, format!("column '{name}' is not numeric")))
}
