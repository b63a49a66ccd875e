use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::artifact::{find_latest_artifact, ArtifactLocation, ArtifactSource, Clock, LookupPolicy};
use super::ingest::read_csv;
use super::model::{Observation, TimeSeriesStore};
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Locate the newest artifact and load it.
///
/// The returned location carries the as-of date of the artifact actually
/// loaded, so date-range defaults stay consistent with the data.
pub fn load_latest(
    source: &dyn ArtifactSource,
    clock: &dyn Clock,
    policy: &LookupPolicy,
) -> Result<(TimeSeriesStore, ArtifactLocation)> {
    let location = find_latest_artifact(source, clock, policy);
    let store = load_file(&location.path)?;
    Ok((store, location))
}

/// Load a case-rate table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – dated artifact written by `covid-ingest` (or pandas)
/// * `.csv`             – a raw yearly NYT extract
pub fn load_file(path: &Path) -> Result<TimeSeriesStore> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let store = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "csv" => load_csv(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string())),
    };
    log::info!(
        "Loaded {} observations for {} counties from {}",
        store.len(),
        store.region_count(),
        path.display()
    );
    Ok(store)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<TimeSeriesStore> {
    let file = std::fs::File::open(path).map_err(|e| DataError::io(path, e))?;
    let records = read_csv(file)?;
    let total = records.len();
    let observations: Vec<Observation> = records.iter().filter_map(|r| r.to_observation()).collect();
    log_dropped(total, observations.len());
    Ok(TimeSeriesStore::from_observations(observations))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet artifact.
///
/// Required columns (extra columns are ignored):
/// - `date`: Utf8 / LargeUtf8 (`YYYY-MM-DD…`), Date32 or Timestamp
/// - `state`, `county`: Utf8 / LargeUtf8
/// - `cases_avg_per_100k`: any numeric type – the case rate
/// - `cases`: any numeric type – raw daily cases
///
/// Works with files written by `covid-ingest` and by pandas
/// (`df.to_parquet()` with a `date` index).
fn load_parquet(path: &Path) -> Result<TimeSeriesStore> {
    let file = std::fs::File::open(path).map_err(|e| DataError::io(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut observations = Vec::new();
    let mut total = 0;
    for batch in reader {
        let batch = batch?;
        total += batch.num_rows();
        read_batch(&batch, total - batch.num_rows(), &mut observations)?;
    }
    log_dropped(total, observations.len());
    Ok(TimeSeriesStore::from_observations(observations))
}

fn read_batch(batch: &RecordBatch, first_row: usize, out: &mut Vec<Observation>) -> Result<()> {
    let dates = column_as(batch, "date", &DataType::Utf8)?;
    let states = column_as(batch, "state", &DataType::Utf8)?;
    let counties = column_as(batch, "county", &DataType::Utf8)?;
    let rates = column_as(batch, "cases_avg_per_100k", &DataType::Float64)?;
    let cases = column_as(batch, "cases", &DataType::Int64)?;

    let dates = dates.as_string::<i32>();
    let states = states.as_string::<i32>();
    let counties = counties.as_string::<i32>();
    let rates = rates.as_primitive::<Float64Type>();
    let cases = cases.as_primitive::<Int64Type>();

    for row in 0..batch.num_rows() {
        if rates.is_null(row) {
            continue;
        }
        let date = parse_date(dates, row).ok_or_else(|| DataError::BadDate {
            row: first_row + row,
            value: if dates.is_null(row) {
                "<null>".to_string()
            } else {
                dates.value(row).to_string()
            },
        })?;
        out.push(Observation {
            date,
            state: states.value(row).to_string(),
            county: counties.value(row).to_string(),
            case_rate: rates.value(row),
            raw_cases: if cases.is_null(row) { 0 } else { cases.value(row) },
        });
    }
    Ok(())
}

// -- Arrow helpers --

/// Fetch a column by name and cast it to `target`.
fn column_as(batch: &RecordBatch, name: &'static str, target: &DataType) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataError::MissingColumn(name))?;
    let col = batch.column(idx);
    if col.data_type() == target {
        return Ok(col.clone());
    }
    cast(col, target).map_err(|_| DataError::ColumnType {
        column: name,
        found: format!("{:?}", col.data_type()),
    })
}

/// Dates arrive as `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(dates: &arrow::array::StringArray, row: usize) -> Option<NaiveDate> {
    if dates.is_null(row) {
        return None;
    }
    let text = dates.value(row);
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn log_dropped(total: usize, kept: usize) {
    if kept < total {
        log::debug!("Dropped {} rows without a case rate", total - kept);
    }
}
