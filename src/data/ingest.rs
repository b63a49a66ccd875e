use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};

use super::artifact::artifact_file_name;
use super::model::Observation;
use crate::error::{DataError, Result};

/// Yearly county extracts of the NYT rolling-average dataset.
pub const NYT_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/rolling-averages/us-counties-{year}.csv";

/// URL of one yearly extract.
pub fn extract_url(template: &str, year: i32) -> String {
    template.replace("{year}", &year.to_string())
}

// ---------------------------------------------------------------------------
// CountyRecord – one CSV row
// ---------------------------------------------------------------------------

/// One row of a yearly extract.  Numeric fields may be blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyRecord {
    pub date: NaiveDate,
    pub geoid: String,
    pub county: String,
    pub state: String,
    pub cases: Option<f64>,
    pub cases_avg: Option<f64>,
    pub cases_avg_per_100k: Option<f64>,
    pub deaths: Option<f64>,
    pub deaths_avg: Option<f64>,
    pub deaths_avg_per_100k: Option<f64>,
}

impl CountyRecord {
    /// Dashboard view of the row; `None` when the case rate is blank.
    pub fn to_observation(&self) -> Option<Observation> {
        Some(Observation {
            date: self.date,
            state: self.state.clone(),
            county: self.county.clone(),
            case_rate: self.cases_avg_per_100k?,
            raw_cases: self.cases.map(|c| c as i64).unwrap_or(0),
        })
    }
}

/// Parse one yearly extract.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<CountyRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<CountyRecord>, csv::Error>>()?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet artifact
// ---------------------------------------------------------------------------

/// Column layout of a dated artifact.
pub fn artifact_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("geoid", DataType::Utf8, false),
        Field::new("state", DataType::Utf8, false),
        Field::new("county", DataType::Utf8, false),
        Field::new("cases", DataType::Int64, true),
        Field::new("cases_avg", DataType::Float64, true),
        Field::new("cases_avg_per_100k", DataType::Float64, true),
        Field::new("deaths", DataType::Int64, true),
        Field::new("deaths_avg", DataType::Float64, true),
        Field::new("deaths_avg_per_100k", DataType::Float64, true),
    ]))
}

/// Convert concatenated extracts into one record batch.
pub fn to_record_batch(records: &[CountyRecord]) -> Result<RecordBatch> {
    let dates: Vec<String> = records
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();
    let text = |f: fn(&CountyRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(records.iter().map(f)))
    };
    let int = |f: fn(&CountyRecord) -> Option<f64>| -> ArrayRef {
        Arc::new(Int64Array::from(
            records.iter().map(|r| f(r).map(|v| v as i64)).collect::<Vec<_>>(),
        ))
    };
    let float = |f: fn(&CountyRecord) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let batch = RecordBatch::try_new(
        artifact_schema(),
        vec![
            Arc::new(StringArray::from_iter_values(dates.iter())),
            text(|r| r.geoid.as_str()),
            text(|r| r.state.as_str()),
            text(|r| r.county.as_str()),
            int(|r| r.cases),
            float(|r| r.cases_avg),
            float(|r| r.cases_avg_per_100k),
            int(|r| r.deaths),
            float(|r| r.deaths_avg),
            float(|r| r.deaths_avg_per_100k),
        ],
    )?;
    Ok(batch)
}

/// Write `records` to `dir` as one artifact named after the newest date in
/// the data.  Returns the written path.
pub fn write_artifact(
    dir: &Path,
    oldest_year: i32,
    newest_year: i32,
    records: &[CountyRecord],
) -> Result<PathBuf> {
    let through = records
        .iter()
        .map(|r| r.date)
        .max()
        .ok_or(DataError::EmptyExtract)?;
    let batch = to_record_batch(records)?;

    std::fs::create_dir_all(dir).map_err(|e| DataError::io(dir, e))?;
    let path = dir.join(artifact_file_name(oldest_year, newest_year, through));
    let file = std::fs::File::create(&path).map_err(|e| DataError::io(&path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(path)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_CSV: &str = "\
date,geoid,county,state,cases,cases_avg,cases_avg_per_100k,deaths,deaths_avg,deaths_avg_per_100k
2022-01-01,USA-36998,New York City,New York,43000,40000.5,475.12,30,25.1,0.3
2022-01-02,USA-36998,New York City,New York,41000,41000.25,487.01,,26,0.31
2022-01-01,USA-06037,Los Angeles,California,27000,25000,249.9,20,18.5,0.18
2022-01-01,USA-06999,Unknown,California,12,10,,0,0,
";

    #[test]
    fn parses_blank_numbers_as_missing() {
        let records = read_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].deaths, None);
        assert_eq!(records[3].cases_avg_per_100k, None);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
    }

    #[test]
    fn rows_without_case_rate_are_not_observations() {
        let records = read_csv(SAMPLE_CSV.as_bytes()).unwrap();
        let obs: Vec<Observation> = records.iter().filter_map(|r| r.to_observation()).collect();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].raw_cases, 43000);
        assert_eq!(obs[0].case_rate, 475.12);
    }

    #[test]
    fn artifact_is_named_after_newest_date() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_csv(SAMPLE_CSV.as_bytes()).unwrap();
        let path = write_artifact(dir.path(), 2020, 2022, &records).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2020-2022-all-covid-data-through-2022-01-02.parquet"
        );
        assert!(path.exists());
    }

    #[test]
    fn empty_extract_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_artifact(dir.path(), 2020, 2022, &[]),
            Err(DataError::EmptyExtract)
        ));
    }

    #[test]
    fn url_template_substitutes_year() {
        assert!(extract_url(NYT_URL_TEMPLATE, 2021).ends_with("/us-counties-2021.csv"));
    }
}
