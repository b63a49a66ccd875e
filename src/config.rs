use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use covid_cities::data::artifact::{LookupPolicy, DEFAULT_LOOKBACK_DAYS};

/// Stale artifact shipped with the repository.
const FALLBACK_ARTIFACT: &str = "2020-2022-all-covid-data-through-2022-04-02.parquet";

/// Dashboard settings.  Every flag can also be set through the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "covid-cities", version, about = "Compare COVID-19 case rates across US counties")]
pub struct Config {
    /// Directory searched (recursively) for dated `.parquet` artifacts.
    #[arg(long, env = "COVID_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// State → counties reference file [default: <data-dir>/state_counties.json]
    #[arg(long, env = "COVID_COUNTIES_FILE")]
    pub counties_file: Option<PathBuf>,

    /// Artifact used when nothing recent is found [default: the bundled 2022-04-02 extract]
    #[arg(long, env = "COVID_FALLBACK_ARTIFACT")]
    pub fallback_artifact: Option<PathBuf>,

    /// How many days back (today included) to look for a fresh artifact.
    #[arg(long, env = "COVID_LOOKBACK_DAYS", default_value_t = DEFAULT_LOOKBACK_DAYS)]
    pub lookback_days: u32,

    /// State preselected in the state selector.
    #[arg(long, env = "COVID_DEFAULT_STATE", default_value = "District of Columbia")]
    pub default_state: String,

    /// Initial start of the plotted date range.
    #[arg(long, env = "COVID_START_DATE", default_value = "2022-01-01")]
    pub start_date: NaiveDate,

    /// Earliest selectable start date.
    #[arg(long, env = "COVID_MIN_DATE", default_value = "2019-02-24")]
    pub min_date: NaiveDate,
}

impl Config {
    pub fn counties_path(&self) -> PathBuf {
        self.counties_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("state_counties.json"))
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        let fallback = self
            .fallback_artifact
            .clone()
            .unwrap_or_else(|| self.data_dir.join(FALLBACK_ARTIFACT));
        LookupPolicy {
            max_lookback: self.lookback_days,
            fallback,
        }
    }
}
