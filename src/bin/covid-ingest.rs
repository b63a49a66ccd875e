use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use covid_cities::data::ingest::{extract_url, read_csv, write_artifact, NYT_URL_TEMPLATE};

/// Fetch yearly NYT county extracts and write one dated Parquet artifact.
#[derive(Debug, Parser)]
#[command(name = "covid-ingest", version, about)]
struct Args {
    /// First year of data to fetch.
    #[arg(long, default_value_t = 2020)]
    oldest_year: i32,

    /// Last year of data to fetch (inclusive).
    #[arg(long, default_value_t = 2022)]
    newest_year: i32,

    /// Directory the artifact is written to.
    #[arg(long, env = "COVID_DATA_DIR", default_value = "./data")]
    out_dir: PathBuf,

    /// Extract URL; `{year}` is replaced by each year.
    #[arg(long, default_value = NYT_URL_TEMPLATE)]
    url_template: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.oldest_year > args.newest_year {
        bail!(
            "--oldest-year {} is after --newest-year {}",
            args.oldest_year,
            args.newest_year
        );
    }

    let client = reqwest::blocking::Client::new();
    let mut records = Vec::new();
    for year in args.oldest_year..=args.newest_year {
        let url = extract_url(&args.url_template, year);
        log::info!("Fetching {url}");
        let body = client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("fetching {url}"))?
            .text()
            .with_context(|| format!("reading body of {url}"))?;
        let mut year_records =
            read_csv(body.as_bytes()).with_context(|| format!("parsing {url}"))?;
        log::info!("{year}: {} rows", year_records.len());
        records.append(&mut year_records);
    }

    let path = write_artifact(&args.out_dir, args.oldest_year, args.newest_year, &records)
        .context("writing artifact")?;
    println!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
