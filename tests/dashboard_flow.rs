use std::path::Path;

use chrono::{Days, NaiveDate};

use covid_cities::data::artifact::{DirectorySource, FixedClock, LookupPolicy};
use covid_cities::data::chart::prepare_chart;
use covid_cities::data::counties::CountyMap;
use covid_cities::data::filter::{filter_series, DateWindow};
use covid_cities::data::ingest::{write_artifact, CountyRecord};
use covid_cities::data::loader::load_latest;
use covid_cities::data::model::Region;
use covid_cities::data::selection::SelectionSet;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn record(date: NaiveDate, state: &str, county: &str, rate: f64) -> CountyRecord {
    CountyRecord {
        date,
        geoid: format!("USA-{state}-{county}"),
        county: county.to_string(),
        state: state.to_string(),
        cases: Some(rate * 3.0),
        cases_avg: Some(rate * 2.5),
        cases_avg_per_100k: Some(rate),
        deaths: Some(1.0),
        deaths_avg: Some(0.5),
        deaths_avg_per_100k: Some(0.01),
    }
}

/// Daily data for three counties from 2021-12-01 through `through`.
fn write_year(dir: &Path, through: NaiveDate) {
    let mut records = Vec::new();
    let mut date = day("2021-12-01");
    let mut i = 0.0;
    while date <= through {
        records.push(record(date, "New York", "New York City", 300.0 + i));
        records.push(record(date, "California", "Los Angeles", 150.0 + i));
        records.push(record(date, "Texas", "Travis", 80.0));
        date = date.checked_add_days(Days::new(1)).unwrap();
        i += 1.0;
    }
    write_artifact(dir, 2021, 2022, &records).unwrap();
}

#[test]
fn newest_artifact_is_selected_and_filtered() {
    let dir = tempfile::tempdir().unwrap();
    write_year(dir.path(), day("2022-01-20"));
    write_year(&dir.path().join("older"), day("2022-01-15"));

    let source = DirectorySource::parquet(dir.path());
    let policy = LookupPolicy::new(dir.path().join("fallback-2021-06-30.parquet"));
    let (store, loc) = load_latest(&source, &FixedClock(day("2022-01-22")), &policy).unwrap();

    assert!(!loc.stale);
    assert_eq!(loc.as_of, day("2022-01-20"));
    assert_eq!(store.region_count(), 3);

    let mut selection = SelectionSet::new();
    selection.add(Region::new("New York", "New York City"));
    selection.add(Region::new("California", "Los Angeles"));
    selection.add(Region::new("New York", "New York City"));

    let window = DateWindow::new(day("2022-01-01"), day("2022-01-07"));
    let series = filter_series(&store, &selection, window);
    assert_eq!(series.len(), 14);

    let groups = series.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "New York City, New York");
    assert_eq!(groups[1].label, "Los Angeles, California");
    for g in &groups {
        assert_eq!(g.rows.len(), 7);
        assert!(g
            .rows
            .windows(2)
            .all(|w| w[0].observation.date < w[1].observation.date));
    }

    let chart = prepare_chart(&series).unwrap();
    assert_eq!(chart.lines.len(), 2);
    // NYC peaks at 300 + 37 on 2022-01-07.
    assert_eq!(chart.y_max, 400.0);

    let snapshot = series.latest_snapshot();
    assert_eq!(snapshot[0].label, "New York City, New York");
    assert_eq!(snapshot[0].observation.date, day("2022-01-07"));

    selection.clear();
    assert!(filter_series(&store, &selection, window).is_empty());
}

#[test]
fn stale_data_falls_back_without_error() {
    let dir = tempfile::tempdir().unwrap();
    write_year(dir.path(), day("2022-01-20"));
    let fallback = dir
        .path()
        .join("2021-2022-all-covid-data-through-2022-01-20.parquet");

    let source = DirectorySource::parquet(dir.path());
    let policy = LookupPolicy::new(&fallback);
    // Thirty days later nothing is within the lookback window.
    let (store, loc) = load_latest(&source, &FixedClock(day("2022-02-19")), &policy).unwrap();

    assert!(loc.stale);
    assert_eq!(loc.path, fallback);
    assert_eq!(loc.as_of, day("2022-01-20"));
    assert!(!store.is_empty());
}

#[test]
fn reference_data_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state_counties.json");
    std::fs::write(
        &path,
        r#"{"New York": ["New York City", "Albany"], "California": ["Los Angeles"]}"#,
    )
    .unwrap();

    let a = CountyMap::load(&path).unwrap();
    let b = CountyMap::load(&path).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.states().collect::<Vec<_>>(), vec!["New York", "California"]);
    assert!(a.contains(&Region::new("New York", "Albany")));
}
