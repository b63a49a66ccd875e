use std::path::Path;

use chrono::NaiveDate;

use covid_cities::data::artifact::{embedded_date, ArtifactLocation, Clock, DirectorySource};
use covid_cities::data::chart::{prepare_chart, ChartData, ChartError};
use covid_cities::data::counties::CountyMap;
use covid_cities::data::filter::{filter_series, DateWindow, FilteredSeries};
use covid_cities::data::loader::{load_file, load_latest};
use covid_cities::data::model::{Region, TimeSeriesStore};
use covid_cities::data::selection::SelectionSet;

use crate::color::ColorMap;
use crate::config::Config;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One dashboard session, independent of rendering.
///
/// Created at startup, mutated only through the methods below, dropped when
/// the window closes.
pub struct AppState {
    /// State → counties reference data (loaded once).
    pub counties: CountyMap,

    /// Case-rate table (loaded once, replaced only by File → Open).
    pub store: TimeSeriesStore,

    /// Where `store` came from.
    pub artifact: Option<ArtifactLocation>,

    /// Regions the user chose to compare.
    pub selection: SelectionSet,

    /// Current value of the state selector.
    pub chosen_state: String,

    /// Current value of the county selector.
    pub chosen_county: String,

    /// Start of the plotted window; the end is always `as_of`.
    pub start_date: NaiveDate,

    /// Earliest selectable start date.
    pub min_date: NaiveDate,

    /// Latest date the loaded data is valid for.
    pub as_of: NaiveDate,

    /// Local date, for "today"/"yesterday" labels.
    pub today: NaiveDate,

    /// Selection × window view of `store` (recomputed on every change).
    pub series: FilteredSeries,

    /// Chart lines prepared from `series`.
    pub chart: Result<ChartData, ChartError>,

    /// Colour per selected location.
    pub color_map: ColorMap,

    /// Load / error message shown in the UI.
    pub status_message: Option<String>,

    /// Chart fault of the current series; reset on every recompute.
    pub chart_warning: Option<String>,
}

impl AppState {
    /// Load reference data and the newest artifact described by `config`.
    ///
    /// Load failures are reported in `status_message`; the session still
    /// starts with whatever could be loaded.
    pub fn load(config: &Config, clock: &dyn Clock) -> Self {
        let mut errors = Vec::new();

        let counties = match CountyMap::load(&config.counties_path()) {
            Ok(map) => {
                log::info!("Loaded {} states from {}", map.len(), config.counties_path().display());
                map
            }
            Err(e) => {
                log::error!("Failed to load reference data: {e}");
                errors.push(format!("Reference data: {e}"));
                CountyMap::default()
            }
        };

        let source = DirectorySource::parquet(&config.data_dir);
        let (store, artifact) = match load_latest(&source, clock, &config.lookup_policy()) {
            Ok((store, loc)) => (store, Some(loc)),
            Err(e) => {
                log::error!("Failed to load case data: {e}");
                errors.push(format!("Case data: {e}"));
                (TimeSeriesStore::default(), None)
            }
        };

        let mut state = Self::new(counties, store, artifact, config, clock.today());
        if !errors.is_empty() {
            state.status_message = Some(errors.join(" | "));
        }
        state
    }

    /// Assemble a session from already loaded data.
    pub fn new(
        counties: CountyMap,
        store: TimeSeriesStore,
        artifact: Option<ArtifactLocation>,
        config: &Config,
        today: NaiveDate,
    ) -> Self {
        let as_of = artifact
            .as_ref()
            .map(|a| a.as_of)
            .or_else(|| store.date_range().map(|(_, last)| last))
            .unwrap_or(today);

        let mut state = AppState {
            counties,
            store,
            artifact,
            selection: SelectionSet::new(),
            chosen_state: String::new(),
            chosen_county: String::new(),
            start_date: config.start_date,
            min_date: config.min_date,
            as_of,
            today,
            series: FilteredSeries::default(),
            chart: Err(ChartError::NoData),
            color_map: ColorMap::default(),
            status_message: None,
            chart_warning: None,
        };

        let initial = if state.counties.state_index(&config.default_state).is_some() {
            Some(config.default_state.clone())
        } else {
            state.counties.states().next().map(str::to_string)
        };
        if let Some(s) = initial {
            state.choose_state(&s);
        }
        state.start_date = state.clamp_start(state.start_date);
        state.recompute();
        state
    }

    /// Closed window currently plotted.
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.as_of)
    }

    /// Change the state selector; the county selector resets to the first
    /// county of the new state.
    pub fn choose_state(&mut self, state: &str) {
        self.chosen_state = state.to_string();
        self.chosen_county = self
            .counties
            .counties(state)
            .first()
            .cloned()
            .unwrap_or_default();
    }

    pub fn choose_county(&mut self, county: &str) {
        self.chosen_county = county.to_string();
    }

    /// "Add to plot": select the current (state, county) pair.
    pub fn add_current(&mut self) {
        if self.chosen_state.is_empty() || self.chosen_county.is_empty() {
            return;
        }
        let region = Region::new(&self.chosen_state, &self.chosen_county);
        if self.selection.add(region.clone()) {
            log::debug!("Selected {region}");
            if !self.store.contains_region(&region) {
                log::warn!("No observations for {region}");
            }
            self.recompute();
        }
    }

    /// "Clear": forget every selected region.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    /// Move the start of the window, clamped to `[min_date, as_of]`.
    pub fn set_start_date(&mut self, date: NaiveDate) {
        let date = self.clamp_start(date);
        if date != self.start_date {
            self.start_date = date;
            self.recompute();
        }
    }

    /// Replace the case data with a file picked by the user.
    pub fn open_artifact(&mut self, path: &Path) {
        match load_file(path) {
            Ok(store) => {
                let as_of = embedded_date(path)
                    .or_else(|| store.date_range().map(|(_, last)| last))
                    .unwrap_or(self.today);
                self.store = store;
                self.artifact = Some(ArtifactLocation {
                    path: path.to_path_buf(),
                    as_of,
                    stale: false,
                });
                self.as_of = as_of;
                self.start_date = self.clamp_start(self.start_date);
                self.status_message = None;
                self.recompute();
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn clamp_start(&self, date: NaiveDate) -> NaiveDate {
        if self.min_date > self.as_of {
            return self.as_of;
        }
        date.clamp(self.min_date, self.as_of)
    }

    /// Rebuild the filtered series, chart and colours.
    pub fn recompute(&mut self) {
        self.series = filter_series(&self.store, &self.selection, self.window());
        self.chart = prepare_chart(&self.series);
        self.chart_warning = match &self.chart {
            Err(e @ ChartError::NonFinite { .. }) => {
                log::error!("Cannot draw chart: {e}");
                Some(format!("Chart unavailable: {e}"))
            }
            _ => None,
        };
        let labels: Vec<String> = self.selection.all().iter().map(Region::label).collect();
        self.color_map = ColorMap::new(labels.iter().map(String::as_str));
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use covid_cities::data::model::Observation;

    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state() -> AppState {
        let counties = CountyMap::from_json(
            r#"{"California": ["Alameda", "Los Angeles"],
                "District of Columbia": ["District of Columbia"],
                "New York": ["New York City"]}"#,
        )
        .unwrap();

        let mut rows = Vec::new();
        let mut date = day("2021-12-20");
        while date <= day("2022-01-10") {
            for (s, c, rate) in [
                ("California", "Los Angeles", 120.0),
                ("New York", "New York City", 310.0),
                ("District of Columbia", "District of Columbia", 90.0),
            ] {
                rows.push(Observation {
                    date,
                    state: s.into(),
                    county: c.into(),
                    case_rate: rate,
                    raw_cases: 1,
                });
            }
            date = date.succ_opt().unwrap();
        }
        let store = TimeSeriesStore::from_observations(rows);
        let artifact = ArtifactLocation {
            path: "data/x-through-2022-01-07.parquet".into(),
            as_of: day("2022-01-07"),
            stale: false,
        };
        let config = Config::parse_from(["covid-cities"]);
        AppState::new(counties, store, Some(artifact), &config, day("2022-01-08"))
    }

    #[test]
    fn starts_on_default_state_with_nothing_plotted() {
        let s = state();
        assert_eq!(s.chosen_state, "District of Columbia");
        assert_eq!(s.chosen_county, "District of Columbia");
        assert!(s.selection.is_empty());
        assert_eq!(s.chart, Err(ChartError::NoData));
        assert!(s.status_message.is_none());
    }

    #[test]
    fn add_clear_lifecycle() {
        let mut s = state();
        s.choose_state("New York");
        s.add_current();
        s.choose_state("California");
        s.choose_county("Los Angeles");
        s.add_current();
        s.add_current();

        assert_eq!(s.selection.len(), 2);
        // 2022-01-01 ..= 2022-01-07 for two regions.
        assert_eq!(s.series.len(), 14);
        let chart = s.chart.as_ref().unwrap();
        assert_eq!(chart.lines[0].label, "New York City, New York");
        assert_eq!(chart.y_max, 400.0);

        s.clear();
        assert!(s.selection.is_empty());
        assert!(s.series.is_empty());
        assert_eq!(s.chart, Err(ChartError::NoData));
    }

    #[test]
    fn start_date_is_clamped_to_data() {
        let mut s = state();
        s.choose_state("New York");
        s.add_current();

        s.set_start_date(day("2023-05-01"));
        assert_eq!(s.start_date, day("2022-01-07"));
        assert_eq!(s.series.len(), 1);

        s.set_start_date(day("2010-01-01"));
        assert_eq!(s.start_date, day("2019-02-24"));
        assert_eq!(s.series.len(), 19);
    }

    #[test]
    fn chart_warning_lasts_only_while_the_fault_is_plotted() {
        let mut s = state();
        let mut rows: Vec<Observation> = s.store.observations().to_vec();
        rows.push(Observation {
            date: day("2022-01-03"),
            state: "California".into(),
            county: "Alameda".into(),
            case_rate: f64::NAN,
            raw_cases: 0,
        });
        s.store = TimeSeriesStore::from_observations(rows);

        s.choose_state("California");
        s.add_current();
        assert!(matches!(s.chart, Err(ChartError::NonFinite { .. })));
        assert!(s.chart_warning.as_deref().unwrap().contains("Alameda, California"));
        assert!(s.status_message.is_none());

        s.clear();
        assert!(s.chart_warning.is_none());

        s.choose_state("New York");
        s.add_current();
        assert!(s.chart.is_ok());
        assert!(s.chart_warning.is_none());
        assert!(s.status_message.is_none());
    }

    #[test]
    fn switching_state_resets_county() {
        let mut s = state();
        s.choose_state("California");
        assert_eq!(s.chosen_county, "Alameda");
        s.choose_state("Nowhere");
        assert_eq!(s.chosen_county, "");
        s.add_current();
        assert!(s.selection.is_empty());
    }
}
