use chrono::NaiveDate;

use super::model::{Observation, Region, TimeSeriesStore};
use super::selection::SelectionSet;

// ---------------------------------------------------------------------------
// DateWindow – closed date interval
// ---------------------------------------------------------------------------

/// Closed interval `[start, end]`.  A window with `start > end` contains no
/// dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

// ---------------------------------------------------------------------------
// FilteredSeries – selection × window view of the store
// ---------------------------------------------------------------------------

/// One output row: an observation, its region and the label of the line it
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub region: Region,
    pub label: String,
    pub observation: Observation,
}

/// Contiguous rows of one region.
#[derive(Debug, Clone, Copy)]
pub struct SeriesGroup<'a> {
    pub label: &'a str,
    pub rows: &'a [SeriesRow],
}

/// Rows grouped by selection order, chronological within each region.
///
/// Rebuilt from scratch on every interaction; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSeries {
    rows: Vec<SeriesRow>,
}

/// Restrict `store` to the selected regions and the date window.
///
/// Regions without observations in the window contribute no rows; an empty
/// selection or an inverted window yields an empty series.
pub fn filter_series(
    store: &TimeSeriesStore,
    selection: &SelectionSet,
    window: DateWindow,
) -> FilteredSeries {
    if window.is_empty() {
        return FilteredSeries::default();
    }

    let mut rows = Vec::new();
    for region in selection.all() {
        let label = region.label();
        rows.extend(
            store
                .region_series(region)
                .filter(|obs| window.contains(obs.date))
                .map(|obs| SeriesRow {
                    region: region.clone(),
                    label: label.clone(),
                    observation: obs.clone(),
                }),
        );
    }
    FilteredSeries { rows }
}

impl FilteredSeries {
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows split into one group per selected region, in selection order.
    pub fn groups(&self) -> Vec<SeriesGroup<'_>> {
        let mut groups = Vec::new();
        let mut start = 0;
        for i in 1..=self.rows.len() {
            if i == self.rows.len() || self.rows[i].region != self.rows[start].region {
                groups.push(SeriesGroup {
                    label: &self.rows[start].label,
                    rows: &self.rows[start..i],
                });
                start = i;
            }
        }
        groups
    }

    /// Highest case rate in the series.
    pub fn max_case_rate(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|r| r.observation.case_rate)
            .max_by(f64::total_cmp)
    }

    /// Most recent date present in the series.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.observation.date).max()
    }

    /// Rows at [`latest_date`](Self::latest_date), highest case rate first.
    pub fn latest_snapshot(&self) -> Vec<&SeriesRow> {
        let Some(latest) = self.latest_date() else {
            return Vec::new();
        };
        let mut snapshot: Vec<&SeriesRow> = self
            .rows
            .iter()
            .filter(|r| r.observation.date == latest)
            .collect();
        snapshot.sort_by(|a, b| b.observation.case_rate.total_cmp(&a.observation.case_rate));
        snapshot
    }
}
