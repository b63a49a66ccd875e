use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Region – (state, county) key
// ---------------------------------------------------------------------------

/// A (state, county) pair.  Used as a reference-data key and as a selection
/// key; equality is exact string match on both fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Region {
    pub state: String,
    pub county: String,
}

impl Region {
    pub fn new(state: impl Into<String>, county: impl Into<String>) -> Self {
        Region {
            state: state.into(),
            county: county.into(),
        }
    }

    /// Human-readable "county, state" label used for chart lines and tables.
    pub fn label(&self) -> String {
        format!("{}, {}", self.county, self.state)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.county, self.state)
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the artifact
// ---------------------------------------------------------------------------

/// One day of data for one county.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub state: String,
    pub county: String,
    /// New cases per 100k population, 7-day rolling average.
    pub case_rate: f64,
    /// New cases reported that day.
    pub raw_cases: i64,
}

impl Observation {
    pub fn region(&self) -> Region {
        Region::new(&self.state, &self.county)
    }
}

// ---------------------------------------------------------------------------
// TimeSeriesStore – the complete loaded table
// ---------------------------------------------------------------------------

/// All observations of one artifact plus a per-region index.
///
/// Built once per session and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesStore {
    observations: Vec<Observation>,
    /// Region → row indices, sorted by date.
    by_region: BTreeMap<Region, Vec<usize>>,
}

impl TimeSeriesStore {
    /// Build the region index from loaded observations.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut by_region: BTreeMap<Region, Vec<usize>> = BTreeMap::new();
        for (i, obs) in observations.iter().enumerate() {
            by_region.entry(obs.region()).or_default().push(i);
        }
        for rows in by_region.values_mut() {
            rows.sort_by_key(|&i| observations[i].date);
        }
        TimeSeriesStore {
            observations,
            by_region,
        }
    }

    /// Observations for `region`, oldest first.
    pub fn region_series<'a>(
        &'a self,
        region: &Region,
    ) -> impl Iterator<Item = &'a Observation> + 'a {
        self.by_region
            .get(region)
            .into_iter()
            .flatten()
            .map(move |&i| &self.observations[i])
    }

    /// Every observation in load order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of distinct regions with at least one observation.
    pub fn region_count(&self) -> usize {
        self.by_region.len()
    }

    /// Whether any observation exists for `region`.
    pub fn contains_region(&self, region: &Region) -> bool {
        self.by_region.contains_key(region)
    }

    /// Oldest and newest date present.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.iter().map(|o| o.date).min()?;
        let last = self.observations.iter().map(|o| o.date).max()?;
        Some((first, last))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
