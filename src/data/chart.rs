use chrono::{Days, NaiveDate};
use thiserror::Error;

use super::filter::FilteredSeries;

// ---------------------------------------------------------------------------
// Chart preparation
// ---------------------------------------------------------------------------

/// Why a chart could not be prepared.
///
/// `NoData` is the ordinary "nothing selected / nothing in range" case and is
/// rendered as an empty state; everything else is a data fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("nothing to plot")]
    NoData,

    #[error("non-finite case rate for {label} on {date}")]
    NonFinite { label: String, date: NaiveDate },
}

/// One plotted line: `(x, y)` points with x in days since the Unix epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Everything the plot widget needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub lines: Vec<ChartLine>,
    /// Upper bound of the y axis; the lower bound is always 0.
    pub y_max: f64,
}

/// Turn a filtered series into chart lines, one per selected region.
pub fn prepare_chart(series: &FilteredSeries) -> Result<ChartData, ChartError> {
    if series.is_empty() {
        return Err(ChartError::NoData);
    }

    let mut lines = Vec::new();
    for group in series.groups() {
        let mut points = Vec::with_capacity(group.rows.len());
        for row in group.rows {
            let obs = &row.observation;
            if !obs.case_rate.is_finite() {
                return Err(ChartError::NonFinite {
                    label: row.label.clone(),
                    date: obs.date,
                });
            }
            points.push([date_to_x(obs.date), obs.case_rate]);
        }
        lines.push(ChartLine {
            label: group.label.to_string(),
            points,
        });
    }

    let y_max = y_axis_ceiling(series.max_case_rate().unwrap_or(0.0));
    Ok(ChartData { lines, y_max })
}

/// Round `max` up to the next multiple of 100 (at least 100).
pub fn y_axis_ceiling(max: f64) -> f64 {
    ((max / 100.0).ceil() * 100.0).max(100.0)
}

// -- Date axis --

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Plot x coordinate of `date`.
pub fn date_to_x(date: NaiveDate) -> f64 {
    (date - epoch()).num_days() as f64
}

/// Date at plot x coordinate `x` (rounded to the nearest day).
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    let days = x.round();
    if !days.is_finite() || days < 0.0 {
        return None;
    }
    epoch().checked_add_days(Days::new(days as u64))
}

/// "today", "yesterday", "tomorrow", otherwise e.g. "Apr 02".
pub fn natural_day(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "today".to_string(),
        -1 => "yesterday".to_string(),
        1 => "tomorrow".to_string(),
        _ => date.format("%b %d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_series, DateWindow};
    use crate::data::model::tests::{day, obs};
    use crate::data::model::{Region, TimeSeriesStore};
    use crate::data::selection::SelectionSet;

    fn series(rows: Vec<crate::data::model::Observation>, regions: &[Region]) -> FilteredSeries {
        let store = TimeSeriesStore::from_observations(rows);
        let mut sel = SelectionSet::new();
        for r in regions {
            sel.add(r.clone());
        }
        filter_series(&store, &sel, DateWindow::new(day("2022-01-01"), day("2022-12-31")))
    }

    #[test]
    fn empty_series_is_no_data() {
        assert_eq!(prepare_chart(&FilteredSeries::default()), Err(ChartError::NoData));
    }

    #[test]
    fn one_line_per_region_in_selection_order() {
        let knox = Region::new("Ohio", "Knox");
        let lake = Region::new("Ohio", "Lake");
        let s = series(
            vec![
                obs("2022-01-01", "Ohio", "Knox", 10.0),
                obs("2022-01-02", "Ohio", "Knox", 250.0),
                obs("2022-01-01", "Ohio", "Lake", 30.0),
            ],
            &[lake, knox],
        );
        let chart = prepare_chart(&s).unwrap();
        let labels: Vec<&str> = chart.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Lake, Ohio", "Knox, Ohio"]);
        assert_eq!(chart.lines[1].points.len(), 2);
        assert_eq!(chart.lines[1].points[1][1], 250.0);
        assert_eq!(chart.y_max, 300.0);
    }

    #[test]
    fn nan_rate_is_a_fault_not_empty() {
        let knox = Region::new("Ohio", "Knox");
        let s = series(vec![obs("2022-01-03", "Ohio", "Knox", f64::NAN)], &[knox]);
        assert_eq!(
            prepare_chart(&s),
            Err(ChartError::NonFinite {
                label: "Knox, Ohio".into(),
                date: day("2022-01-03"),
            })
        );
    }

    #[test]
    fn ceiling_rounds_up_to_hundreds() {
        assert_eq!(y_axis_ceiling(0.0), 100.0);
        assert_eq!(y_axis_ceiling(42.0), 100.0);
        assert_eq!(y_axis_ceiling(100.0), 100.0);
        assert_eq!(y_axis_ceiling(100.5), 200.0);
        assert_eq!(y_axis_ceiling(487.01), 500.0);
    }

    #[test]
    fn x_axis_round_trips_dates() {
        let d = day("2022-04-02");
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
        assert_eq!(x_to_date(date_to_x(d) + 0.4), Some(d));
        assert_eq!(x_to_date(-3.0), None);
        assert_eq!(date_to_x(day("1970-01-02")), 1.0);
    }

    #[test]
    fn natural_day_labels() {
        let today = day("2022-04-02");
        assert_eq!(natural_day(today, today), "today");
        assert_eq!(natural_day(day("2022-04-01"), today), "yesterday");
        assert_eq!(natural_day(day("2022-04-03"), today), "tomorrow");
        assert_eq!(natural_day(day("2022-03-20"), today), "Mar 20");
    }
}
