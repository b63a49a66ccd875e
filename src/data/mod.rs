/// Data layer: core types, loading, selection and filtering.
///
/// Architecture:
/// ```text
///  state_counties.json        data/*-through-YYYY-MM-DD.parquet
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                ┌──────────────┐
///   │ counties │                │   artifact   │  newest dated file, bounded lookback
///   └──────────┘                └──────────────┘
///        │                              │
///        │                              ▼
///        │                      ┌──────────────┐
///        │                      │    loader    │  parquet / csv → TimeSeriesStore
///        │                      └──────────────┘
///        ▼                              │
///   ┌───────────┐                       ▼
///   │ selection │ ─────────────▶ ┌──────────┐
///   └───────────┘                │  filter  │  selection × window → FilteredSeries
///                                └──────────┘
///                                      │
///                                      ▼
///                                ┌──────────┐
///                                │  chart   │  FilteredSeries → plot lines
///                                └──────────┘
/// ```
///
/// `ingest` sits outside this flow: it produces the dated artifacts.

pub mod artifact;
pub mod chart;
pub mod counties;
pub mod filter;
pub mod ingest;
pub mod loader;
pub mod model;
pub mod selection;
