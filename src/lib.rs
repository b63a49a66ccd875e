//! Data layer for the COVID case-rate dashboard and its ingestion job.
//!
//! The egui front-end (`src/main.rs`) and the `covid-ingest` binary both
//! build on the modules exported here.

pub mod data;
pub mod error;

pub use error::{DataError, Result};
