use std::path::PathBuf;

use thiserror::Error;

/// Result alias for the data layer.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised while loading reference data, artifacts or CSV extracts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Reference data must be an object of state → [county], {0}")]
    BadReference(String),

    #[error("Missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("Column '{column}' has unsupported type {found}")]
    ColumnType { column: &'static str, found: String },

    #[error("Row {row}: cannot parse date '{value}'")]
    BadDate { row: usize, value: String },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("No rows to write")]
    EmptyExtract,
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}
