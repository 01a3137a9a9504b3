use std::path::PathBuf;

use thiserror::Error;

/// The season file could not be turned into a table. Fatal for the
/// invocation that hit it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("parquet error in {path}: {source}")]
    Parquet {
        path: PathBuf,
        source: parquet::errors::ParquetError,
    },

    #[error("arrow error in {path}: {source}")]
    Arrow {
        path: PathBuf,
        source: arrow::error::ArrowError,
    },

    #[error("malformed data in {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{path} is missing expected column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

/// An aggregation or ranking was configured with something it cannot run.
/// Raised before any row is looked at.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown statistic '{0}', expected 'mean' or 'sum'")]
    UnknownStatistic(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("scale factor must be finite, got {0}")]
    InvalidScale(f64),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
