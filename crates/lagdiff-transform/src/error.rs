//! Error types for the transformation pipeline.

use lagdiff_ingest::IngestError;
use lagdiff_model::LagParseError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures that abort a pipeline run.
///
/// Row-level defects never surface here; they are repaired by the cleaners.
#[derive(Debug, Error)]
pub enum TransformError {
    /// An input table could not be read at all.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A column the pipeline depends on is absent from a table.
    #[error("required column '{column}' not found in {table}")]
    MissingColumn { column: String, table: &'static str },

    /// A range bound is not a recognizable date.
    #[error("could not parse {bound} date '{value}'")]
    InvalidDateBound { bound: &'static str, value: String },

    /// Lag rejected in strict mode.
    #[error(transparent)]
    InvalidLag(#[from] LagParseError),

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, TransformError>;
