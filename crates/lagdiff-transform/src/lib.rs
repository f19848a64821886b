//! Transformation pipeline for lagdiff.
//!
//! - **normalization**: tolerant date parsing and numeric coercion
//! - **key**: entity key typing shared by both tables
//! - **clean**: reference and observation table cleaners
//! - **join**: inner join on the entity key
//! - **window**: (key, date) ordering, date range filter, lag differences
//! - **pipeline**: the fixed composition of all stages
//! - **output**: comma-separated serialization of the result

pub mod clean;
pub mod error;
pub mod frame_builder;
pub mod join;
pub mod key;
pub mod normalization;
pub mod output;
pub mod pipeline;
pub mod window;

pub use clean::{
    CleanedObservations, CleanedReferences, clean_observations, clean_references, forward_fill,
};
pub use error::{Result, TransformError};
pub use join::{ROW_INDEX_COLUMN, join_on_key};
pub use key::KeyType;
pub use normalization::{DateParser, coerce_value, format_float, parse_value};
pub use output::{to_csv_string, write_csv};
pub use pipeline::{PipelineOutput, PipelineRequest, run_pipeline, run_to_writer};
pub use window::{compute_lag_difference, filter_date_range, sort_by_key_and_date};
