//! Shared types for the lagdiff workspace.
//!
//! - **options**: pipeline configuration (column roles, date order, strictness)
//! - **lag**: the lag window `n` and its lenient/strict parsing rules
//! - **report**: per-stage counts produced by a pipeline run

pub mod lag;
pub mod options;
pub mod report;

pub use lag::{LagParseError, LagWindow};
pub use options::{ColumnRoles, DateOrder, PipelineOptions, StrictnessMode};
pub use report::{JoinStats, ObservationStats, PipelineReport, ReferenceStats};
