//! Per-stage counts for a pipeline run.

use serde::{Deserialize, Serialize};

/// Counts from cleaning the reference table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceStats {
    pub rows_read: usize,
    pub duplicates_dropped: usize,
    pub rows_kept: usize,
}

/// Counts from cleaning the observation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationStats {
    pub rows_read: usize,
    pub cells_filled: usize,
    pub unparsed_dates: usize,
    pub invalid_values_dropped: usize,
    pub rows_kept: usize,
}

/// Counts from the join, filter and lag stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub joined_rows: usize,
    pub rows_in_range: usize,
    pub entity_groups: usize,
    pub differences: usize,
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub references: ReferenceStats,
    pub observations: ObservationStats,
    pub merged: JoinStats,
    /// Effective lag after clamping.
    pub lag: usize,
    /// Normalized range bounds as written to logs.
    pub start: String,
    pub end: String,
}

impl PipelineReport {
    /// Number of rows in the output table.
    pub fn output_rows(&self) -> usize {
        self.merged.rows_in_range
    }

    /// Rows lost between cleaning and the join.
    pub fn unmatched_observations(&self) -> usize {
        self.observations
            .rows_kept
            .saturating_sub(self.merged.joined_rows)
    }
}
