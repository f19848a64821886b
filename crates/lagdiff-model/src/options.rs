//! Configuration options for a pipeline run.

use serde::{Deserialize, Serialize};

/// How parameter defects are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrictnessMode {
    /// Reject a lag that is not a positive integer.
    Strict,
    /// Resolve parameter defects silently (a bad lag becomes 1).
    #[default]
    Lenient,
}

/// Field order used for ambiguous all-numeric dates such as `01/02/2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateOrder {
    /// `01/02/2024` is January 2nd.
    #[default]
    MonthFirst,
    /// `01/02/2024` is February 1st.
    DayFirst,
}

/// Names of the columns that carry meaning for the pipeline.
///
/// Every other column is carried through as an opaque attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    /// Entity key shared by both tables.
    pub key: String,
    /// Observation timestamp column.
    pub date: String,
    /// Observation numeric value column.
    pub value: String,
    /// Name of the derived lag-difference column.
    pub difference: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            key: "id".to_string(),
            date: "date".to_string(),
            value: "value".to_string(),
            difference: "difference".to_string(),
        }
    }
}

/// Options controlling a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub columns: ColumnRoles,
    pub date_order: DateOrder,
    pub strictness: StrictnessMode,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with strict parameter handling.
    pub fn strict() -> Self {
        Self {
            strictness: StrictnessMode::Strict,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnRoles) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    #[must_use]
    pub fn with_strictness(mut self, strictness: StrictnessMode) -> Self {
        self.strictness = strictness;
        self
    }
}
