//! Table cleaners.
//!
//! References are deduplicated on the entity key. Observations go through
//! three phases in a fixed order: forward-fill, then date parsing and value
//! coercion, then removal of rows whose value is not a finite number.

use std::collections::HashSet;

use lagdiff_ingest::CsvTable;
use lagdiff_model::{ColumnRoles, ObservationStats, ReferenceStats};
use polars::prelude::{BooleanChunked, Column, DataFrame, NewChunkedArray};
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frame_builder::{float_column, text_column, timestamp_column};
use crate::key::KeyType;
use crate::normalization::{DateParser, coerce_value, to_epoch_millis};

/// Reference table keyed by entity, one row per key.
#[derive(Debug, Clone)]
pub struct CleanedReferences {
    pub frame: DataFrame,
    pub stats: ReferenceStats,
}

/// Observation table with typed date and value columns.
#[derive(Debug, Clone)]
pub struct CleanedObservations {
    pub frame: DataFrame,
    pub stats: ObservationStats,
}

/// Replace every empty cell with the cell above it in the same column.
///
/// Empty cells in the first row stay empty. Returns the number of cells filled.
pub fn forward_fill(table: &mut CsvTable) -> usize {
    let mut last: Vec<Option<String>> = vec![None; table.width()];
    let mut filled = 0;
    for row in &mut table.rows {
        for (cell, previous) in row.iter_mut().zip(last.iter_mut()) {
            if cell.is_empty() {
                if let Some(value) = previous {
                    cell.clone_from(value);
                    filled += 1;
                }
            } else {
                *previous = Some(cell.clone());
            }
        }
    }
    filled
}

/// Deduplicate references on the key column, keeping the last occurrence.
///
/// Rows with a missing key are kept; they never match during the join.
pub fn clean_references(
    table: &CsvTable,
    roles: &ColumnRoles,
    key_type: KeyType,
) -> Result<CleanedReferences> {
    let key_idx = require_column(table, &roles.key, "references")?;

    let mut seen = HashSet::new();
    let mut keep = vec![true; table.height()];
    for (idx, raw) in table.column_values(key_idx).enumerate().rev() {
        if let Some(key) = key_type.canonical(raw) {
            keep[idx] = seen.insert(key);
        }
    }

    let frame = build_text_frame(table, key_idx, key_type)?;
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let frame = frame.filter(&mask)?;

    let stats = ReferenceStats {
        rows_read: table.height(),
        duplicates_dropped: table.height() - frame.height(),
        rows_kept: frame.height(),
    };
    debug!(
        rows_read = stats.rows_read,
        duplicates_dropped = stats.duplicates_dropped,
        "references cleaned"
    );
    Ok(CleanedReferences { frame, stats })
}

/// Fill, type and filter the observation table.
///
/// Unparseable dates become null and the row is kept; unparseable or
/// non-finite values drop the row.
pub fn clean_observations(
    mut table: CsvTable,
    roles: &ColumnRoles,
    key_type: KeyType,
    parser: &DateParser,
) -> Result<CleanedObservations> {
    let key_idx = require_column(&table, &roles.key, "observations")?;
    let date_idx = require_column(&table, &roles.date, "observations")?;
    let value_idx = require_column(&table, &roles.value, "observations")?;
    let rows_read = table.height();

    let cells_filled = forward_fill(&mut table);

    let dates: Vec<Option<i64>> = table
        .column_values(date_idx)
        .map(|raw| parser.parse(raw).map(to_epoch_millis))
        .collect();
    let values: Vec<f64> = table.column_values(value_idx).map(coerce_value).collect();
    let keep: Vec<bool> = values.iter().map(|value| value.is_finite()).collect();
    let unparsed_dates = dates
        .iter()
        .zip(&keep)
        .filter(|(date, kept)| **kept && date.is_none())
        .count();

    let mut columns: Vec<Column> = Vec::with_capacity(table.width());
    for (idx, name) in table.headers.iter().enumerate() {
        let column = if idx == key_idx {
            key_type.column(name, table.column_values(idx))
        } else if idx == date_idx {
            timestamp_column(name, dates.clone())?
        } else if idx == value_idx {
            float_column(name, values.clone())
        } else {
            text_column(name, table.column_values(idx))
        };
        columns.push(column);
    }
    let frame = DataFrame::new(columns)?;
    let mask = BooleanChunked::from_slice("valid_value".into(), &keep);
    let frame = frame.filter(&mask)?;

    let stats = ObservationStats {
        rows_read,
        cells_filled,
        unparsed_dates,
        invalid_values_dropped: rows_read - frame.height(),
        rows_kept: frame.height(),
    };
    debug!(
        rows_read = stats.rows_read,
        cells_filled = stats.cells_filled,
        unparsed_dates = stats.unparsed_dates,
        invalid_values_dropped = stats.invalid_values_dropped,
        "observations cleaned"
    );
    Ok(CleanedObservations { frame, stats })
}

fn require_column(table: &CsvTable, name: &str, role: &'static str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| TransformError::MissingColumn {
            column: name.to_string(),
            table: role,
        })
}

fn build_text_frame(table: &CsvTable, key_idx: usize, key_type: KeyType) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == key_idx {
                key_type.column(name, table.column_values(idx))
            } else {
                text_column(name, table.column_values(idx))
            }
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}
