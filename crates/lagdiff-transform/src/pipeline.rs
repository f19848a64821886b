//! The fixed pipeline: clean, join, sort, range-filter, lag, serialize.

use std::io::Write;
use std::time::Instant;

use chrono::NaiveDateTime;
use lagdiff_ingest::{CsvTable, read_csv_bytes};
use lagdiff_model::{ColumnRoles, JoinStats, LagWindow, PipelineOptions, PipelineReport};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use crate::clean::{clean_observations, clean_references};
use crate::error::{Result, TransformError};
use crate::join::join_on_key;
use crate::key::KeyType;
use crate::normalization::DateParser;
use crate::output::write_csv;
use crate::window::{compute_lag_difference, filter_date_range, sort_by_key_and_date};

const BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw inputs of one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineRequest<'a> {
    pub observations: &'a [u8],
    pub references: &'a [u8],
    pub start_date: &'a str,
    pub end_date: &'a str,
    /// Lag as supplied by the caller, parsed per the strictness mode.
    pub lag: &'a str,
    /// Instant that relative dates such as `yesterday` resolve against.
    pub reference_time: NaiveDateTime,
}

/// Result table plus per-stage counts.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub frame: DataFrame,
    pub report: PipelineReport,
}

/// Run every stage and return the final table.
///
/// Only structural problems fail: unreadable tables, missing role columns,
/// unparseable range bounds, and in strict mode a bad lag. Row-level defects
/// are repaired or dropped.
pub fn run_pipeline(
    request: &PipelineRequest<'_>,
    options: &PipelineOptions,
) -> Result<PipelineOutput> {
    let roles = &options.columns;
    let lag = LagWindow::parse(request.lag, options.strictness)?;
    let parser = DateParser::new(options.date_order, request.reference_time);
    let start = parse_bound(&parser, "start", request.start_date)?;
    let end = parse_bound(&parser, "end", request.end_date)?;
    info!(lag = lag.get(), "pipeline started");

    let (observations, references) = info_span!("read").in_scope(|| -> Result<_> {
        let observations = read_csv_bytes(request.observations, "observations")?;
        let references = read_csv_bytes(request.references, "references")?;
        debug!(
            observation_rows = observations.height(),
            reference_rows = references.height(),
            "inputs read"
        );
        Ok((observations, references))
    })?;

    let key_type = infer_key_type(&observations, &references, &roles.key);
    let (observations, references) = info_span!("clean").in_scope(|| -> Result<_> {
        let references = clean_references(&references, roles, key_type)?;
        let observations = clean_observations(observations, roles, key_type, &parser)?;
        Ok((observations, references))
    })?;

    let (frame, merged_stats) = info_span!("merge").in_scope(|| -> Result<_> {
        let started = Instant::now();
        let joined = join_on_key(observations.frame, references.frame, roles)?;
        let joined_rows = joined.height();
        let sorted = sort_by_key_and_date(joined, roles)?;
        let filtered = filter_date_range(sorted, roles, start, end)?;
        let rows_in_range = filtered.height();
        let frame = compute_lag_difference(filtered, roles, lag)?;
        let stats = join_stats(&frame, roles, joined_rows, rows_in_range)?;
        debug!(
            joined_rows,
            rows_in_range,
            duration_ms = started.elapsed().as_millis(),
            "merge complete"
        );
        Ok((frame, stats))
    })?;

    let report = PipelineReport {
        references: references.stats,
        observations: observations.stats,
        merged: merged_stats,
        lag: lag.get(),
        start: start.format(BOUND_FORMAT).to_string(),
        end: end.format(BOUND_FORMAT).to_string(),
    };
    info!(
        output_rows = report.output_rows(),
        unmatched_observations = report.unmatched_observations(),
        "pipeline complete"
    );
    Ok(PipelineOutput { frame, report })
}

/// Run the pipeline and write the result table as CSV.
pub fn run_to_writer<W: Write>(
    request: &PipelineRequest<'_>,
    options: &PipelineOptions,
    writer: W,
) -> Result<PipelineReport> {
    let output = run_pipeline(request, options)?;
    info_span!("write").in_scope(|| write_csv(&output.frame, writer))?;
    Ok(output.report)
}

fn parse_bound(parser: &DateParser, bound: &'static str, value: &str) -> Result<NaiveDateTime> {
    parser
        .parse(value)
        .ok_or_else(|| TransformError::InvalidDateBound {
            bound,
            value: value.to_string(),
        })
}

/// Key type agreed by both tables, so that the join compares like with like.
fn infer_key_type(observations: &CsvTable, references: &CsvTable, key: &str) -> KeyType {
    let observed = key_values(observations, key).chain(key_values(references, key));
    KeyType::infer(observed)
}

fn key_values<'a>(table: &'a CsvTable, key: &str) -> impl Iterator<Item = &'a str> + 'a {
    table
        .column_index(key)
        .into_iter()
        .flat_map(move |idx| table.column_values(idx))
}

fn join_stats(
    frame: &DataFrame,
    roles: &ColumnRoles,
    joined_rows: usize,
    rows_in_range: usize,
) -> Result<JoinStats> {
    let entity_groups = if frame.height() == 0 {
        0
    } else {
        frame.column(&roles.key)?.n_unique()?
    };
    let differences = frame.height() - frame.column(&roles.difference)?.null_count();
    Ok(JoinStats {
        joined_rows,
        rows_in_range,
        entity_groups,
        differences,
    })
}
