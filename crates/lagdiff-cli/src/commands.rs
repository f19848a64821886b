use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Table;
use tracing::{debug, info, info_span};

use lagdiff_cli::logging::redact_value;
use lagdiff_cli::output::{OutputTarget, write_atomically};
use lagdiff_model::{ColumnRoles, DateOrder, PipelineOptions, PipelineReport, StrictnessMode};
use lagdiff_transform::normalization::SUPPORTED_FORMATS;
use lagdiff_transform::{DateParser, PipelineRequest, run_to_writer};

use crate::cli::TransformArgs;
use crate::summary::apply_table_style;

/// What a completed transform produced.
pub struct TransformOutcome {
    pub report: PipelineReport,
    pub output: OutputTarget,
    pub report_path: Option<PathBuf>,
}

pub fn run_transform(args: &TransformArgs) -> Result<TransformOutcome> {
    let span = info_span!(
        "transform",
        observations = %args.observations.display(),
        references = %args.references.display()
    );
    let _guard = span.enter();

    let observations = read_input(&args.observations)?;
    let references = read_input(&args.references)?;
    let options = pipeline_options(args);
    debug!(
        start_date = redact_value(&args.start_date),
        end_date = redact_value(&args.end_date),
        lag = redact_value(&args.n),
        "pipeline parameters"
    );

    let request = PipelineRequest {
        observations: &observations,
        references: &references,
        start_date: &args.start_date,
        end_date: &args.end_date,
        lag: &args.n,
        reference_time: Local::now().naive_local(),
    };
    let output = OutputTarget::from_arg(&args.output);
    let report = output
        .write_with(|writer| Ok(run_to_writer(&request, &options, writer)?))
        .with_context(|| format!("transform into {output}"))?;

    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    info!(
        output_rows = report.output_rows(),
        output = %output,
        "transform complete"
    );
    Ok(TransformOutcome {
        report,
        output,
        report_path: args.report.clone(),
    })
}

pub fn run_date_formats() -> Result<()> {
    let parser = DateParser::new(DateOrder::default(), Local::now().naive_local());
    let mut table = Table::new();
    table.set_header(vec!["Form", "Example", "Parses as"]);
    apply_table_style(&mut table);
    for (label, example) in SUPPORTED_FORMATS {
        let parsed = parser
            .parse(example)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![label.to_string(), example.to_string(), parsed]);
    }
    println!("{table}");
    println!("Ambiguous numeric dates are month first unless --day-first is given.");
    Ok(())
}

fn pipeline_options(args: &TransformArgs) -> PipelineOptions {
    let columns = ColumnRoles {
        key: args.key_column.clone(),
        date: args.date_column.clone(),
        value: args.value_column.clone(),
        ..ColumnRoles::default()
    };
    let date_order = if args.day_first {
        DateOrder::DayFirst
    } else {
        DateOrder::MonthFirst
    };
    let strictness = if args.strict {
        StrictnessMode::Strict
    } else {
        StrictnessMode::Lenient
    };
    PipelineOptions::new()
        .with_columns(columns)
        .with_date_order(date_order)
        .with_strictness(strictness)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn write_report(path: &Path, report: &PipelineReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    write_atomically(path, |writer| {
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    })
    .with_context(|| format!("write report {}", path.display()))
}
