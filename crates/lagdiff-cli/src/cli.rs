//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lagdiff",
    version,
    about = "Join observations with reference data and compute per-entity lag differences",
    long_about = "Join an observations CSV with a references CSV on an entity key, keep\n\
                  the rows inside a date range, and add the difference between each\n\
                  value and the value n rows earlier for the same entity."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v info, -vv debug, -vvv trace, -q errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machines).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow input values (dates, lag) to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the join, range filter and lag difference over two CSV files.
    Transform(TransformArgs),

    /// List the date formats accepted for dates and range bounds.
    DateFormats,
}

#[derive(Parser)]
pub struct TransformArgs {
    /// Observations CSV (key, date and value columns plus any others).
    #[arg(long, value_name = "CSV")]
    pub observations: PathBuf,

    /// References CSV keyed by entity.
    #[arg(long, value_name = "CSV")]
    pub references: PathBuf,

    /// First date to keep (inclusive).
    #[arg(long = "start-date", value_name = "DATE", allow_hyphen_values = true)]
    pub start_date: String,

    /// Last date to keep (inclusive).
    #[arg(long = "end-date", value_name = "DATE", allow_hyphen_values = true)]
    pub end_date: String,

    /// Lag in rows. Anything other than a positive integer counts as 1
    /// unless --strict is set.
    #[arg(long = "n", value_name = "N", allow_hyphen_values = true)]
    pub n: String,

    /// Output CSV path, or `-` for stdout.
    #[arg(long, short = 'o', value_name = "PATH", default_value = "transformed.csv")]
    pub output: PathBuf,

    #[arg(long = "key-column", value_name = "NAME", default_value = "id")]
    pub key_column: String,

    #[arg(long = "date-column", value_name = "NAME", default_value = "date")]
    pub date_column: String,

    #[arg(long = "value-column", value_name = "NAME", default_value = "value")]
    pub value_column: String,

    /// Read ambiguous numeric dates such as 01/02/2024 as day first.
    #[arg(long = "day-first")]
    pub day_first: bool,

    /// Reject a lag that is not a positive integer.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Write per-stage counts as JSON to this path.
    #[arg(long = "report", value_name = "JSON")]
    pub report: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
