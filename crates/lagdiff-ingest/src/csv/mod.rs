//! CSV reading utilities.

mod header;
mod reader;

pub use header::{normalize_header};
pub use reader::{CsvTable, read_csv_bytes, read_csv_file};
