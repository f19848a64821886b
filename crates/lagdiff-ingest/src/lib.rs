//! Raw table ingestion for lagdiff.
//!
//! Reads comma-separated byte streams into [`CsvTable`], a plain string table
//! with a normalized header row. Cleaning rules live in `lagdiff-transform`;
//! this crate only fails on input that has no usable table structure.
//!
//! ```ignore
//! use lagdiff_ingest::read_csv_bytes;
//!
//! let table = read_csv_bytes(b"id,name\n1,A\n", "references")?;
//! assert_eq!(table.headers, vec!["id", "name"]);
//! ```

mod csv;
mod error;

pub use crate::csv::{CsvTable, normalize_header, read_csv_bytes, read_csv_file};
pub use error::{IngestError, Result};
