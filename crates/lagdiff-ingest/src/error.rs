//! Error types for table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make an input table unreadable.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input file does not exist.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input file exists but could not be read.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Byte order mark of an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {source_name}")]
    UnsupportedEncoding {
        source_name: String,
        encoding: &'static str,
    },

    /// The CSV reader rejected a record (including invalid UTF-8).
    #[error("failed to parse CSV {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },

    /// No header row could be found.
    #[error("no header row in {source_name}")]
    NoHeader { source_name: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/daily.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/daily.csv");

        let err = IngestError::NoHeader {
            source_name: "companies.csv".to_string(),
        };
        assert_eq!(err.to_string(), "no header row in companies.csv");
    }
}
