//! CSV reading into a plain string table.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{IngestError, Result};

use super::header::{disambiguate_headers, normalize_header};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A table of string cells, kept as read, under a normalized header row.
///
/// Every row has exactly `headers.len()` cells. An empty cell is missing;
/// a whitespace-only cell is text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Cell values of one column, top to bottom.
    pub fn column_values(
        &self,
        idx: usize,
    ) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).map_or("", String::as_str))
    }
}

/// Read a CSV file from disk.
pub fn read_csv_file(path: &Path) -> Result<CsvTable> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    read_csv_bytes(&bytes, &path.display().to_string())
}

/// Read CSV bytes. The first non-blank record is the header row.
///
/// `source_name` only labels errors and log events.
pub fn read_csv_bytes(bytes: &[u8], source_name: &str) -> Result<CsvTable> {
    let bytes = check_encoding(bytes, source_name)?;

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let Some(width) = headers.as_ref().map(Vec::len) else {
            let raw: Vec<String> = record.iter().map(normalize_header).collect();
            headers = Some(disambiguate_headers(&raw));
            continue;
        };
        if record.iter().skip(width).any(|value| !value.trim().is_empty()) {
            warn!(
                source = source_name,
                line = record.position().map_or(0, ::csv::Position::line),
                expected = width,
                found = record.len(),
                "discarding cells beyond header width"
            );
        }
        let mut row = Vec::with_capacity(width);
        for idx in 0..width {
            row.push(record.get(idx).unwrap_or_default().to_string());
        }
        rows.push(row);
    }

    let Some(headers) = headers else {
        return Err(IngestError::NoHeader {
            source_name: source_name.to_string(),
        });
    };
    debug!(
        source = source_name,
        columns = headers.len(),
        rows = rows.len(),
        "read csv table"
    );
    Ok(CsvTable { headers, rows })
}

/// Reject UTF-16 input and strip a UTF-8 byte order mark.
fn check_encoding<'a>(bytes: &'a [u8], source_name: &str) -> Result<&'a [u8]> {
    if bytes.len() >= 2 {
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                source_name: source_name.to_string(),
                encoding: "UTF-16 LE",
            });
        }
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                source_name: source_name.to_string(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_is_stripped() {
        let table = read_csv_bytes(b"\xEF\xBB\xBFid,name\n1,A\n", "bom.csv").expect("read csv");
        assert_eq!(table.headers, vec!["id", "name"]);
    }

    #[test]
    fn utf16_is_rejected() {
        let err = read_csv_bytes(&[0xFF, 0xFE, b'i', 0, b'd', 0], "utf16.csv").unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            }
        ));
    }

    #[test]
    fn column_values_reads_down_a_column() {
        let table = read_csv_bytes(b"id,value\n1,10\n2,\n", "t.csv").expect("read csv");
        let values: Vec<&str> = table.column_values(1).collect();
        assert_eq!(values, vec!["10", ""]);
        assert_eq!(table.column_index("value"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }
}
