//! Comma-separated serialization of the result table.

use std::io::Write;

use polars::prelude::{Column, DataFrame, DataType};

use crate::error::Result;
use crate::join::ROW_INDEX_COLUMN;
use crate::normalization::{format_float, format_timestamps, from_epoch_millis};

/// Write the frame as CSV with a header row.
///
/// The row index column is written with an empty header name. Nulls are
/// written as empty cells.
pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let headers: Vec<&str> = df
        .get_column_names_str()
        .into_iter()
        .map(|name| if name == ROW_INDEX_COLUMN { "" } else { name })
        .collect();
    let cells: Vec<Vec<String>> = df
        .get_columns()
        .iter()
        .map(render_column)
        .collect::<Result<_>>()?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&headers)?;
    for row in 0..df.height() {
        csv_writer.write_record(cells.iter().map(|column| column[row].as_str()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serialize the frame to an in-memory CSV string.
pub fn to_csv_string(df: &DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(df, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn render_column(column: &Column) -> Result<Vec<String>> {
    match column.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let cast = column.cast(&DataType::Float64)?;
            Ok(cast
                .f64()?
                .into_iter()
                .map(|value| value.map(format_float).unwrap_or_default())
                .collect())
        }
        DataType::Datetime(_, _) => {
            let cast = column.cast(&DataType::Int64)?;
            let timestamps: Vec<_> = cast
                .i64()?
                .into_iter()
                .map(|millis| millis.and_then(from_epoch_millis))
                .collect();
            Ok(format_timestamps(&timestamps))
        }
        _ => {
            let cast = column.cast(&DataType::String)?;
            Ok(cast
                .str()?
                .into_iter()
                .map(|value| value.unwrap_or_default().to_string())
                .collect())
        }
    }
}
