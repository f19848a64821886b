//! DataFrame construction from cleaned string cells.

use polars::prelude::{Column, DataType, IntoColumn, NamedFrom, PolarsResult, Series, TimeUnit};

/// Physical type of timestamp columns.
pub const TIMESTAMP_DTYPE: DataType = DataType::Datetime(TimeUnit::Milliseconds, None);

/// Nullable string column; empty cells become null.
pub fn text_column<'a>(name: &str, values: impl Iterator<Item = &'a str>) -> Column {
    let values: Vec<Option<String>> = values
        .map(|value| (!value.is_empty()).then(|| value.to_string()))
        .collect();
    Series::new(name.into(), values).into_column()
}

/// Nullable integer column.
pub fn integer_column(name: &str, values: Vec<Option<i64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Float column.
pub fn float_column(name: &str, values: Vec<f64>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Timestamp column from epoch milliseconds.
pub fn timestamp_column(name: &str, millis: Vec<Option<i64>>) -> PolarsResult<Column> {
    let series = Series::new(name.into(), millis).cast(&TIMESTAMP_DTYPE)?;
    Ok(series.into_column())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_column_nulls_empty_cells() {
        let column = text_column("name", ["A", "", "C"].into_iter());
        assert_eq!(column.null_count(), 1);
        let values = column.str().expect("string column");
        assert_eq!(values.get(0), Some("A"));
        assert_eq!(values.get(1), None);
    }

    #[test]
    fn timestamp_column_has_datetime_dtype() {
        let column = timestamp_column("date", vec![Some(0), None]).expect("cast");
        assert_eq!(column.dtype(), &TIMESTAMP_DTYPE);
        assert_eq!(column.null_count(), 1);
    }
}
