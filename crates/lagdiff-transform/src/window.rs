//! Ordering, range filtering and per-entity lag differences.

use chrono::NaiveDateTime;
use lagdiff_model::{ColumnRoles, LagWindow};
use polars::prelude::{DataFrame, DataType, IntoLazy, SortMultipleOptions, col, lit};

use crate::error::Result;
use crate::join::ROW_INDEX_COLUMN;
use crate::normalization::to_epoch_millis;

/// Sort by key then date, ascending. Ties keep row-index order.
pub fn sort_by_key_and_date(df: DataFrame, roles: &ColumnRoles) -> Result<DataFrame> {
    let by = [roles.key.as_str(), roles.date.as_str(), ROW_INDEX_COLUMN];
    let sorted = df
        .lazy()
        .sort(
            by,
            SortMultipleOptions::default()
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()?;
    Ok(sorted)
}

/// Keep rows with `start <= date <= end`. Null dates never match.
pub fn filter_date_range(
    df: DataFrame,
    roles: &ColumnRoles,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<DataFrame> {
    let millis = col(roles.date.as_str()).cast(DataType::Int64);
    let in_range = millis
        .clone()
        .gt_eq(lit(to_epoch_millis(start)))
        .and(millis.lt_eq(lit(to_epoch_millis(end))));
    Ok(df.lazy().filter(in_range).collect()?)
}

/// Add the difference column: `value[i] - value[i - n]` within each key.
///
/// Expects rows already ordered by key and date. The first `n` rows of every
/// key get null.
pub fn compute_lag_difference(
    df: DataFrame,
    roles: &ColumnRoles,
    lag: LagWindow,
) -> Result<DataFrame> {
    // A shift past the frame height is all-null either way.
    let periods = i64::try_from(lag.get().min(df.height().max(1))).unwrap_or(i64::MAX);
    let value = col(roles.value.as_str());
    let difference = (value.clone() - value.shift(lit(periods)))
        .over([col(roles.key.as_str())])
        .alias(roles.difference.as_str());
    Ok(df.lazy().with_column(difference).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_builder::timestamp_column;
    use chrono::NaiveDate;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn millis(day: u32) -> Option<i64> {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(to_epoch_millis)
    }

    fn merged(ids: &[i64], days: &[u32], values: &[f64]) -> DataFrame {
        let dates: Vec<Option<i64>> = days.iter().map(|day| millis(*day)).collect();
        let df = DataFrame::new(vec![
            Series::new("id".into(), ids).into_column(),
            timestamp_column("date", dates).expect("dates"),
            Series::new("value".into(), values).into_column(),
        ])
        .expect("frame");
        df.with_row_index(ROW_INDEX_COLUMN.into(), None)
            .expect("row index")
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .expect("column")
            .f64()
            .expect("f64")
            .into_iter()
            .collect()
    }

    #[test]
    fn sorts_by_key_then_date() {
        let df = merged(&[2, 1, 1], &[1, 3, 2], &[1.0, 2.0, 3.0]);
        let sorted = sort_by_key_and_date(df, &ColumnRoles::default()).expect("sort");
        assert_eq!(floats(&sorted, "value"), vec![Some(3.0), Some(2.0), Some(1.0)]);
    }

    #[test]
    fn range_is_inclusive() {
        let df = merged(&[1, 1, 1, 1], &[1, 2, 3, 4], &[1.0, 2.0, 3.0, 4.0]);
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("start");
        let end = NaiveDate::from_ymd_opt(2024, 1, 3)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("end");
        let filtered =
            filter_date_range(df, &ColumnRoles::default(), start, end).expect("filter");
        assert_eq!(floats(&filtered, "value"), vec![Some(2.0), Some(3.0)]);
    }

    #[test]
    fn lag_restarts_per_key() {
        let df = merged(&[1, 1, 1, 2, 2], &[1, 2, 3, 1, 2], &[10.0, 15.0, 20.0, 1.0, 4.0]);
        let out = compute_lag_difference(df, &ColumnRoles::default(), LagWindow::ONE)
            .expect("lag");
        assert_eq!(
            floats(&out, "difference"),
            vec![None, Some(5.0), Some(5.0), None, Some(3.0)]
        );
    }

    #[test]
    fn lag_longer_than_group_is_all_null() {
        let df = merged(&[1, 1], &[1, 2], &[1.0, 2.0]);
        let out = compute_lag_difference(df, &ColumnRoles::default(), LagWindow::new(5))
            .expect("lag");
        assert_eq!(floats(&out, "difference"), vec![None, None]);
    }
}
