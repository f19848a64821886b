//! Inner join of observations with their entity references.

use lagdiff_model::ColumnRoles;
use polars::prelude::{
    DataFrame, IntoLazy, JoinArgs, JoinType, SortMultipleOptions, col,
};
use tracing::debug;

use crate::error::Result;

/// Output row index, assigned in observation order right after the join.
pub const ROW_INDEX_COLUMN: &str = "__row_index";

const OBSERVATION_ORDER: &str = "__observation_order";

/// Join observations to references on the key column.
///
/// Observations without a matching reference are dropped. References are
/// unique per key, so every surviving observation appears exactly once. The
/// result keeps observation order and carries [`ROW_INDEX_COLUMN`] first.
pub fn join_on_key(
    observations: DataFrame,
    references: DataFrame,
    roles: &ColumnRoles,
) -> Result<DataFrame> {
    let (observations, references) = disambiguate_columns(observations, references, roles)?;

    let observations = observations.with_row_index(OBSERVATION_ORDER.into(), None)?;
    let joined = observations
        .lazy()
        .join(
            references.lazy(),
            [col(roles.key.as_str())],
            [col(roles.key.as_str())],
            JoinArgs::new(JoinType::Inner),
        )
        .sort([OBSERVATION_ORDER], SortMultipleOptions::default())
        .collect()?;
    let joined = joined
        .drop(OBSERVATION_ORDER)?
        .with_row_index(ROW_INDEX_COLUMN.into(), None)?;

    debug!(joined_rows = joined.height(), "join complete");
    Ok(joined)
}

/// Rename non-key columns present in both tables.
///
/// Observation date and value columns keep their names so later stages find
/// them; every other clash gets `_x` on the observation side. The reference
/// side always gets `_y`.
fn disambiguate_columns(
    mut observations: DataFrame,
    mut references: DataFrame,
    roles: &ColumnRoles,
) -> Result<(DataFrame, DataFrame)> {
    let shared: Vec<String> = references
        .get_column_names_str()
        .into_iter()
        .filter(|name| *name != roles.key && observations.column(name).is_ok())
        .map(str::to_string)
        .collect();

    for name in shared {
        if name != roles.date && name != roles.value {
            observations.rename(&name, format!("{name}_x").into())?;
        }
        references.rename(&name, format!("{name}_y").into())?;
    }
    Ok((observations, references))
}
