//! Entity key typing.
//!
//! Both tables must agree on the key's type for the join. Keys are integers
//! when every non-missing key in both tables parses as `i64`, so that `2`
//! orders before `10`; otherwise they stay text. Surrounding whitespace in a
//! key cell is ignored.

use polars::prelude::Column;

use crate::frame_builder::{integer_column, text_column};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Integer,
    Text,
}

impl KeyType {
    /// Infer the key type from raw key cells. Empty cells are ignored.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen_any = false;
        for value in values {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if value.parse::<i64>().is_err() {
                return Self::Text;
            }
            seen_any = true;
        }
        if seen_any { Self::Integer } else { Self::Text }
    }

    /// Canonical form used for key equality; `None` for a missing key.
    pub fn canonical(self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match self {
            Self::Integer => value
                .parse::<i64>()
                .ok()
                .map(|parsed| parsed.to_string()),
            Self::Text => Some(value.to_string()),
        }
    }

    /// Build the key column for this type.
    pub fn column<'a>(self, name: &str, values: impl Iterator<Item = &'a str>) -> Column {
        let values = values.map(str::trim);
        match self {
            Self::Integer => integer_column(
                name,
                values.map(|value| value.parse::<i64>().ok()).collect(),
            ),
            Self::Text => text_column(name, values),
        }
    }
}
