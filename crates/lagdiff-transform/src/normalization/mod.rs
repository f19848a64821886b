//! Normalization of raw cell text into typed values.
//!
//! - **datetime**: tolerant date/time parsing and timestamp formatting
//! - **numeric**: float coercion and formatting

pub mod datetime;
pub mod numeric;

pub use datetime::{
    DateParser, SUPPORTED_FORMATS, format_timestamps, from_epoch_millis, to_epoch_millis,
};
pub use numeric::{coerce_value, format_float, parse_value};
