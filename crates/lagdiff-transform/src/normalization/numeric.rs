//! Numeric coercion and formatting.

/// Parse a float, returning `None` for empty or invalid input.
///
/// Accepts the usual decimal and exponent forms, `inf`/`nan` spellings and
/// `_` separators between digits (`1_000.5`).
pub fn parse_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<f64>() {
        return Some(parsed);
    }
    if trimmed.contains('_') && underscores_between_digits(trimmed) {
        return trimmed.replace('_', "").parse::<f64>().ok();
    }
    None
}

/// Coerce a cell to a float, yielding NaN when it cannot be parsed.
///
/// ```
/// use lagdiff_transform::coerce_value;
///
/// assert_eq!(coerce_value(" 12.5 "), 12.5);
/// assert!(coerce_value("n/a").is_nan());
/// ```
pub fn coerce_value(value: &str) -> f64 {
    parse_value(value).unwrap_or(f64::NAN)
}

fn underscores_between_digits(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.iter().enumerate().all(|(idx, byte)| {
        *byte != b'_'
            || (idx > 0
                && idx + 1 < bytes.len()
                && bytes[idx - 1].is_ascii_digit()
                && bytes[idx + 1].is_ascii_digit())
    })
}

/// Format a float the way it is written to output files.
///
/// Shortest round-trip digits. Magnitudes below `1e-4` or from `1e16` up use
/// scientific notation with a signed two-digit exponent: `10.0`, `2.5`,
/// `1e+20`, `1.5e-05`.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return format!("{value:?}");
    }
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{value:?}");
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return format!("{value:?}");
    };
    if (-4..16).contains(&exponent) {
        return format!("{value:?}");
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}
