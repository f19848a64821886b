//! The lag window `n` used by the difference computation.
//!
//! A lag is always at least 1. In lenient mode any input that is not a
//! positive integer resolves to 1; in strict mode it is rejected.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::StrictnessMode;

/// Errors from strict lag parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LagParseError {
    #[error("lag '{value}' is not an integer")]
    NotAnInteger { value: String },
    #[error("lag must be at least 1, got {value}")]
    NotPositive { value: String },
}

/// Number of positions to look back within an entity group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LagWindow(NonZeroUsize);

impl LagWindow {
    /// The fallback lag.
    pub const ONE: Self = Self(NonZeroUsize::MIN);

    /// Build a lag window, clamping zero to 1.
    pub fn new(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(Self::ONE, Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Parse a raw parameter according to `mode`.
    pub fn parse(raw: &str, mode: StrictnessMode) -> Result<Self, LagParseError> {
        match mode {
            StrictnessMode::Lenient => Ok(Self::parse_lenient(raw)),
            StrictnessMode::Strict => Self::parse_strict(raw),
        }
    }

    /// Parse leniently: non-integers and values below 1 become 1.
    ///
    /// ```
    /// use lagdiff_model::LagWindow;
    ///
    /// assert_eq!(LagWindow::parse_lenient("3").get(), 3);
    /// assert_eq!(LagWindow::parse_lenient("abc").get(), 1);
    /// assert_eq!(LagWindow::parse_lenient("-5").get(), 1);
    /// ```
    pub fn parse_lenient(raw: &str) -> Self {
        match parse_integer(raw) {
            Some(ParsedInteger::Positive(n)) => Self::new(n),
            Some(ParsedInteger::NonPositive) | None => Self::ONE,
        }
    }

    /// Parse strictly: only integers `>= 1` are accepted.
    pub fn parse_strict(raw: &str) -> Result<Self, LagParseError> {
        match parse_integer(raw) {
            Some(ParsedInteger::Positive(n)) => Ok(Self::new(n)),
            Some(ParsedInteger::NonPositive) => Err(LagParseError::NotPositive {
                value: raw.trim().to_string(),
            }),
            None => Err(LagParseError::NotAnInteger {
                value: raw.trim().to_string(),
            }),
        }
    }
}

impl Default for LagWindow {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for LagWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

enum ParsedInteger {
    Positive(usize),
    NonPositive,
}

/// Integer literal with optional sign and `_` digit separators.
/// Magnitudes beyond `usize` saturate.
fn parse_integer(raw: &str) -> Option<ParsedInteger> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.chars().all(|ch| ch.is_ascii_digit() || ch == '_')
    {
        return None;
    }
    let mut value: usize = 0;
    for ch in digits.chars().filter(char::is_ascii_digit) {
        let digit = ch.to_digit(10).unwrap_or(0) as usize;
        value = value.saturating_mul(10).saturating_add(digit);
    }
    if negative || value == 0 {
        Some(ParsedInteger::NonPositive)
    } else {
        Some(ParsedInteger::Positive(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_clamps() {
        assert_eq!(LagWindow::parse_lenient("0").get(), 1);
        assert_eq!(LagWindow::parse_lenient("-5").get(), 1);
        assert_eq!(LagWindow::parse_lenient("").get(), 1);
        assert_eq!(LagWindow::parse_lenient("2.5").get(), 1);
        assert_eq!(LagWindow::parse_lenient(" 4 ").get(), 4);
        assert_eq!(LagWindow::parse_lenient("+2").get(), 2);
        assert_eq!(LagWindow::parse_lenient("1_0").get(), 10);
    }

    #[test]
    fn huge_lag_saturates() {
        let lag = LagWindow::parse_lenient("999999999999999999999999999");
        assert_eq!(lag.get(), usize::MAX);
    }

    #[test]
    fn strict_parse_rejects_defects() {
        assert_eq!(
            LagWindow::parse_strict("abc"),
            Err(LagParseError::NotAnInteger {
                value: "abc".to_string()
            })
        );
        assert_eq!(
            LagWindow::parse_strict("-5"),
            Err(LagParseError::NotPositive {
                value: "-5".to_string()
            })
        );
        assert_eq!(LagWindow::parse_strict("3").map(LagWindow::get), Ok(3));
    }

    #[test]
    fn new_clamps_zero() {
        assert_eq!(LagWindow::new(0), LagWindow::ONE);
        assert_eq!(LagWindow::new(7).to_string(), "7");
    }
}
