//! Tolerant date/time parsing.
//!
//! Accepts ISO 8601 and RFC 3339/2822 timestamps, numeric dates in either
//! field order, month names, partial dates, and a handful of relative words.
//! Anything else yields `None`; parsing never fails loudly.
//!
//! Relative inputs (`today`, `3 days ago`) resolve against the parser's
//! anchor instant, which callers pass in explicitly.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use lagdiff_model::DateOrder;

/// Example inputs per accepted form, used for help output.
pub const SUPPORTED_FORMATS: &[(&str, &str)] = &[
    ("ISO 8601 date", "2024-01-15"),
    ("ISO 8601 date-time", "2024-01-15T10:30:00"),
    ("date-time with space", "2024-01-15 10:30"),
    ("UTC offset (normalized)", "2024-01-15T10:30:00+02:00"),
    ("RFC 2822", "Mon, 15 Jan 2024 10:30:00 +0000"),
    ("slash numeric", "01/15/2024"),
    ("dot numeric", "15.01.2024"),
    ("compact", "20240115"),
    ("month name", "Jan 15, 2024"),
    ("day month name", "15 January 2024"),
    ("weekday prefix", "Monday, January 15th 2024"),
    ("year-month (first day)", "January 2024"),
    ("year (January 1st)", "2024"),
    ("relative", "yesterday"),
    ("relative offset", "3 days ago"),
];

const TIME_SUFFIXES: &[&str] = &[
    "T%H:%M:%S%.f",
    "T%H:%M:%S",
    "T%H:%M",
    " %H:%M:%S%.f",
    " %H:%M:%S",
    " %H:%M",
    " %I:%M:%S %p",
    " %I:%M %p",
];

// `%B` also accepts the abbreviated month name. `%Y` accepts short years, so
// its matches are checked with `has_full_year`; `%y` covers two-digit years.
const UNAMBIGUOUS_DATES: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y-%B-%d",
    "%d-%B-%Y",
    "%d-%B-%y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d %B %y",
    "%B %d %Y",
    "%B %d, %Y",
    "%B. %d, %Y",
];

const MONTH_FIRST_DATES: &[&str] = &[
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%m.%d.%y",
];

const DAY_FIRST_DATES: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
];

const YEAR_MONTHS: &[&str] = &["%Y-%m", "%Y/%m", "%m/%Y", "%m-%Y", "%B %Y", "%B, %Y"];

const OFFSET_DATETIMES: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "mon",
    "tue",
    "tues",
    "wed",
    "thu",
    "thur",
    "thurs",
    "fri",
    "sat",
    "sun",
];

/// Date parser with a fixed field order and relative-date anchor.
#[derive(Debug, Clone)]
pub struct DateParser {
    anchor: NaiveDateTime,
    date_patterns: Vec<&'static str>,
    datetime_patterns: Vec<String>,
}

impl DateParser {
    pub fn new(order: DateOrder, anchor: NaiveDateTime) -> Self {
        let (primary, fallback) = match order {
            DateOrder::MonthFirst => (MONTH_FIRST_DATES, DAY_FIRST_DATES),
            DateOrder::DayFirst => (DAY_FIRST_DATES, MONTH_FIRST_DATES),
        };
        let date_patterns: Vec<&'static str> = UNAMBIGUOUS_DATES
            .iter()
            .chain(primary)
            .chain(fallback)
            .copied()
            .collect();
        let datetime_patterns = date_patterns
            .iter()
            .flat_map(|date| TIME_SUFFIXES.iter().map(move |time| format!("{date}{time}")))
            .collect();
        Self {
            anchor,
            date_patterns,
            datetime_patterns,
        }
    }

    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor
    }

    /// Parse a date-like string. Date-only inputs resolve to midnight.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(relative) = self.parse_relative(trimmed) {
            return Some(relative);
        }
        if let Some(utc) = parse_with_offset(trimmed) {
            return Some(utc);
        }
        if let Some(digits) = parse_all_digits(trimmed) {
            return Some(digits);
        }

        let cleaned = clean_words(trimmed);
        let candidate = strip_utc_suffix(&cleaned);
        if let Some(dt) = self.parse_naive(candidate) {
            return Some(dt);
        }
        parse_year_month(candidate)
    }

    fn parse_naive(&self, value: &str) -> Option<NaiveDateTime> {
        for pattern in &self.datetime_patterns {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern)
                && has_full_year(pattern, dt.date())
            {
                return Some(dt);
            }
        }
        for pattern in &self.date_patterns {
            if let Ok(date) = NaiveDate::parse_from_str(value, pattern)
                && has_full_year(pattern, date)
            {
                return Some(date.and_time(NaiveTime::MIN));
            }
        }
        None
    }

    fn parse_relative(&self, value: &str) -> Option<NaiveDateTime> {
        let lower = value.to_ascii_lowercase();
        let midnight = self.anchor.date().and_time(NaiveTime::MIN);
        match lower.as_str() {
            "now" => return Some(self.anchor),
            "today" => return Some(midnight),
            "yesterday" => return midnight.checked_sub_signed(Duration::days(1)),
            "tomorrow" => return midnight.checked_add_signed(Duration::days(1)),
            _ => {}
        }

        let words: Vec<&str> = lower.split_whitespace().collect();
        let (count, unit, past) = match words.as_slice() {
            [count, unit, "ago"] => (*count, *unit, true),
            ["in", count, unit] => (*count, *unit, false),
            _ => return None,
        };
        let count: i64 = match count {
            "a" | "an" | "one" => 1,
            other => other.parse().ok()?,
        };
        let span = match unit.trim_end_matches('s') {
            "minute" => Duration::try_minutes(count)?,
            "hour" => Duration::try_hours(count)?,
            "day" => Duration::try_days(count)?,
            "week" => Duration::try_weeks(count)?,
            _ => return None,
        };
        if past {
            self.anchor.checked_sub_signed(span)
        } else {
            self.anchor.checked_add_signed(span)
        }
    }
}

/// Timestamps carrying an explicit offset, normalized to UTC.
fn parse_with_offset(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_utc());
    }
    OFFSET_DATETIMES
        .iter()
        .find_map(|pattern| DateTime::parse_from_str(value, pattern).ok())
        .map(|dt| dt.naive_utc())
}

/// `YYYY` and `YYYYMMDD`.
fn parse_all_digits(value: &str) -> Option<NaiveDateTime> {
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = match value.len() {
        4 => NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1)?,
        8 => NaiveDate::from_ymd_opt(
            value[0..4].parse().ok()?,
            value[4..6].parse().ok()?,
            value[6..8].parse().ok()?,
        )?,
        _ => return None,
    };
    Some(date.and_time(NaiveTime::MIN))
}

/// Month-precision inputs resolve to the first of the month.
fn parse_year_month(value: &str) -> Option<NaiveDateTime> {
    YEAR_MONTHS.iter().find_map(|pattern| {
        NaiveDate::parse_from_str(&format!("{value} 01"), &format!("{pattern} %d"))
            .ok()
            .filter(|date| has_full_year(pattern, *date))
            .map(|date| date.and_time(NaiveTime::MIN))
    })
}

/// `%Y` reads `24` as year 24; such a match belongs to a `%y` pattern instead.
fn has_full_year(pattern: &str, date: NaiveDate) -> bool {
    !pattern.contains("%Y") || date.year() >= 1000
}

/// Drop a leading weekday name and ordinal suffixes (`1st`, `22nd`).
fn clean_words(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    if let Some(first) = tokens.first() {
        let word = first.trim_end_matches([',', '.']).to_ascii_lowercase();
        if tokens.len() > 1 && WEEKDAYS.contains(&word.as_str()) {
            tokens.remove(0);
        }
    }
    tokens
        .iter()
        .map(|token| strip_ordinal(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_ordinal(token: &str) -> String {
    let (body, trailing) = match token.strip_suffix(',') {
        Some(body) => (body, ","),
        None => (token, ""),
    };
    let lower = body.to_ascii_lowercase();
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(digits) = lower.strip_suffix(suffix)
            && !digits.is_empty()
            && digits.len() <= 2
            && digits.bytes().all(|b| b.is_ascii_digit())
        {
            return format!("{digits}{trailing}");
        }
    }
    token.to_string()
}

fn strip_utc_suffix(value: &str) -> &str {
    let trimmed = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix(" UTC"))
        .or_else(|| value.strip_suffix(" GMT"))
        .unwrap_or(value);
    trimmed.trim_end()
}

/// Milliseconds since the Unix epoch, treating the value as UTC.
pub fn to_epoch_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

pub fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Format a timestamp column.
///
/// Prints `YYYY-MM-DD` when every value sits at midnight, otherwise
/// `YYYY-MM-DD HH:MM:SS` (with fractional seconds when present). Nulls print empty.
pub fn format_timestamps(values: &[Option<NaiveDateTime>]) -> Vec<String> {
    let date_only = values
        .iter()
        .flatten()
        .all(|dt| dt.time() == NaiveTime::MIN);
    let fractional = values.iter().flatten().any(|dt| dt.nanosecond() != 0);
    let pattern = match (date_only, fractional) {
        (true, _) => "%Y-%m-%d",
        (false, true) => "%Y-%m-%d %H:%M:%S%.6f",
        (false, false) => "%Y-%m-%d %H:%M:%S",
    };
    values
        .iter()
        .map(|value| {
            value
                .map(|dt| dt.format(pattern).to_string())
                .unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(15, 45, 0)
            .unwrap()
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn every_listed_example_parses() {
        let parser = DateParser::new(DateOrder::MonthFirst, anchor());
        let expected = [
            ymd(2024, 1, 15),
            ymd_hm(2024, 1, 15, 10, 30),
            ymd_hm(2024, 1, 15, 10, 30),
            ymd_hm(2024, 1, 15, 8, 30),
            ymd_hm(2024, 1, 15, 10, 30),
            ymd(2024, 1, 15),
            ymd(2024, 1, 15),
            ymd(2024, 1, 15),
            ymd(2024, 1, 15),
            ymd(2024, 1, 15),
            ymd(2024, 1, 15),
            ymd(2024, 1, 1),
            ymd(2024, 1, 1),
            ymd(2024, 3, 9),
            ymd_hm(2024, 3, 7, 15, 45),
        ];
        assert_eq!(SUPPORTED_FORMATS.len(), expected.len());
        for ((label, example), want) in SUPPORTED_FORMATS.iter().zip(expected) {
            assert_eq!(parser.parse(example), Some(want), "{label}: {example}");
        }
    }

    #[test]
    fn two_digit_years() {
        let month_first = DateParser::new(DateOrder::MonthFirst, anchor());
        assert_eq!(month_first.parse("01/02/24"), Some(ymd(2024, 1, 2)));
        assert_eq!(month_first.parse("12/31/99"), Some(ymd(1999, 12, 31)));
        assert_eq!(month_first.parse("05-Jan-24"), Some(ymd(2024, 1, 5)));
        assert_eq!(month_first.parse("15 March 24"), Some(ymd(2024, 3, 15)));
        assert_eq!(
            month_first.parse("01/02/24 10:30"),
            Some(ymd_hm(2024, 1, 2, 10, 30))
        );

        let day_first = DateParser::new(DateOrder::DayFirst, anchor());
        assert_eq!(day_first.parse("01/02/24"), Some(ymd(2024, 2, 1)));
        assert_eq!(day_first.parse("31.12.99"), Some(ymd(1999, 12, 31)));
    }

    #[test]
    fn month_and_year_only() {
        let parser = DateParser::new(DateOrder::MonthFirst, anchor());
        assert_eq!(parser.parse("Jan 2024"), Some(ymd(2024, 1, 1)));
        assert_eq!(parser.parse("September 2023"), Some(ymd(2023, 9, 1)));
        assert_eq!(parser.parse("2024-03"), Some(ymd(2024, 3, 1)));
        assert_eq!(parser.parse("03/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parser.parse("Jan 24"), None);
    }

    #[test]
    fn digits_only_forms() {
        let parser = DateParser::new(DateOrder::MonthFirst, anchor());
        assert_eq!(parser.parse("2024"), Some(ymd(2024, 1, 1)));
        assert_eq!(parser.parse("20240115"), Some(ymd(2024, 1, 15)));
        assert_eq!(parser.parse("20241315"), None);
        assert_eq!(parser.parse("10"), None);
    }

    #[test]
    fn ordinals_and_weekdays_are_ignored() {
        let parser = DateParser::new(DateOrder::MonthFirst, anchor());
        assert_eq!(
            parser.parse("Monday, January 15th 2024"),
            Some(ymd(2024, 1, 15))
        );
        assert_eq!(parser.parse("Fri 2nd Feb 2024"), Some(ymd(2024, 2, 2)));
    }

    #[test]
    fn utc_suffix_is_accepted() {
        let parser = DateParser::new(DateOrder::MonthFirst, anchor());
        assert_eq!(
            parser.parse("2024-01-15T10:30Z"),
            ymd(2024, 1, 15).with_hour(10).and_then(|dt| dt.with_minute(30))
        );
    }

    #[test]
    fn relative_words_use_anchor() {
        let parser = DateParser::new(DateOrder::MonthFirst, anchor());
        assert_eq!(parser.parse("now"), Some(anchor()));
        assert_eq!(parser.parse("Today"), Some(ymd(2024, 3, 10)));
        assert_eq!(parser.parse("yesterday"), Some(ymd(2024, 3, 9)));
        assert_eq!(parser.parse("tomorrow"), Some(ymd(2024, 3, 11)));
        assert_eq!(
            parser.parse("2 days ago"),
            anchor().checked_sub_signed(Duration::days(2))
        );
        assert_eq!(
            parser.parse("in 1 week"),
            anchor().checked_add_signed(Duration::days(7))
        );
        assert_eq!(parser.parse("many days ago"), None);
    }

    #[test]
    fn format_uses_date_only_when_all_midnight() {
        let values = vec![Some(ymd(2024, 1, 1)), None, Some(ymd(2024, 1, 2))];
        assert_eq!(format_timestamps(&values), vec!["2024-01-01", "", "2024-01-02"]);

        let with_time = vec![Some(ymd(2024, 1, 1)), ymd(2024, 1, 2).with_hour(9)];
        assert_eq!(
            format_timestamps(&with_time),
            vec!["2024-01-01 00:00:00", "2024-01-02 09:00:00"]
        );
    }

    #[test]
    fn epoch_round_trip() {
        let dt = ymd(2024, 1, 15).with_hour(6).unwrap();
        assert_eq!(from_epoch_millis(to_epoch_millis(dt)), Some(dt));
    }
}
