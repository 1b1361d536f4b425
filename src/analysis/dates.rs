//! Calendar date extraction
//!
//! Numeric fragments that look like dates are pulled out with one regular
//! expression and then tried against a fixed, ordered list of formats. The
//! first format that parses wins; fragments no format accepts are dropped.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// ISO `YYYY-M-D`, or up to two `D`/`M` groups followed by a 2-4 digit year
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}|(?:[0-9]{1,2}[./-]){0,2}[0-9]{2,4})\b")
        .expect("date pattern is valid")
});

/// Accepted date layouts, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `DD-MM-YYYY`
    DayMonthYearDash,
    /// `DD.MM.YYYY`
    DayMonthYearDot,
    /// `YYYY`, resolved to January 1st
    Year,
    /// `MM-YYYY`, resolved to the first of the month
    MonthYear,
    /// `YYYY-MM-DD`
    YearMonthDay,
}

impl DateFormat {
    pub const ORDERED: [DateFormat; 5] = [
        DateFormat::DayMonthYearDash,
        DateFormat::DayMonthYearDot,
        DateFormat::Year,
        DateFormat::MonthYear,
        DateFormat::YearMonthDay,
    ];

    /// Parse `raw` in this layout; the whole string must match
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        match self {
            DateFormat::DayMonthYearDash => day_month_year(raw, '-'),
            DateFormat::DayMonthYearDot => day_month_year(raw, '.'),
            DateFormat::Year => make_date(year(raw)?, 1, 1),
            DateFormat::MonthYear => {
                let (month, rest) = raw.split_once('-')?;
                make_date(year(rest)?, day_or_month(month)?, 1)
            }
            DateFormat::YearMonthDay => {
                let mut parts = raw.split('-');
                let y = year(parts.next()?)?;
                let m = day_or_month(parts.next()?)?;
                let d = day_or_month(parts.next()?)?;
                if parts.next().is_some() {
                    return None;
                }
                make_date(y, m, d)
            }
        }
    }
}

/// A date found in a document; renders as `DD-MM-YYYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtractedDate(pub NaiveDate);

impl ExtractedDate {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ExtractedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:02}-{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }
}

impl Serialize for ExtractedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Raw fragments matched by the date pattern, in order of appearance
pub fn date_candidates(text: &str) -> Vec<&str> {
    DATE_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Parse one fragment with the first format that accepts it
pub fn parse_date(raw: &str) -> Option<ExtractedDate> {
    DateFormat::ORDERED
        .iter()
        .find_map(|format| format.parse(raw))
        .map(ExtractedDate)
}

/// Every date in `text`, in order of appearance, duplicates kept
pub fn extract_dates(text: &str) -> Vec<ExtractedDate> {
    date_candidates(text)
        .into_iter()
        .filter_map(parse_date)
        .collect()
}

/// Comma-separated `DD-MM-YYYY` list, the form stored on a document record
pub fn join_dates(dates: &[ExtractedDate]) -> String {
    dates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn day_month_year(raw: &str, separator: char) -> Option<NaiveDate> {
    let mut parts = raw.split(separator);
    let d = day_or_month(parts.next()?)?;
    let m = day_or_month(parts.next()?)?;
    let y = year(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    make_date(y, m, d)
}

fn digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn day_or_month(s: &str) -> Option<u32> {
    digits(s, 1, 2)
}

fn year(s: &str) -> Option<i32> {
    let y = digits(s, 4, 4)? as i32;
    (y >= 1).then_some(y)
}

fn make_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(text: &str) -> Vec<String> {
        extract_dates(text).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_dash_and_iso_normalize_the_same() {
        assert_eq!(
            rendered("Meeting on 01-12-2024 and 2024-12-01"),
            vec!["01-12-2024", "01-12-2024"]
        );
    }

    #[test]
    fn test_dot_format() {
        assert_eq!(rendered("Signed 5.3.2021."), vec!["05-03-2021"]);
    }

    #[test]
    fn test_year_and_month_year_defaults() {
        assert_eq!(rendered("In 1999 and again 7-2003"), vec!["01-01-1999", "01-07-2003"]);
    }

    #[test]
    fn test_invalid_fragments_dropped() {
        // Two-digit year, impossible day, slash separator, zero year
        assert!(rendered("on 12-05-24, 32-01-2020, 12/05/2024 or 0000").is_empty());
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        assert_eq!(
            rendered("2020 then 1-1-2020 then 2019"),
            vec!["01-01-2020", "01-01-2020", "01-01-2019"]
        );
    }

    #[test]
    fn test_candidates() {
        assert_eq!(
            date_candidates("from 01.02.2023 to 2023-02-10, ref 42"),
            vec!["01.02.2023", "2023-02-10", "42"]
        );
    }

    #[test]
    fn test_format_order() {
        assert_eq!(DateFormat::Year.parse("2024"), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(DateFormat::DayMonthYearDash.parse("2024-12-01"), None);
        assert_eq!(
            DateFormat::YearMonthDay.parse("2024-12-01"),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
    }

    #[test]
    fn test_join_dates() {
        let dates = extract_dates("01-12-2024 and 1999");
        assert_eq!(join_dates(&dates), "01-12-2024, 01-01-1999");
        assert_eq!(join_dates(&[]), "");
    }

    #[test]
    fn test_serializes_as_string() {
        let dates = extract_dates("2024-02-29");
        assert_eq!(serde_json::to_string(&dates).unwrap(), r#"["29-02-2024"]"#);
    }
}
