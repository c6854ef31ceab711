//! Textual date formats found in employee records.
//!
//! Two encodings are recognised for sorting:
//!
//! * year+month labels, `2026年3月` (and the ASCII form `2026-03`), which map
//!   to the first day of that month;
//! * slash dates, `2026/3/5` or `2026/03/05`.
//!
//! Editing and validation additionally accept hyphenated full dates
//! (`2026-03-05`) through [`parse_flexible_date`]. Every parser rejects
//! calendar-invalid dates instead of rolling them over.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static MONTH_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(?:年(\d{1,2})月|-(\d{1,2}))$").expect("month label pattern is valid")
});

static SLASH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").expect("slash date pattern is valid")
});

static FLEXIBLE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$").expect("flexible date pattern is valid")
});

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    if year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a year+month label to the first day of that month.
///
/// # Example
/// ```
/// use roster_rust::parsing::dates::parse_month_label;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_month_label("2026年3月"), NaiveDate::from_ymd_opt(2026, 3, 1));
/// assert_eq!(parse_month_label("2026-03"), NaiveDate::from_ymd_opt(2026, 3, 1));
/// assert_eq!(parse_month_label("2026年13月"), None);
/// ```
pub fn parse_month_label(text: &str) -> Option<NaiveDate> {
    let caps = MONTH_LABEL.captures(text.trim())?;
    let month = caps.get(2).or_else(|| caps.get(3))?;
    ymd(&caps[1], month.as_str(), "1")
}

/// Parse a `YYYY/M/D` date.
pub fn parse_slash_date(text: &str) -> Option<NaiveDate> {
    let caps = SLASH_DATE.captures(text.trim())?;
    ymd(&caps[1], &caps[2], &caps[3])
}

/// Parse a full date written with `/` or `-` separators.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let caps = FLEXIBLE_DATE.captures(text.trim())?;
    ymd(&caps[1], &caps[2], &caps[3])
}

/// Parse any date encoding accepted by date-typed columns.
pub fn parse_column_date(text: &str) -> Option<NaiveDate> {
    parse_month_label(text).or_else(|| parse_slash_date(text))
}

/// Milliseconds since the Unix epoch at midnight UTC of `date`.
pub fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// `YYYY年M月` label of a date's month.
pub fn format_month_label(date: NaiveDate) -> String {
    format!("{}年{}月", date.year(), date.month())
}

/// `YYYY-MM` bucket key of a date's month.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// First day of the month `offset` months away from `date`'s month.
pub fn shift_month(date: NaiveDate, offset: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + offset;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Whole months between the months of two dates (`b - a`).
pub fn month_distance(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() * 12 + b.month0() as i32) - (a.year() * 12 + a.month0() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_label_forms() {
        assert_eq!(parse_month_label("2026年3月"), Some(d(2026, 3, 1)));
        assert_eq!(parse_month_label(" 2026年03月 "), Some(d(2026, 3, 1)));
        assert_eq!(parse_month_label("2026-03"), Some(d(2026, 3, 1)));
        assert_eq!(parse_month_label("2026年0月"), None);
        assert_eq!(parse_month_label("2026-03-05"), None);
        assert_eq!(parse_month_label("March 2026"), None);
    }

    #[test]
    fn test_slash_dates_padded_and_unpadded_agree() {
        let a = parse_slash_date("2026/3/5").unwrap();
        let b = parse_slash_date("2026/03/05").unwrap();
        assert_eq!(a, b);
        assert_eq!(date_to_millis(a), date_to_millis(b));
    }

    #[test]
    fn test_calendar_invalid_dates_are_rejected() {
        assert_eq!(parse_slash_date("2025/2/30"), None);
        assert_eq!(parse_flexible_date("2025-13-01"), None);
        assert_eq!(parse_slash_date("0000/1/1"), None);
    }

    #[test]
    fn test_flexible_date_accepts_both_separators() {
        assert_eq!(parse_flexible_date("2024-01-15"), Some(d(2024, 1, 15)));
        assert_eq!(parse_flexible_date("2024/1/15"), Some(d(2024, 1, 15)));
        assert_eq!(parse_flexible_date("2024.1.15"), None);
    }

    #[test]
    fn test_column_date_tries_month_label_then_slash() {
        assert_eq!(parse_column_date("2024年7月"), Some(d(2024, 7, 1)));
        assert_eq!(parse_column_date("2024/7/9"), Some(d(2024, 7, 9)));
        assert_eq!(parse_column_date("not a date"), None);
    }

    #[test]
    fn test_millis_are_monotonic() {
        assert!(date_to_millis(d(2024, 1, 1)) < date_to_millis(d(2024, 1, 2)));
        assert_eq!(date_to_millis(d(1970, 1, 1)), 0);
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(shift_month(d(2026, 1, 20), -1), d(2025, 12, 1));
        assert_eq!(shift_month(d(2026, 10, 16), -11), d(2025, 11, 1));
        assert_eq!(month_distance(d(2025, 11, 30), d(2026, 10, 1)), 11);
        assert_eq!(month_key(d(2026, 3, 9)), "2026-03");
        assert_eq!(format_month_label(d(2026, 3, 9)), "2026年3月");
    }
}
