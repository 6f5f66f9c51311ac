//! Fixed English calendar names.
//!
//! Month and weekday names are looked up in static tables instead of any
//! locale-aware formatter, so filter matching is identical on every host.

use chrono::{Datelike, NaiveDateTime};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Months the bikeshare sources cover, offered by the interactive prompt.
pub const OFFERED_MONTHS: &[&str] = &["January", "February", "March", "April", "May", "June"];

pub fn month_name(ts: &NaiveDateTime) -> &'static str {
    MONTH_NAMES[ts.month0() as usize]
}

pub fn weekday_name(ts: &NaiveDateTime) -> &'static str {
    WEEKDAY_NAMES[ts.weekday().num_days_from_monday() as usize]
}

/// Finds the canonical month name matching `input`, ignoring case and
/// surrounding whitespace.
pub fn lookup_month(input: &str) -> Option<&'static str> {
    lookup(&MONTH_NAMES, input)
}

pub fn lookup_weekday(input: &str) -> Option<&'static str> {
    lookup(&WEEKDAY_NAMES, input)
}

fn lookup(table: &[&'static str], input: &str) -> Option<&'static str> {
    let input = input.trim();
    table
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 7, 57)
            .unwrap()
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(&at(2017, 1, 1)), "January");
        assert_eq!(month_name(&at(2017, 6, 30)), "June");
        assert_eq!(month_name(&at(2017, 12, 31)), "December");
    }

    #[test]
    fn test_weekday_name_known_dates() {
        // 2017-01-01 was a Sunday, 2017-01-02 a Monday
        assert_eq!(weekday_name(&at(2017, 1, 1)), "Sunday");
        assert_eq!(weekday_name(&at(2017, 1, 2)), "Monday");
        assert_eq!(weekday_name(&at(2017, 6, 23)), "Friday");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup_month(" march "), Some("March"));
        assert_eq!(lookup_weekday("SATURDAY"), Some("Saturday"));
        assert_eq!(lookup_month("Smarch"), None);
        assert_eq!(lookup_weekday(""), None);
    }

    #[test]
    fn test_offered_months_stop_at_june() {
        assert_eq!(OFFERED_MONTHS.len(), 6);
        assert_eq!(OFFERED_MONTHS.last(), Some(&"June"));
    }
}
