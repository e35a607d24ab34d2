//! Utilities for date and time formatting
//!
//! Provides consistent date/time formatting across the application

use chrono::{DateTime, Utc};

/// Format ISO datetime string to DD.MM.YYYY HH:MM:SS format
/// Example: "2024-03-15T14:02:26.123Z" -> "15.03.2024 14:02:26"
pub fn format_datetime(datetime_str: &str) -> String {
    if let Some((date_part, time_part)) = datetime_str.split_once('T') {
        if let Some((year, rest)) = date_part.split_once('-') {
            if let Some((month, day)) = rest.split_once('-') {
                let time = time_part.split('.').next().unwrap_or(time_part);
                let time = time.trim_end_matches('Z');
                return format!("{}.{}.{} {}", day, month, year, time);
            }
        }
    }
    datetime_str.to_string()
}

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}.{}.{}", day, month, year);
        }
    }
    date_str.to_string()
}

/// Relative age of a timestamp against a reference instant.
/// Falls back to the absolute date beyond a month.
pub fn format_time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 31 {
        return plural(days, "day");
    }
    format_date(&at.to_rfc3339())
}

/// Relative age against the current time.
pub fn time_ago(at: DateTime<Utc>) -> String {
    format_time_ago(at, Utc::now())
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime("2024-03-15T14:02:26.123Z"),
            "15.03.2024 14:02:26"
        );
        assert_eq!(
            format_datetime("2024-12-31T23:59:59Z"),
            "31.12.2024 23:59:59"
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_datetime("invalid"), "invalid");
        assert_eq!(format_date("invalid"), "invalid");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let cases = [
            (Utc.with_ymd_and_hms(2024, 3, 15, 11, 59, 30).unwrap(), "just now"),
            (Utc.with_ymd_and_hms(2024, 3, 15, 11, 59, 0).unwrap(), "1 minute ago"),
            (Utc.with_ymd_and_hms(2024, 3, 15, 11, 15, 0).unwrap(), "45 minutes ago"),
            (Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(), "3 hours ago"),
            (Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap(), "2 days ago"),
        ];
        for (at, expected) in cases {
            assert_eq!(format_time_ago(at, now), expected);
        }
    }

    #[test]
    fn test_time_ago_falls_back_to_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2023, 11, 2, 8, 0, 0).unwrap();
        assert_eq!(format_time_ago(old, now), "02.11.2023");
    }
}
