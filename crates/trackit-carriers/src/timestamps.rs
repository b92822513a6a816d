// ABOUTME: Timestamp parsing for the date and time formats carriers report
// ABOUTME: Every carrier wall-clock value without an explicit offset is read as UTC
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_DATE: &str = "%Y-%m-%d";

/// Midnight UTC of `date` parsed with `format`
pub(crate) fn date_at_midnight(date: &str, format: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(date.trim(), format)
        .ok()
        .map(|d| d.and_time(NaiveTime::default()).and_utc())
}

/// Combine separate date and time fields, defaulting to midnight
pub(crate) fn date_and_time(
    date: &str,
    time: Option<&str>,
    date_format: &str,
    time_format: &str,
) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), date_format).ok()?;
    let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) => NaiveTime::parse_from_str(time, time_format).ok()?,
        None => NaiveTime::default(),
    };
    Some(date.and_time(time).and_utc())
}

/// ISO-8601 timestamp with or without offset, or a bare ISO date
///
/// Values with an offset are converted to UTC; values without one are read
/// as UTC.
pub(crate) fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.with_timezone(&Utc));
    }
    let local = value.get(..19).unwrap_or(value);
    NaiveDateTime::parse_from_str(local, ISO_DATE_TIME)
        .map(|dt| dt.and_utc())
        .ok()
        .or_else(|| date_at_midnight(value, ISO_DATE))
}

/// The first 19 characters of an ISO timestamp (`YYYY-MM-DDTHH:MM:SS`)
pub(crate) fn wall_clock(value: &str) -> String {
    value.trim().chars().take(19).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_converts_offsets() {
        let ts = parse_iso("2015-07-10T10:10:00-05:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2015-07-10T15:10:00+00:00");
    }

    #[test]
    fn test_parse_iso_without_offset_is_utc() {
        let ts = parse_iso("2014-03-04T10:45:34").unwrap();
        assert_eq!(ts.to_rfc3339(), "2014-03-04T10:45:34+00:00");

        let date = parse_iso("2015-10-29").unwrap();
        assert_eq!(date.to_rfc3339(), "2015-10-29T00:00:00+00:00");

        assert!(parse_iso("tomorrow").is_none());
    }

    #[test]
    fn test_date_and_time_defaults_to_midnight() {
        let ts = date_and_time("20140704", None, "%Y%m%d", "%H%M%S").unwrap();
        assert_eq!(ts.to_rfc3339(), "2014-07-04T00:00:00+00:00");

        let ts = date_and_time("20140704", Some("142305"), "%Y%m%d", "%H%M%S").unwrap();
        assert_eq!(ts.to_rfc3339(), "2014-07-04T14:23:05+00:00");
    }

    #[test]
    fn test_wall_clock_truncates() {
        assert_eq!(wall_clock("2013-10-08T13:29:00-05:00"), "2013-10-08T13:29:00");
    }
}
