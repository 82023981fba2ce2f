//! Creation time extraction
//!
//! This module decides which embedded date a file was captured at:
//! - `CreateDate` is preferred when it is well formed
//! - `DateTimeOriginal` is used when `CreateDate` is missing or malformed
//! - anything else, or a year below the configured minimum, is unknown
//!
//! The chosen time is also turned into the base-26 filename stem.

pub mod encode;

use crate::config::Config;
use crate::inspect::{DateField, MetadataSource};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, trace, warn};

/// Pattern: YYYY:MM:DD HH:MM:SS, anything after the seconds is ignored
static EXIF_DATETIME: OnceLock<Regex> = OnceLock::new();

fn exif_datetime_pattern() -> &'static Regex {
    EXIF_DATETIME.get_or_init(|| {
        Regex::new(r"^\s*(\d{4}):(\d{2}):(\d{2})[ T](\d{2}):(\d{2}):(\d{2})").unwrap()
    })
}

/// Embedded capture time of a media file, to the second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CreationTimestamp(NaiveDateTime);

impl CreationTimestamp {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime.with_nanosecond(0).unwrap_or(datetime))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The `YYYYMMDDHHMMSS` digits as an integer
    pub fn digits(&self) -> u64 {
        let dt = &self.0;
        let date = dt.year().max(0) as u64 * 10_000 + dt.month() as u64 * 100 + dt.day() as u64;
        let time = dt.hour() as u64 * 10_000 + dt.minute() as u64 * 100 + dt.second() as u64;
        date * 1_000_000 + time
    }

    /// Sortable alphabetic filename stem
    pub fn encoded(&self) -> String {
        encode::encode(self.digits())
    }

    /// Seconds since the epoch, reading the timestamp as local wall time
    pub fn unix_seconds_local(&self) -> i64 {
        match Local.from_local_datetime(&self.0).earliest() {
            Some(local) => local.timestamp(),
            // Skipped by a DST jump; treat as UTC rather than failing the file
            None => self.0.and_utc().timestamp(),
        }
    }
}

impl fmt::Display for CreationTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Parse an EXIF style date field: "YYYY:MM:DD HH:MM:SS"
///
/// Returns `None` for values without the `:` date separator and for
/// placeholder dates such as "0000:00:00 00:00:00".
pub fn parse_date_field(value: &str) -> Option<NaiveDateTime> {
    let caps = exif_datetime_pattern().captures(value)?;
    let num = |i: usize| caps[i].parse::<u32>().ok();

    let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, num(2)?, num(3)?)?;
    date.and_hms_opt(num(4)?, num(5)?, num(6)?)
}

/// Pick the creation time from the two date fields.
///
/// The primary field wins whenever it is well formed; the secondary is a
/// fallback only. Dates before `min_year` count as unknown.
pub fn resolve_creation_time(
    primary: Option<&str>,
    secondary: Option<&str>,
    min_year: Option<i32>,
) -> Option<CreationTimestamp> {
    let primary_dt = primary.and_then(parse_date_field);
    let secondary_dt = secondary.and_then(parse_date_field);

    if let (Some(p), Some(s)) = (primary_dt, secondary_dt)
        && p != s
    {
        warn!(
            create_date = %p,
            original_date = %s,
            "CreateDate and DateTimeOriginal differ, using CreateDate"
        );
    }

    let chosen = CreationTimestamp::new(primary_dt.or(secondary_dt)?);

    if let Some(min_year) = min_year
        && chosen.year() < min_year
    {
        debug!(year = chosen.year(), min_year, "Creation year below minimum, treating as unknown");
        return None;
    }

    Some(chosen)
}

/// Query both date fields and apply the precedence rule.
///
/// A failing metadata query is handled like a missing field.
pub fn extract_creation_time<S: MetadataSource + ?Sized>(
    source: &S,
    path: &Path,
    config: &Config,
) -> Option<CreationTimestamp> {
    let read = |field: DateField| match source.date_field(path, field) {
        Ok(value) => {
            trace!(?path, ?field, ?value, "Read date field");
            value
        }
        Err(e) => {
            warn!(?path, ?field, error = %e, "Date query failed");
            None
        }
    };

    let primary = read(DateField::CreateDate);
    let secondary = read(DateField::DateTimeOriginal);

    resolve_creation_time(primary.as_deref(), secondary.as_deref(), config.min_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> CreationTimestamp {
        CreationTimestamp::new(parse_date_field(s).unwrap())
    }

    #[test]
    fn test_parse_date_field() {
        let dt = parse_date_field("2021:05:01 12:00:00").unwrap();
        assert_eq!(dt.year(), 2021);
        assert_eq!(dt.month(), 5);
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 12);

        // Trailing subseconds and zone are ignored
        assert!(parse_date_field("2021:05:01 12:00:00.25+02:00").is_some());

        // No date separator
        assert!(parse_date_field("20210501 120000").is_none());
        assert!(parse_date_field("2021-05-01 12:00:00").is_none());
        // Placeholder written by some cameras
        assert!(parse_date_field("0000:00:00 00:00:00").is_none());
        assert!(parse_date_field("").is_none());
    }

    #[test]
    fn test_digits_and_encoding() {
        let stamp = ts("2021:05:01 12:00:00");
        assert_eq!(stamp.digits(), 20210501120000);
        assert_eq!(stamp.encoded(), "SUHZPXTXW");
        assert_eq!(stamp.to_string(), "2021-05-01 12:00:00");
    }

    #[test]
    fn test_prefers_well_formed_primary() {
        let chosen = resolve_creation_time(
            Some("2021:05:01 12:00:00"),
            Some("2019:01:01 00:00:00"),
            Some(2000),
        );
        assert_eq!(chosen, Some(ts("2021:05:01 12:00:00")));
    }

    #[test]
    fn test_falls_back_to_secondary() {
        let chosen = resolve_creation_time(Some("garbage"), Some("2019:01:01 00:00:00"), Some(2000));
        assert_eq!(chosen, Some(ts("2019:01:01 00:00:00")));

        let chosen = resolve_creation_time(None, Some("2019:01:01 00:00:00"), Some(2000));
        assert_eq!(chosen, Some(ts("2019:01:01 00:00:00")));
    }

    #[test]
    fn test_both_malformed_is_unknown() {
        assert_eq!(resolve_creation_time(Some("garbage"), Some("also bad"), Some(2000)), None);
        assert_eq!(resolve_creation_time(None, None, Some(2000)), None);
    }

    #[test]
    fn test_min_year_policy() {
        assert_eq!(
            resolve_creation_time(Some("1999:12:31 23:59:59"), None, Some(2000)),
            None
        );
        // An old primary is not replaced by the secondary
        assert_eq!(
            resolve_creation_time(
                Some("1980:01:01 00:00:00"),
                Some("2010:01:01 00:00:00"),
                Some(2000)
            ),
            None
        );
        assert_eq!(
            resolve_creation_time(Some("1999:12:31 23:59:59"), None, None),
            Some(ts("1999:12:31 23:59:59"))
        );
    }

    #[test]
    fn test_unix_seconds_local_round_trips() {
        let stamp = ts("2021:05:01 12:00:00");
        let secs = stamp.unix_seconds_local();
        let back = Local.timestamp_opt(secs, 0).unwrap().naive_local();
        assert_eq!(CreationTimestamp::new(back), stamp);
    }
}
