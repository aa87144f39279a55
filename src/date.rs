//! Classification and parsing of EXIF date-time tags.
//!
//! EXIF stores timestamps as ASCII in the form `"YYYY:MM:DD HH:MM:SS"`,
//! with no timezone of its own. Callers that know the capture timezone can
//! pass it as a hint; the parsed wall-clock time is then anchored to that
//! offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::ErrorKind;
use crate::tags::TagKey;

const DATE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y:%m:%d";

/// Resolved names that denote a calendar timestamp.
///
/// Classification is by resolved name only; a tag id the table could not
/// resolve is never treated as a date.
const DATE_TAGS: &[&str] = &[
    "dateTime",
    "dateTimeOriginal",
    "dateTimeDigitized",
    "gpsDateStamp",
];

/// Whether this tag's value is an EXIF date-time string.
pub fn is_date_tag(key: &TagKey) -> bool {
    match key {
        TagKey::Named(name) => DATE_TAGS.contains(name),
        TagKey::Numeric(_) => false,
    }
}

/// A parsed EXIF timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExifDateTime {
    /// Wall-clock time with no timezone information (no hint was supplied).
    Local(NaiveDateTime),
    /// Wall-clock time anchored to the caller-supplied offset.
    Zoned(DateTime<FixedOffset>),
}

/// Parse an EXIF date-time string, optionally anchoring it to a timezone.
///
/// The date-only form (`"YYYY:MM:DD"`, as used by `gpsDateStamp`) parses as
/// midnight of that day.
pub fn parse_date(raw: &str, timezone: Option<FixedOffset>) -> Result<ExifDateTime, ErrorKind> {
    let naive = NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT).or_else(|err| {
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| ErrorKind::InvalidDate {
                raw: raw.to_owned(),
                source: err,
            })
    })?;

    Ok(match timezone {
        Some(offset) => {
            // The raw string is wall-clock time at `offset`.
            ExifDateTime::Zoned(DateTime::from_naive_utc_and_offset(naive - offset, offset))
        }
        None => ExifDateTime::Local(naive),
    })
}
