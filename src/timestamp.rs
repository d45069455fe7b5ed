//! Reading timestamps: `month/day/year hour:minute`
//!
//! Two-digit years are taken relative to 2000, falling back to the 1900s when
//! the year is ahead of the current two-digit year (`"5/12/16 7:00"` is 2016,
//! `"5/12/97 7:00"` is 1997). Four-digit years are used as written.

use crate::error::{InterpolationError, Result};
use chrono::{Datelike, NaiveDateTime, Utc};

const BASE_YEAR: i32 = 2000;
const FORMAT: &str = "%m/%d/%Y %H:%M";

/// Parse a timestamp, resolving two-digit years against the current year
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    parse_timestamp_with_pivot(raw, Utc::now().year() % 100)
}

/// Parse a timestamp, treating two-digit years above `pivot` as 19xx
pub fn parse_timestamp_with_pivot(raw: &str, pivot: i32) -> Result<NaiveDateTime> {
    let invalid = |message: &str| InterpolationError::Timestamp {
        raw: raw.to_string(),
        message: message.to_string(),
    };

    let parsed = NaiveDateTime::parse_from_str(raw.trim(), FORMAT)
        .map_err(|err| invalid(&format!("expected 'month/day/year hour:minute': {}", err)))?;

    let year = parsed.year();
    if !(0..100).contains(&year) {
        return Ok(parsed);
    }

    let year = if year > pivot {
        BASE_YEAR - 100 + year
    } else {
        BASE_YEAR + year
    };
    parsed
        .with_year(year)
        .ok_or_else(|| invalid("date out of range"))
}

/// Whole hours from `earliest` to `time`, rounded down
pub fn hours_since(earliest: NaiveDateTime, time: NaiveDateTime) -> i64 {
    (time - earliest).num_hours()
}
