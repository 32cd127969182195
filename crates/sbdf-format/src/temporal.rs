//! Conversions between chrono types and SBDF wire milliseconds.
//!
//! DateTime and Date values are written as milliseconds since
//! 0001-01-01 00:00:00 UTC; the shift from the unix epoch lives here and
//! nowhere else. Dates before 1583-01-01 UTC are rejected in both
//! directions.

// expect() is used only for chrono construction from compile-time
// constants known to be valid.
#![allow(clippy::expect_used)]

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::error::FormatError;

/// Milliseconds between 0001-01-01 and 1970-01-01, both at midnight UTC.
pub const EPOCH_SHIFT_MS: i64 = 62_135_596_800_000;

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// 1583-01-01 00:00:00 UTC in unix-epoch milliseconds.
const MIN_UNIX_MS: i64 = -12_212_553_600_000;

/// The earliest writable instant, in wire milliseconds.
pub const MIN_DATETIME_WIRE_MS: i64 = EPOCH_SHIFT_MS + MIN_UNIX_MS;

/// The earliest timestamp the format accepts: 1583-01-01 00:00:00 UTC.
#[must_use]
pub fn min_datetime() -> NaiveDateTime {
    DateTime::from_timestamp_millis(MIN_UNIX_MS)
        .expect("1583-01-01 is representable")
        .naive_utc()
}

/// Convert a timestamp to wire milliseconds, truncating sub-millisecond
/// precision.
pub fn datetime_to_wire(value: NaiveDateTime) -> Result<i64, FormatError> {
    let millis = value.and_utc().timestamp_millis() + EPOCH_SHIFT_MS;
    if millis < MIN_DATETIME_WIRE_MS {
        return Err(FormatError::DateOutOfRange { millis });
    }
    Ok(millis)
}

/// Convert wire milliseconds back to a timestamp.
pub fn datetime_from_wire(millis: i64) -> Result<NaiveDateTime, FormatError> {
    if millis < MIN_DATETIME_WIRE_MS {
        return Err(FormatError::DateOutOfRange { millis });
    }
    DateTime::from_timestamp_millis(millis - EPOCH_SHIFT_MS)
        .map(|dt| dt.naive_utc())
        .ok_or(FormatError::DateOutOfRange { millis })
}

/// Convert a date to wire milliseconds, as a midnight timestamp.
pub fn date_to_wire(value: chrono::NaiveDate) -> Result<i64, FormatError> {
    datetime_to_wire(value.and_time(NaiveTime::MIN))
}

/// Convert wire milliseconds to a date, dropping any time of day.
pub fn date_from_wire(millis: i64) -> Result<chrono::NaiveDate, FormatError> {
    datetime_from_wire(millis).map(|dt| dt.date())
}

/// Normalize milliseconds into [0, 86,400,000), wrapping negatives.
#[must_use]
pub fn normalize_time_ms(millis: i64) -> i64 {
    millis.rem_euclid(MS_PER_DAY)
}

/// Convert a time of day to wire milliseconds within a day.
#[must_use]
pub fn time_to_wire(value: NaiveTime) -> i64 {
    let millis = i64::from(value.num_seconds_from_midnight()) * 1_000
        + i64::from(value.nanosecond() / 1_000_000);
    // A leap second can push the raw figure past the end of the day.
    normalize_time_ms(millis)
}

/// Convert wire milliseconds to a time of day, normalizing first.
#[must_use]
pub fn time_from_wire(millis: i64) -> NaiveTime {
    let millis = normalize_time_ms(millis);
    NaiveTime::from_num_seconds_from_midnight_opt(
        (millis / 1_000) as u32,
        ((millis % 1_000) * 1_000_000) as u32,
    )
    .expect("normalized time is within a day")
}

/// Convert a duration to wire milliseconds, truncating sub-millisecond
/// precision.
#[must_use]
pub fn timespan_to_wire(value: TimeDelta) -> i64 {
    value.num_milliseconds()
}

/// Convert wire milliseconds to a duration.
#[must_use]
pub fn timespan_from_wire(millis: i64) -> TimeDelta {
    TimeDelta::milliseconds(millis)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_epoch_shift() {
        // The unix epoch itself.
        let epoch = datetime(1970, 1, 1, 0, 0, 0);
        assert_eq!(datetime_to_wire(epoch).unwrap(), EPOCH_SHIFT_MS);
        assert_eq!(datetime_from_wire(EPOCH_SHIFT_MS).unwrap(), epoch);
    }

    #[test]
    fn test_minimum_boundary() {
        let floor = datetime(1583, 1, 1, 0, 0, 0);
        assert_eq!(min_datetime(), floor);
        assert_eq!(datetime_to_wire(floor).unwrap(), MIN_DATETIME_WIRE_MS);

        let before = datetime(1582, 12, 31, 23, 59, 59);
        assert!(matches!(
            datetime_to_wire(before),
            Err(FormatError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            datetime_from_wire(MIN_DATETIME_WIRE_MS - 1),
            Err(FormatError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_datetime_roundtrip() {
        let dt = datetime(2024, 6, 15, 13, 37, 42);
        let wire = datetime_to_wire(dt).unwrap();
        assert_eq!(datetime_from_wire(wire).unwrap(), dt);
    }

    #[test]
    fn test_time_normalization() {
        assert_eq!(normalize_time_ms(0), 0);
        assert_eq!(normalize_time_ms(MS_PER_DAY), 0);
        assert_eq!(normalize_time_ms(-1), MS_PER_DAY - 1);
        assert_eq!(normalize_time_ms(-MS_PER_DAY - 5), MS_PER_DAY - 5);
    }

    #[test]
    fn test_time_roundtrip() {
        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
        assert_eq!(time_to_wire(time), MS_PER_DAY - 1);
        assert_eq!(time_from_wire(MS_PER_DAY - 1), time);
        assert_eq!(time_from_wire(-1), time);
    }

    #[test]
    fn test_timespan_roundtrip() {
        for millis in [0i64, 1, -1, MS_PER_DAY, -123_456_789] {
            assert_eq!(timespan_to_wire(timespan_from_wire(millis)), millis);
        }
    }
}
