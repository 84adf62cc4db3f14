//! Packed device timestamps
//!
//! Panels store local date-times as a single counter of mixed radix:
//! seconds, minutes, hours, then days in 31-day months and 12-month years
//! counted from 2000.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

const BASE_YEAR: i32 = 2000;

/// Decode a packed timestamp
///
/// Returns `None` for values that do not name a real calendar date
/// (e.g. February 30th).
///
/// # Examples
///
/// ```
/// use zkaccess_types::time::decode_timestamp;
///
/// let time = decode_timestamp(777_976_245).unwrap();
/// assert_eq!(time.to_string(), "2024-03-15 08:30:45");
/// ```
pub fn decode_timestamp(packed: u64) -> Option<NaiveDateTime> {
    let mut t = packed;

    let second = (t % 60) as u32;
    t /= 60;
    let minute = (t % 60) as u32;
    t /= 60;
    let hour = (t % 24) as u32;
    t /= 24;
    let day = (t % 31) as u32 + 1;
    t /= 31;
    let month = (t % 12) as u32 + 1;
    t /= 12;
    let year = BASE_YEAR.checked_add(i32::try_from(t).ok()?)?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Pack a date-time the way the panel stores it
///
/// Returns `None` for dates before 2000.
pub fn encode_timestamp(time: &NaiveDateTime) -> Option<u64> {
    let years = u64::try_from(time.year() - BASE_YEAR).ok()?;

    let days = (years * 12 + u64::from(time.month0())) * 31 + u64::from(time.day0());
    let seconds = u64::from(time.hour()) * 3600 + u64::from(time.minute()) * 60 + u64::from(time.second());

    Some(days * 86_400 + seconds)
}
