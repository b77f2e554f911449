//! Calendar periods in a time zone, as half-open UTC ranges.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ValidationError;

/// The UTC instant at which `date` begins in `tz`.
///
/// When midnight is skipped by a DST jump the day starts at the first valid local time after it;
/// when it occurs twice the earlier one wins.
pub fn local_midnight_utc(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(t) => t.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Gaps are at most a couple of hours; walk forward in 15 minute steps.
            let mut candidate = midnight;
            for _ in 0..16 {
                candidate += Duration::minutes(15);
                if let Some(t) = tz.from_local_datetime(&candidate).earliest() {
                    return t.with_timezone(&Utc);
                }
            }
            Utc.from_utc_datetime(&midnight)
        }
    }
}

/// `[start of date, start of the next date)` in `tz`.
pub fn day_range(tz: &Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (local_midnight_utc(tz, date), local_midnight_utc(tz, next))
}

/// `[first local midnight of the month, first local midnight of the next month)` in `tz`.
pub fn month_range(
    tz: &Tz,
    year: i32,
    month: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    let invalid = || ValidationError::InvalidMonth { year, month };
    if !(1..=9999).contains(&year) {
        return Err(invalid());
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;
    Ok((local_midnight_utc(tz, first), local_midnight_utc(tz, next)))
}
